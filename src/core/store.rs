//! Store - SQLite tenant store
//!
//! One long-lived connection per process. Every table carries `shop_id` and
//! every statement below filters on it.
//!
//! # Key Points
//! - Medicine and location names are unique per shop, not globally
//! - At most one inventory row per (shop, medicine, location)
//! - Quantities are adjusted by signed deltas and clamped at zero
//! - Inventory rows only ever point at medicines and locations of their own shop
//! - Multi-step mutations go through [`StoreTx`] so they commit atomically

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::functions::FunctionFlags;
use rusqlite::{ffi, params, Connection, OpenFlags, OptionalExtension, Transaction};
use serde::{Deserialize, Serialize};

use super::error::{Result, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tenant identity. Handed to the core by the auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShopId(pub i64);

impl fmt::Display for ShopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row id of a medicine or location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

/// The two lazily-created, shop-scoped name tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Medicine,
    Location,
}

impl EntityKind {
    fn table(self) -> &'static str {
        match self {
            EntityKind::Medicine => "medicines",
            EntityKind::Location => "locations",
        }
    }

    fn label(self) -> &'static str {
        match self {
            EntityKind::Medicine => "medicine",
            EntityKind::Location => "location",
        }
    }
}

/// Raw inventory row, keyed by identities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub id: i64,
    pub shop_id: ShopId,
    pub medicine_id: EntityId,
    pub location_id: EntityId,
    pub quantity: i64,
    pub expiry: Option<NaiveDate>,
}

/// Inventory row joined with medicine and location names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub medicine: String,
    pub location: String,
    pub quantity: i64,
    pub expiry: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct ShopRecord {
    pub id: ShopId,
    pub name: String,
    /// SQLite `CURRENT_TIMESTAMP` text, UTC
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub shop_id: ShopId,
}

/// Per-shop counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShopStats {
    pub medicines: i64,
    pub locations: i64,
    pub entries: i64,
    pub total_units: i64,
}

/// Database storage
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create a database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
        register_functions(&conn)?;

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;

        tracing::debug!(path = %path.display(), "opened inventory store");
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS shops (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            -- Owned by the auth layer; the core only follows shop_id
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                shop_id INTEGER NOT NULL REFERENCES shops(id)
            );

            CREATE TABLE IF NOT EXISTS medicines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                shop_id INTEGER NOT NULL REFERENCES shops(id),
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                UNIQUE(shop_id, name)
            );

            CREATE TABLE IF NOT EXISTS locations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                shop_id INTEGER NOT NULL REFERENCES shops(id),
                name TEXT NOT NULL,
                UNIQUE(shop_id, name)
            );

            CREATE TABLE IF NOT EXISTS inventory (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                shop_id INTEGER NOT NULL REFERENCES shops(id),
                medicine_id INTEGER NOT NULL REFERENCES medicines(id),
                location_id INTEGER NOT NULL REFERENCES locations(id),
                quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
                expiry_date TEXT,
                UNIQUE(shop_id, medicine_id, location_id)
            );

            CREATE INDEX IF NOT EXISTS idx_inventory_shop ON inventory(shop_id);
            "#,
        )?;

        Ok(())
    }

    /// Begin a transaction. Dropping it without `commit` rolls back.
    pub fn transaction(&mut self) -> Result<StoreTx<'_>> {
        Ok(StoreTx {
            tx: self.conn.transaction()?,
        })
    }

    // ---- Shops & users -------------------------------------------------

    /// Create a shop; a taken name is a [`StoreError::Conflict`]
    pub fn create_shop(&self, name: &str) -> Result<ShopId> {
        create_shop(&self.conn, name)
    }

    pub fn get_shop(&self, id: ShopId) -> Result<Option<ShopRecord>> {
        let shop = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM shops WHERE id = ?1",
                [id.0],
                |row| {
                    Ok(ShopRecord {
                        id: ShopId(row.get(0)?),
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(shop)
    }

    pub fn create_user(&self, username: &str, password_hash: &str, shop: ShopId) -> Result<i64> {
        create_user(&self.conn, username, password_hash, shop)
    }

    pub fn get_user(&self, username: &str) -> Result<Option<UserRecord>> {
        get_user(&self.conn, username)
    }

    // ---- Entities ------------------------------------------------------

    /// Return the id for (shop, name), creating the row if needed
    pub fn upsert_entity(&self, shop: ShopId, kind: EntityKind, name: &str) -> Result<EntityId> {
        upsert_entity(&self.conn, shop, kind, name)
    }

    /// Explicitly create a medicine or location; a taken name is a conflict
    pub fn create_entity(
        &self,
        shop: ShopId,
        kind: EntityKind,
        name: &str,
        description: &str,
    ) -> Result<EntityId> {
        let result = match kind {
            EntityKind::Medicine => self.conn.execute(
                "INSERT INTO medicines (shop_id, name, description) VALUES (?1, ?2, ?3)",
                params![shop.0, name, description],
            ),
            EntityKind::Location => self.conn.execute(
                "INSERT INTO locations (shop_id, name) VALUES (?1, ?2)",
                params![shop.0, name],
            ),
        };

        match result {
            Ok(_) => Ok(EntityId(self.conn.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict {
                kind: kind.label(),
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// All names of one kind in a shop, in creation order
    pub fn entity_names(&self, shop: ShopId, kind: EntityKind) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT name FROM {} WHERE shop_id = ?1 ORDER BY id",
            kind.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let names = stmt
            .query_map([shop.0], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    // ---- Inventory -----------------------------------------------------

    pub fn get_entry(
        &self,
        shop: ShopId,
        medicine: EntityId,
        location: EntityId,
    ) -> Result<Option<InventoryEntry>> {
        get_entry(&self.conn, shop, medicine, location)
    }

    /// Apply a signed delta in its own transaction and return the new quantity
    pub fn apply_delta(
        &mut self,
        shop: ShopId,
        medicine: EntityId,
        location: EntityId,
        delta: i64,
        expiry: Option<NaiveDate>,
    ) -> Result<i64> {
        let tx = self.transaction()?;
        let quantity = tx.apply_delta(shop, medicine, location, delta, expiry)?;
        tx.commit()?;
        Ok(quantity)
    }

    /// Every inventory row of a shop, in insertion order
    pub fn list_inventory(&self, shop: ShopId) -> Result<Vec<InventoryRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT m.name, l.name, i.quantity, i.expiry_date
            FROM inventory i
            JOIN medicines m ON m.id = i.medicine_id AND m.shop_id = i.shop_id
            JOIN locations l ON l.id = i.location_id AND l.shop_id = i.shop_id
            WHERE i.shop_id = ?1
            ORDER BY i.id
            "#,
        )?;

        let rows = stmt
            .query_map([shop.0], |row| Self::row_to_inventory(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Rows whose medicine name contains `term`, ignoring case (Unicode-aware)
    pub fn search_inventory(&self, shop: ShopId, term: &str) -> Result<Vec<InventoryRow>> {
        let needle = term.to_lowercase();

        let mut stmt = self.conn.prepare(
            r#"
            SELECT m.name, l.name, i.quantity, i.expiry_date
            FROM inventory i
            JOIN medicines m ON m.id = i.medicine_id AND m.shop_id = i.shop_id
            JOIN locations l ON l.id = i.location_id AND l.shop_id = i.shop_id
            WHERE i.shop_id = ?1 AND instr(casefold(m.name), ?2) > 0
            ORDER BY i.id
            "#,
        )?;

        let rows = stmt
            .query_map(params![shop.0, needle], |row| Self::row_to_inventory(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn stats(&self, shop: ShopId) -> Result<ShopStats> {
        let medicines: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM medicines WHERE shop_id = ?1",
            [shop.0],
            |row| row.get(0),
        )?;

        let locations: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM locations WHERE shop_id = ?1",
            [shop.0],
            |row| row.get(0),
        )?;

        let (entries, total_units): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(quantity), 0) FROM inventory WHERE shop_id = ?1",
            [shop.0],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(ShopStats {
            medicines,
            locations,
            entries,
            total_units,
        })
    }

    fn row_to_inventory(row: &rusqlite::Row) -> rusqlite::Result<InventoryRow> {
        let expiry: Option<String> = row.get(3)?;
        Ok(InventoryRow {
            medicine: row.get(0)?,
            location: row.get(1)?,
            quantity: row.get(2)?,
            expiry: expiry.and_then(|s| parse_date(&s)),
        })
    }
}

/// A store transaction; the multi-step mutation path runs inside one
pub struct StoreTx<'a> {
    tx: Transaction<'a>,
}

impl StoreTx<'_> {
    pub fn create_shop(&self, name: &str) -> Result<ShopId> {
        create_shop(&self.tx, name)
    }

    pub fn create_user(&self, username: &str, password_hash: &str, shop: ShopId) -> Result<i64> {
        create_user(&self.tx, username, password_hash, shop)
    }

    pub fn get_user(&self, username: &str) -> Result<Option<UserRecord>> {
        get_user(&self.tx, username)
    }

    pub fn upsert_entity(&self, shop: ShopId, kind: EntityKind, name: &str) -> Result<EntityId> {
        upsert_entity(&self.tx, shop, kind, name)
    }

    pub fn get_entry(
        &self,
        shop: ShopId,
        medicine: EntityId,
        location: EntityId,
    ) -> Result<Option<InventoryEntry>> {
        get_entry(&self.tx, shop, medicine, location)
    }

    /// Create the entry with `max(delta, 0)` or move it to
    /// `max(existing + delta, 0)`. A deficit below zero is dropped.
    pub fn apply_delta(
        &self,
        shop: ShopId,
        medicine: EntityId,
        location: EntityId,
        delta: i64,
        expiry: Option<NaiveDate>,
    ) -> Result<i64> {
        ensure_owned(&self.tx, shop, EntityKind::Medicine, medicine)?;
        ensure_owned(&self.tx, shop, EntityKind::Location, location)?;

        let expiry = expiry.map(|d| d.format(DATE_FORMAT).to_string());

        let quantity = match get_entry(&self.tx, shop, medicine, location)? {
            Some(entry) => {
                let quantity = entry.quantity.saturating_add(delta).max(0);
                self.tx.execute(
                    r#"
                    UPDATE inventory
                    SET quantity = ?1, expiry_date = COALESCE(?2, expiry_date)
                    WHERE id = ?3 AND shop_id = ?4
                    "#,
                    params![quantity, expiry, entry.id, shop.0],
                )?;
                quantity
            }
            None => {
                let quantity = delta.max(0);
                self.tx.execute(
                    r#"
                    INSERT INTO inventory (shop_id, medicine_id, location_id, quantity, expiry_date)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![shop.0, medicine.0, location.0, quantity, expiry],
                )?;
                quantity
            }
        };

        tracing::debug!(shop = %shop, medicine = medicine.0, location = location.0, delta, quantity, "applied stock delta");
        Ok(quantity)
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

fn create_shop(conn: &Connection, name: &str) -> Result<ShopId> {
    match conn.execute("INSERT INTO shops (name) VALUES (?1)", [name]) {
        Ok(_) => Ok(ShopId(conn.last_insert_rowid())),
        Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict {
            kind: "shop",
            name: name.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

fn create_user(conn: &Connection, username: &str, password_hash: &str, shop: ShopId) -> Result<i64> {
    match conn.execute(
        "INSERT INTO users (username, password_hash, shop_id) VALUES (?1, ?2, ?3)",
        params![username, password_hash, shop.0],
    ) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict {
            kind: "user",
            name: username.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

fn get_user(conn: &Connection, username: &str) -> Result<Option<UserRecord>> {
    let user = conn
        .query_row(
            "SELECT id, username, password_hash, shop_id FROM users WHERE username = ?1",
            [username],
            |row| {
                Ok(UserRecord {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                    shop_id: ShopId(row.get(3)?),
                })
            },
        )
        .optional()?;
    Ok(user)
}

fn upsert_entity(conn: &Connection, shop: ShopId, kind: EntityKind, name: &str) -> Result<EntityId> {
    let table = kind.table();

    let inserted = conn.execute(
        &format!("INSERT OR IGNORE INTO {table} (shop_id, name) VALUES (?1, ?2)"),
        params![shop.0, name],
    )?;
    if inserted > 0 {
        tracing::debug!(shop = %shop, kind = kind.label(), name, "created entity");
    }

    let id: i64 = conn.query_row(
        &format!("SELECT id FROM {table} WHERE shop_id = ?1 AND name = ?2"),
        params![shop.0, name],
        |row| row.get(0),
    )?;
    Ok(EntityId(id))
}

fn get_entry(
    conn: &Connection,
    shop: ShopId,
    medicine: EntityId,
    location: EntityId,
) -> Result<Option<InventoryEntry>> {
    let entry = conn
        .query_row(
            r#"
            SELECT id, quantity, expiry_date FROM inventory
            WHERE shop_id = ?1 AND medicine_id = ?2 AND location_id = ?3
            "#,
            params![shop.0, medicine.0, location.0],
            |row| {
                let expiry: Option<String> = row.get(2)?;
                Ok(InventoryEntry {
                    id: row.get(0)?,
                    shop_id: shop,
                    medicine_id: medicine,
                    location_id: location,
                    quantity: row.get(1)?,
                    expiry: expiry.and_then(|s| parse_date(&s)),
                })
            },
        )
        .optional()?;
    Ok(entry)
}

/// Fail unless `id` is a `kind` row of `shop`
fn ensure_owned(conn: &Connection, shop: ShopId, kind: EntityKind, id: EntityId) -> Result<()> {
    let owned: bool = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1 AND shop_id = ?2)",
            kind.table()
        ),
        params![id.0, shop.0],
        |row| row.get(0),
    )?;

    if owned {
        Ok(())
    } else {
        Err(StoreError::NotInShop {
            kind: kind.label(),
            id: id.0,
            shop: shop.0,
        })
    }
}

/// Only UNIQUE failures are name conflicts; CHECK and NOT NULL stay storage errors
fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
}

/// `casefold(text)`: Unicode lowercase. SQLite's `lower` folds ASCII only.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: String = ctx.get(0)?;
            Ok(text.to_lowercase())
        },
    )?;
    Ok(())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}
