//! Stock - turn (medicine, location, delta) into a store mutation
//!
//! Names are normalized before lookup, so "paracetamol" and "PARACETAMOL"
//! land on the same row. Unknown medicines and locations are created on the
//! spot; there is no separate registration step.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::error::Result;
use super::store::{EntityKind, ShopId, Store};

/// Outcome of a stock update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockUpdate {
    pub medicine: String,
    pub location: String,
    /// Resulting total at the location, not the delta
    pub quantity: i64,
}

impl fmt::Display for StockUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Updated {} at {}. New Quantity: {}",
            self.medicine, self.location, self.quantity
        )
    }
}

/// Trim and title-case a name: the first letter of every alphabetic run is
/// upper-cased and the rest lower-cased ("shelf a" -> "Shelf A",
/// "co-amoxiclav" -> "Co-Amoxiclav").
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;

    for c in raw.trim().chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Resolve-or-create both names and apply `delta`, all in one transaction.
pub fn update_stock(
    store: &mut Store,
    shop: ShopId,
    medicine: &str,
    location: &str,
    delta: i64,
    expiry: Option<NaiveDate>,
) -> Result<StockUpdate> {
    let medicine = normalize_name(medicine);
    let location = normalize_name(location);

    let tx = store.transaction()?;
    let medicine_id = tx.upsert_entity(shop, EntityKind::Medicine, &medicine)?;
    let location_id = tx.upsert_entity(shop, EntityKind::Location, &location)?;
    let quantity = tx.apply_delta(shop, medicine_id, location_id, delta, expiry)?;
    tx.commit()?;

    tracing::info!(shop = %shop, %medicine, %location, delta, quantity, "stock updated");

    Ok(StockUpdate {
        medicine,
        location,
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  paracetamol "), "Paracetamol");
        assert_eq!(normalize_name("shelf a"), "Shelf A");
        assert_eq!(normalize_name("VITAMIN c"), "Vitamin C");
        assert_eq!(normalize_name("co-amoxiclav"), "Co-Amoxiclav");
        assert_eq!(normalize_name("box 12b"), "Box 12B");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_update_stock_reports_running_total() -> Result<()> {
        let mut store = Store::open_memory()?;
        let shop = store.create_shop("Test Shop")?;

        let first = update_stock(&mut store, shop, "Paracetamol", "Shelf A", 50, None)?;
        assert_eq!(first.quantity, 50);

        let second = update_stock(&mut store, shop, "paracetamol", "shelf a", 20, None)?;
        assert_eq!(second.quantity, 70);
        assert_eq!(
            second.to_string(),
            "Updated Paracetamol at Shelf A. New Quantity: 70"
        );

        // One medicine, one location, one entry
        let stats = store.stats(shop)?;
        assert_eq!((stats.medicines, stats.locations, stats.entries), (1, 1, 1));

        Ok(())
    }

    #[test]
    fn test_update_stock_creates_entities_lazily() -> Result<()> {
        let mut store = Store::open_memory()?;
        let shop = store.create_shop("Test Shop")?;

        update_stock(&mut store, shop, "aspirin", "shelf a", 1, None)?;
        update_stock(&mut store, shop, "aspirin", "shelf b", 1, None)?;

        assert_eq!(
            store.entity_names(shop, EntityKind::Location)?,
            vec!["Shelf A", "Shelf B"]
        );
        assert_eq!(store.entity_names(shop, EntityKind::Medicine)?, vec!["Aspirin"]);

        Ok(())
    }

    #[test]
    fn test_negative_delta_is_clamped() -> Result<()> {
        let mut store = Store::open_memory()?;
        let shop = store.create_shop("Test Shop")?;

        update_stock(&mut store, shop, "Crocin", "Box 1", 5, None)?;
        let update = update_stock(&mut store, shop, "Crocin", "Box 1", -8, None)?;
        assert_eq!(update.quantity, 0);

        Ok(())
    }
}
