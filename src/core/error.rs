//! Error types for the inventory core
//!
//! Three failure classes leave the store: a name collision on an explicit
//! create, an entity id used outside its own shop, and the store itself
//! being unreachable. "Nothing found" and "didn't understand" are ordinary
//! values, not errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniquely-named row (shop, user, medicine, location) already exists
    #[error("{kind} '{name}' already exists")]
    Conflict { kind: &'static str, name: String },

    /// A medicine or location id that belongs to another shop (or none)
    #[error("{kind} {id} does not belong to shop {shop}")]
    NotInShop {
        kind: &'static str,
        id: i64,
        shop: i64,
    },

    /// Connection or storage failure; aborts the current request
    #[error("store unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures of shop registration and login
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password hashing failed: {0}")]
    Hash(String),
}
