//! pharmabot - natural-language inventory tracking for pharmacies
//!
//! Short commands like "Add 10 Aspirin to Shelf A" or "Where is Crocin?"
//! update or query a per-shop stock table.
//!
//! ## Key Concepts
//!
//! - **Shop (tenant)**: every row is scoped by `shop_id`; shops never see
//!   each other's stock
//! - **Lazy entities**: medicines and locations are created on first use
//! - **One entry per (medicine, location)**: quantities move by deltas and
//!   never drop below zero
//! - **Intents**: add, search, list, or unknown, matched in that order

pub mod cli;
pub mod config;
pub mod core;

pub use crate::core::agent::{Agent, AgentSettings, Reply};
pub use crate::core::error::{AuthError, StoreError};
pub use crate::core::intent::{classify, Intent};
pub use crate::core::store::{InventoryRow, ShopId, Store};
