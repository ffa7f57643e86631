//! Core module - Business logic
//!
//! Tenant store, the two resolvers built on it, and the intent router that
//! picks between them.

pub mod agent;
pub mod auth;
pub mod error;
pub mod fuzzy;
pub mod intent;
pub mod query;
pub mod stock;
pub mod store;
