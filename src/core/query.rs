//! Query - medicine lookup within one shop
//!
//! Plain substring containment on the stored medicine name, case-insensitive
//! (Unicode lowercase on both sides). No edit-distance here; see [`super::fuzzy`] for that.

use super::error::Result;
use super::store::{InventoryRow, ShopId, Store};

/// Every inventory row whose medicine name contains `query`.
///
/// An empty result is not an error; the caller decides how to say
/// "not found".
pub fn find_medicine(store: &Store, shop: ShopId, query: &str) -> Result<Vec<InventoryRow>> {
    let term = query.trim();
    let rows = store.search_inventory(shop, term)?;
    tracing::debug!(shop = %shop, term, matches = rows.len(), "medicine lookup");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stock::update_stock;
    use anyhow::Result;

    #[test]
    fn test_find_medicine_across_locations() -> Result<()> {
        let mut store = Store::open_memory()?;
        let shop = store.create_shop("Test Shop")?;
        update_stock(&mut store, shop, "Paracetamol", "Shelf A", 70, None)?;
        update_stock(&mut store, shop, "Paracetamol", "Back Room", 10, None)?;
        update_stock(&mut store, shop, "Aspirin", "Shelf A", 5, None)?;

        let rows = find_medicine(&store, shop, "paracetamol")?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, "Shelf A");
        assert_eq!(rows[0].quantity, 70);
        assert_eq!(rows[1].location, "Back Room");

        Ok(())
    }

    #[test]
    fn test_find_medicine_other_shop_sees_nothing() -> Result<()> {
        let mut store = Store::open_memory()?;
        let test_shop = store.create_shop("Test Shop")?;
        let other_shop = store.create_shop("Other Shop")?;
        update_stock(&mut store, test_shop, "Paracetamol", "Shelf A", 70, None)?;

        assert!(find_medicine(&store, other_shop, "Paracetamol")?.is_empty());
        Ok(())
    }
}
