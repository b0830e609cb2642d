use serde::{Deserialize, Serialize};

/// A catalog item from the merchant's store, reduced to the fields the
/// promotion engine needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// RMS catalog management number (`manageNumber`), the item's stable key.
    pub manage_number: String,
    /// Current display title, possibly carrying a banner from an earlier run.
    pub title: String,
    /// Minimum standard price across the item's SKU variants, in yen.
    pub base_price: i64,
    /// Number of distinct variant prices under this listing. A listing with
    /// more than one price advertises its cheapest as "starting from" (～).
    pub sku_variant_count: u32,
}

impl Product {
    /// Returns `true` if the listing's variants sell at more than one price.
    #[must_use]
    pub fn has_price_spread(&self) -> bool {
        self.sku_variant_count > 1
    }
}
