//! Session-scoped shopping cart.
//!
//! The cart only remembers *which* products and *how many*. Names, prices and
//! availability are always re-read from the catalog when the cart is
//! materialized, so a price change or deactivation is reflected immediately.
//!
//! Keys are product ids rendered as strings, which is how the cart is
//! serialized into the session record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Smallest quantity a cart line can hold.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a cart line can hold (the `INTEGER` column limit).
pub const MAX_QUANTITY: u32 = 2_147_483_647;

/// Anything the cart can be materialized against.
pub trait CatalogItem {
    /// The product id.
    fn id(&self) -> ProductId;
    /// The current unit price.
    fn price(&self) -> Price;
    /// Whether the product may currently be sold.
    fn is_active(&self) -> bool;
}

/// A cart entry joined with live product data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine<P> {
    /// The product as it is right now.
    pub product: P,
    /// Requested quantity, always at least [`MIN_QUANTITY`].
    pub qty: u32,
    /// Unit price read at materialization time.
    pub unit_price: Price,
    /// `unit_price * qty`.
    pub line_total: Price,
}

impl<P: CatalogItem> CartLine<P> {
    fn new(product: P, qty: u32) -> Self {
        let unit_price = product.price();
        Self {
            product,
            qty,
            unit_price,
            line_total: unit_price.times(qty),
        }
    }
}

/// Per-visitor mapping of product id to desired quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<String, u32>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a submitted quantity, clamping anything unusable to 1.
    ///
    /// Missing, blank, non-numeric, zero and negative input all yield
    /// [`MIN_QUANTITY`]; huge values are capped at [`MAX_QUANTITY`].
    #[must_use]
    pub fn parse_quantity(raw: Option<&str>) -> u32 {
        let Some(Ok(value)) = raw.map(|s| s.trim().parse::<i64>()) else {
            return MIN_QUANTITY;
        };
        u32::try_from(value.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY)))
            .unwrap_or(MIN_QUANTITY)
    }

    /// Add `qty` units of a product, accumulating onto any existing quantity.
    ///
    /// Adding `a` then `b` leaves the same state as adding `a + b` once.
    pub fn add(&mut self, product_id: ProductId, qty: u32) {
        let qty = qty.clamp(MIN_QUANTITY, MAX_QUANTITY);
        let entry = self.lines.entry(product_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(qty).min(MAX_QUANTITY);
    }

    /// Remove a product. Returns whether it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.lines.remove(&product_id.to_string()).is_some()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Quantity currently held for a product (0 if absent).
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.lines
            .get(&product_id.to_string())
            .copied()
            .unwrap_or(0)
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.values().map(|&qty| u64::from(qty)).sum()
    }

    /// Entries with a parseable id and a positive quantity, ordered by id.
    #[must_use]
    pub fn entries(&self) -> Vec<(ProductId, u32)> {
        let mut entries: Vec<(ProductId, u32)> = self
            .lines
            .iter()
            .filter(|&(_, &qty)| qty >= MIN_QUANTITY)
            .filter_map(|(key, &qty)| key.parse::<ProductId>().ok().map(|id| (id, qty)))
            .collect();
        entries.sort_by_key(|&(id, _)| id);
        entries
    }

    /// Ids to look up when materializing.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.entries().into_iter().map(|(id, _)| id).collect()
    }

    /// Join the cart against live products.
    ///
    /// Entries whose product is missing from `products` or is inactive are
    /// silently dropped; this is not an error.
    #[must_use]
    pub fn materialize<P: CatalogItem + Clone>(&self, products: &[P]) -> Vec<CartLine<P>> {
        self.entries()
            .into_iter()
            .filter_map(|(id, qty)| {
                products
                    .iter()
                    .find(|product| product.id() == id && product.is_active())
                    .map(|product| CartLine::new(product.clone(), qty))
            })
            .collect()
    }
}

/// Sum of line totals. An empty slice totals exactly zero.
#[must_use]
pub fn cart_total<P>(lines: &[CartLine<P>]) -> Price {
    lines.iter().map(|line| line.line_total).sum()
}
