//! Per-session shopping cart.
//!
//! The cart is an ordered collection of lines (insertion order is display
//! order), owned exclusively by one session. All operations are synchronous
//! and leave the cart untouched when they fail.
//!
//! Invariants:
//! - at most one line per product id
//! - every line quantity is >= 1; a line reaching 0 is removed, not kept
//! - prices are captured at add time, so later catalog edits never change
//!   totals already in the cart

pub mod storage;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use whatsapp_shop_core::{Price, ProductId};

use crate::catalog::Product;

/// Errors from rejected cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity is not a positive integer the cart can hold,
    /// or it targets a product that is not in the cart.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: i64,
    },
}

/// A cart line: a captured product plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product as it was when added (price included).
    pub product: Product,
    quantity: u32,
}

impl CartItem {
    /// Line quantity, always >= 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        // A u32 quantity times any sane price fits a Decimal.
        self.product
            .price
            .line_total(self.quantity)
            .unwrap_or_default()
    }
}

/// An ordered cart of [`CartItem`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Zero-quantity lines in a snapshot (hand-edited or from an older
    /// format) are dropped to restore the invariant.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self {
            items: items.into_iter().filter(|item| item.quantity > 0).collect(),
        }
    }

    /// Add a product, merging into an existing line for the same id.
    ///
    /// # Errors
    ///
    /// Fails with [`CartError::InvalidQuantity`] when `quantity` is not
    /// positive or would overflow the line; the cart is left unchanged.
    pub fn add_item(&mut self, product: Product, quantity: i64) -> Result<(), CartError> {
        let added = validate_quantity(&product.id, quantity)?;

        if let Some(item) = self.items.iter_mut().find(|item| item.product.id == product.id) {
            item.quantity = item.quantity.checked_add(added).ok_or_else(|| {
                CartError::InvalidQuantity {
                    product_id: product.id.clone(),
                    quantity,
                }
            })?;
        } else {
            self.items.push(CartItem {
                product,
                quantity: added,
            });
        }

        Ok(())
    }

    /// Add a single unit of a product.
    ///
    /// # Errors
    ///
    /// Fails with [`CartError::InvalidQuantity`] only when the existing
    /// line would overflow.
    pub fn add_one(&mut self, product: Product) -> Result<(), CartError> {
        self.add_item(product, 1)
    }

    /// Remove the line for a product id. Absent ids are a no-op.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product.id != product_id);
        self.items.len() != before
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity <= 0 behaves exactly like [`Self::remove_item`].
    ///
    /// # Errors
    ///
    /// Fails with [`CartError::InvalidQuantity`] when a positive quantity
    /// targets a product that is not in the cart, or does not fit a line.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        let new_quantity = validate_quantity(product_id, quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
            .ok_or_else(|| CartError::InvalidQuantity {
                product_id: product_id.clone(),
                quantity,
            })?;

        item.quantity = new_quantity;
        Ok(())
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line quantities (the cart badge number).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals, using prices captured at add time.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines (not the badge count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// The lines in display (insertion) order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for a product id.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }
}

/// Check a requested quantity is a positive integer that fits a line.
fn validate_quantity(product_id: &ProductId, quantity: i64) -> Result<u32, CartError> {
    if quantity <= 0 {
        return Err(CartError::InvalidQuantity {
            product_id: product_id.clone(),
            quantity,
        });
    }
    u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity {
        product_id: product_id.clone(),
        quantity,
    })
}
