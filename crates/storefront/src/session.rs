//! Per-session orchestration.
//!
//! A [`ShopSession`] owns everything a single browser tab owns: the loaded
//! catalog (CMS result or bundled fallback), the cart, and the storage
//! handle. It is the single writer of its cart; nothing here needs
//! locking.
//!
//! Every mutating cart operation persists a snapshot afterwards. A failed
//! persist is logged and the in-memory cart stays authoritative.

use uuid::Uuid;
use whatsapp_shop_core::ProductId;

use crate::cart::storage::{CartSnapshot, CartStorage};
use crate::cart::{Cart, CartError};
use crate::catalog::{Product, SanityClient, catalog_or_fallback};
use crate::checkout::{self, CheckoutError, CheckoutLink};
use crate::config::ShopConfig;

/// One shopping session: catalog, cart, and persistence.
pub struct ShopSession<S: CartStorage> {
    id: Uuid,
    catalog: Vec<Product>,
    cart: Cart,
    storage: S,
    whatsapp_number: String,
}

impl<S: CartStorage> ShopSession<S> {
    /// Start a session: one-shot catalog load, then cart restore.
    ///
    /// The catalog fetch is the only async boundary of the session. A
    /// failed fetch degrades to the bundled catalog; a failed cart restore
    /// degrades to an empty cart. Neither is surfaced to the caller.
    pub async fn start(client: &SanityClient, storage: S, config: &ShopConfig) -> Self {
        let catalog = catalog_or_fallback(client.fetch_products().await);
        Self::resume(catalog, storage, config.whatsapp_number.clone())
    }

    /// Build a session over an already-loaded catalog.
    pub fn resume(catalog: Vec<Product>, storage: S, whatsapp_number: String) -> Self {
        let id = Uuid::new_v4();

        let cart = match storage.load() {
            Ok(Some(snapshot)) => {
                tracing::debug!(session = %id, saved_at = %snapshot.saved_at, "restored cart snapshot");
                Cart::from_items(snapshot.items)
            }
            Ok(None) => Cart::new(),
            Err(error) => {
                tracing::warn!(session = %id, %error, "failed to restore cart, starting empty");
                Cart::new()
            }
        };

        Self {
            id,
            catalog,
            cart,
            storage,
            whatsapp_number,
        }
    }

    /// Session id, for log correlation.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The catalog loaded for this session.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.catalog
    }

    /// Look up a catalog product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.catalog.iter().find(|p| &p.id == id)
    }

    /// The current cart state.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add a product to the cart and persist.
    ///
    /// # Errors
    ///
    /// Fails with [`CartError::InvalidQuantity`] on a non-positive
    /// quantity; the cart is unchanged and nothing is persisted.
    pub fn add_item(&mut self, product: Product, quantity: i64) -> Result<(), CartError> {
        self.cart.add_item(product, quantity)?;
        self.persist();
        Ok(())
    }

    /// Remove a cart line (no-op for absent ids) and persist.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let removed = self.cart.remove_item(product_id);
        self.persist();
        removed
    }

    /// Set a line quantity (<= 0 removes) and persist.
    ///
    /// # Errors
    ///
    /// Fails with [`CartError::InvalidQuantity`] when a positive quantity
    /// targets a product that is not in the cart.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        self.cart.set_quantity(product_id, quantity)?;
        self.persist();
        Ok(())
    }

    /// Empty the cart and persist.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Compose the WhatsApp checkout link for the current cart.
    ///
    /// # Errors
    ///
    /// Fails with [`CheckoutError::EmptyCart`] when the cart is empty.
    pub fn checkout_link(&self) -> Result<CheckoutLink, CheckoutError> {
        checkout::compose(&self.cart, &self.whatsapp_number)
    }

    /// Clear the cart after a successful checkout hand-off.
    pub fn finish_checkout(&mut self) {
        tracing::debug!(session = %self.id, "checkout handed off, clearing cart");
        self.clear();
    }

    /// Persist the current cart snapshot, best-effort.
    fn persist(&self) {
        if let Err(error) = self.storage.save(&CartSnapshot::of_cart(&self.cart)) {
            tracing::warn!(
                session = %self.id,
                %error,
                "failed to persist cart, continuing in memory"
            );
        }
    }
}
