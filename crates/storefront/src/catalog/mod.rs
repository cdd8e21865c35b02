//! Product catalog sourced from the Sanity CMS.
//!
//! # Architecture
//!
//! - [`SanityClient`] queries the Sanity Content Lake over HTTP (GROQ)
//! - Responses are cached in-memory via `moka` (5 minute TTL)
//! - A bundled static list ([`fallback::fallback_products`]) substitutes
//!   whenever the CMS is unreachable, so a catalog load failure is never a
//!   hard failure for the session
//!
//! # Example
//!
//! ```rust,ignore
//! use whatsapp_shop_storefront::catalog::{SanityClient, catalog_or_fallback};
//!
//! let client = SanityClient::new(&config.sanity);
//! let products = catalog_or_fallback(client.fetch_products().await);
//! ```

mod client;
pub mod fallback;

pub use client::SanityClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use whatsapp_shop_core::{Price, ProductId};

/// A catalog product, immutable once loaded for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique id within the catalog.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price, captured into the cart at add time.
    pub price: Price,
    /// Primary image reference (URL), if any.
    pub image: Option<String>,
    /// Product-declared fallback image, tried before placeholders.
    pub fallback_image: Option<String>,
    /// Free-form category text, used for placeholder selection.
    pub category: Option<String>,
    /// Stock flag; products default to in stock.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

/// Errors that can occur when fetching the catalog from Sanity.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("API returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolve a catalog fetch result, substituting the bundled static list on
/// failure or on an empty result.
///
/// The degraded mode is a static catalog with a fully working cart; the
/// error is logged, never surfaced.
#[must_use]
pub fn catalog_or_fallback(result: Result<Vec<Product>, CatalogError>) -> Vec<Product> {
    match result {
        Ok(products) if !products.is_empty() => products,
        Ok(_) => {
            tracing::warn!("CMS returned an empty catalog, using bundled fallback");
            fallback::fallback_products()
        }
        Err(error) => {
            tracing::warn!(%error, "catalog fetch failed, using bundled fallback");
            fallback::fallback_products()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Status {
            code: 500,
            body: "oops".to_string(),
        };
        assert_eq!(err.to_string(), "API returned HTTP 500: oops");

        let err = CatalogError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_fallback_on_error() {
        let products = catalog_or_fallback(Err(CatalogError::Status {
            code: 502,
            body: "bad gateway".to_string(),
        }));
        assert!(!products.is_empty());
    }

    #[test]
    fn test_fallback_on_empty_result() {
        let products = catalog_or_fallback(Ok(Vec::new()));
        assert!(!products.is_empty());
    }

    #[test]
    fn test_successful_fetch_passes_through() {
        let product = Product {
            id: ProductId::new("cms-1"),
            name: "CMS Product".to_string(),
            price: Price::from(10),
            image: None,
            fallback_image: None,
            category: None,
            in_stock: true,
        };
        let products = catalog_or_fallback(Ok(vec![product.clone()]));
        assert_eq!(products, vec![product]);
    }

    #[test]
    fn test_product_in_stock_defaults_on_deserialize() {
        let json = r#"{"id":"1","name":"Widget","price":"5","image":null,"fallback_image":null,"category":null}"#;
        let product: Product = serde_json::from_str(json).expect("deserialize");
        assert!(product.in_stock);
    }
}
