//! Sanity Content Lake client.
//!
//! Queries product documents with GROQ over plain HTTP and caches the
//! result using `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};
use whatsapp_shop_core::{Price, ProductId};

use crate::config::SanityConfig;

use super::{CatalogError, Product};

/// GROQ query selecting all product documents.
///
/// `image.asset->url` dereferences the image asset to its CDN URL so the
/// client never needs to resolve asset references itself.
const PRODUCTS_QUERY: &str = "*[_type == \"product\"]{\
    \"id\": _id, name, price, \"image\": image.asset->url, category, in_stock\
} | order(name asc)";

/// Cache key for the product list.
const PRODUCTS_CACHE_KEY: &str = "products";

/// Client for the Sanity query API.
///
/// Cheaply cloneable; the HTTP connection pool and response cache are
/// shared behind an `Arc`.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl SanityClient {
    /// Create a new client for the configured project and dataset.
    #[must_use]
    pub fn new(config: &SanityConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let host = if config.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        let endpoint = format!(
            "https://{}.{}/v{}/data/query/{}",
            config.project_id, host, config.api_version, config.dataset
        );

        Self {
            inner: Arc::new(SanityClientInner {
                client: reqwest::Client::new(),
                endpoint,
                api_token: config
                    .api_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
                cache,
            }),
        }
    }

    /// Fetch all products from the CMS.
    ///
    /// Results are cached for 5 minutes; a session loads its catalog once,
    /// so it normally hits the network at most once.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable response. Callers recover with
    /// [`catalog_or_fallback`](super::catalog_or_fallback).
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(products) = self.inner.cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let body = self.execute(PRODUCTS_QUERY).await?;
        let products = parse_products(&body)?;

        self.inner
            .cache
            .insert(
                PRODUCTS_CACHE_KEY.to_string(),
                Arc::new(products.clone()),
            )
            .await;

        Ok(products)
    }

    /// Drop any cached catalog data.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(PRODUCTS_CACHE_KEY).await;
    }

    /// Execute a GROQ query and return the raw response body.
    async fn execute(&self, query: &str) -> Result<String, CatalogError> {
        let mut request = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .query(&[("query", query)]);

        // Private datasets need a bearer token; public datasets need none.
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Sanity API returned non-success status"
            );
            return Err(CatalogError::Status {
                code: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }
}

// =============================================================================
// Wire Types & Conversions
// =============================================================================

/// Envelope of a Sanity query response: `{"result": [...]}`.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: Option<Vec<SanityProduct>>,
}

/// Raw product document as selected by [`PRODUCTS_QUERY`].
#[derive(Debug, Deserialize)]
struct SanityProduct {
    id: String,
    name: Option<String>,
    price: Option<rust_decimal::Decimal>,
    image: Option<String>,
    category: Option<String>,
    in_stock: Option<bool>,
}

/// Parse a query response body into domain products.
///
/// Documents without a name or price (drafts, half-filled entries) and
/// documents with a negative price are skipped rather than failing the
/// whole catalog.
fn parse_products(body: &str) -> Result<Vec<Product>, CatalogError> {
    let response: QueryResponse = serde_json::from_str(body)?;

    let products = response
        .result
        .unwrap_or_default()
        .into_iter()
        .filter_map(convert_product)
        .collect();

    Ok(products)
}

/// Convert a raw document into a domain [`Product`], or skip it.
fn convert_product(raw: SanityProduct) -> Option<Product> {
    let Some(name) = raw.name else {
        debug!(id = %raw.id, "skipping product without a name");
        return None;
    };
    let Some(price) = raw.price else {
        debug!(id = %raw.id, "skipping product without a price");
        return None;
    };

    let price = Price::new(price);
    if price.is_negative() {
        debug!(id = %raw.id, "skipping product with a negative price");
        return None;
    }

    Some(Product {
        id: ProductId::new(raw.id),
        name,
        price,
        image: raw.image,
        fallback_image: None,
        category: raw.category,
        in_stock: raw.in_stock.unwrap_or(true),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uses_cdn_host() {
        let config = SanityConfig {
            project_id: "5jpf3dr5".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            api_token: None,
        };
        let client = SanityClient::new(&config);
        assert_eq!(
            client.inner.endpoint,
            "https://5jpf3dr5.apicdn.sanity.io/v2024-01-01/data/query/production"
        );
    }

    #[test]
    fn test_endpoint_without_cdn() {
        let config = SanityConfig {
            project_id: "5jpf3dr5".to_string(),
            dataset: "staging".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: false,
            api_token: None,
        };
        let client = SanityClient::new(&config);
        assert_eq!(
            client.inner.endpoint,
            "https://5jpf3dr5.api.sanity.io/v2024-01-01/data/query/staging"
        );
    }

    #[tokio::test]
    async fn test_invalidate_on_empty_cache_is_noop() {
        let config = SanityConfig {
            project_id: "5jpf3dr5".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            api_token: None,
        };
        let client = SanityClient::new(&config);
        client.invalidate().await;
        assert!(client.inner.cache.get(PRODUCTS_CACHE_KEY).await.is_none());
    }

    #[test]
    fn test_parse_products() {
        let body = r#"{
            "result": [
                {"id": "a1", "name": "Wireless Headphones", "price": 250,
                 "image": "https://cdn.sanity.io/images/p/d/abc-400x300.jpg",
                 "category": "Audio", "in_stock": true},
                {"id": "a2", "name": "Smart Watch", "price": 400,
                 "image": null, "category": null, "in_stock": null}
            ]
        }"#;

        let products = parse_products(body).unwrap();
        assert_eq!(products.len(), 2);

        assert_eq!(products[0].id, ProductId::new("a1"));
        assert_eq!(products[0].name, "Wireless Headphones");
        assert_eq!(products[0].price, Price::from(250));
        assert_eq!(products[0].category.as_deref(), Some("Audio"));

        // Missing in_stock defaults to available
        assert!(products[1].in_stock);
        assert!(products[1].image.is_none());
    }

    #[test]
    fn test_parse_skips_incomplete_documents() {
        let body = r#"{
            "result": [
                {"id": "draft", "name": null, "price": 10},
                {"id": "unpriced", "name": "No Price", "price": null},
                {"id": "negative", "name": "Bad Price", "price": -5},
                {"id": "ok", "name": "Fine", "price": 1}
            ]
        }"#;

        let products = parse_products(body).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::new("ok"));
    }

    #[test]
    fn test_parse_empty_result() {
        assert!(parse_products(r#"{"result": []}"#).unwrap().is_empty());
        assert!(parse_products(r#"{"result": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_products("not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_fractional_prices_parse_exactly() {
        let body = r#"{"result": [{"id": "f", "name": "Fraction", "price": 12.5}]}"#;
        let products = parse_products(body).unwrap();
        assert_eq!(products[0].price.to_string(), "12.5");
    }
}
