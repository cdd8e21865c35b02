//! End-to-end session flow tests.
//!
//! These exercise the session story the UI drives: degrade to the bundled
//! catalog, shop, survive a broken persistence layer, hand the order off
//! to WhatsApp, and come back later to a restored cart.

use whatsapp_shop_core::{Price, ProductId};
use whatsapp_shop_storefront::cart::storage::{
    CartSnapshot, CartStorage, JsonFileStorage, StorageError,
};
use whatsapp_shop_storefront::catalog::{CatalogError, catalog_or_fallback};
use whatsapp_shop_storefront::session::ShopSession;

/// Make session logging visible under `RUST_LOG` when a test fails.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Storage that is always unavailable (private browsing analog).
struct UnavailableStorage;

impl CartStorage for UnavailableStorage {
    fn save(&self, _snapshot: &CartSnapshot) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("quota exceeded")))
    }

    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        Err(StorageError::Io(std::io::Error::other("quota exceeded")))
    }
}

fn fallback_catalog() -> Vec<whatsapp_shop_storefront::catalog::Product> {
    catalog_or_fallback(Err(CatalogError::Status {
        code: 502,
        body: "bad gateway".to_string(),
    }))
}

#[test]
fn shopping_flow_over_fallback_catalog() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = JsonFileStorage::in_dir(dir.path());

    let mut session =
        ShopSession::resume(fallback_catalog(), storage, "4915112345678".to_string());

    // Degraded catalog still has the bundled products
    assert_eq!(session.products().len(), 12);

    let headphones = session
        .product(&ProductId::new("1"))
        .expect("headphones in fallback catalog")
        .clone();
    let watch = session
        .product(&ProductId::new("2"))
        .expect("watch in fallback catalog")
        .clone();

    session.add_item(headphones, 2).expect("add headphones");
    session.add_item(watch, 1).expect("add watch");

    assert_eq!(session.cart().item_count(), 3);
    assert_eq!(session.cart().subtotal(), Price::from(900));

    let link = session.checkout_link().expect("non-empty cart composes");
    assert!(link.message.ends_with("Total: 900"));
    assert_eq!(link.url.host_str(), Some("api.whatsapp.com"));

    session.finish_checkout();
    assert!(session.cart().is_empty());
    assert!(session.checkout_link().is_err());
}

#[test]
fn cart_survives_unavailable_storage() {
    init_tracing();
    let mut session = ShopSession::resume(
        fallback_catalog(),
        UnavailableStorage,
        "4915112345678".to_string(),
    );

    let product = session
        .product(&ProductId::new("3"))
        .expect("speaker in fallback catalog")
        .clone();

    // Persistence fails on every mutation; the in-memory cart must not care
    session.add_item(product, 2).expect("mutation succeeds");
    session
        .set_quantity(&ProductId::new("3"), 5)
        .expect("mutation succeeds");

    assert_eq!(session.cart().item_count(), 5);

    session.remove_item(&ProductId::new("3"));
    assert!(session.cart().is_empty());
}

#[test]
fn cart_is_restored_across_sessions() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let storage = JsonFileStorage::in_dir(dir.path());
        let mut session =
            ShopSession::resume(fallback_catalog(), storage, "4915112345678".to_string());
        let product = session
            .product(&ProductId::new("6"))
            .expect("mouse in fallback catalog")
            .clone();
        session.add_item(product, 2).expect("add");
    }

    // A fresh session over the same storage sees the persisted cart
    let storage = JsonFileStorage::in_dir(dir.path());
    let session = ShopSession::resume(fallback_catalog(), storage, "4915112345678".to_string());

    assert_eq!(session.cart().item_count(), 2);
    let item = session
        .cart()
        .get(&ProductId::new("6"))
        .expect("restored line");
    assert_eq!(item.product.name, "Gaming Mouse");
    // Price captured at add time rides along in the snapshot
    assert_eq!(item.product.price, Price::from(120));
}

#[test]
fn rejected_mutations_do_not_persist_changes() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = JsonFileStorage::in_dir(dir.path());
    let mut session =
        ShopSession::resume(fallback_catalog(), storage, "4915112345678".to_string());

    let product = session
        .product(&ProductId::new("4"))
        .expect("case in fallback catalog")
        .clone();
    session.add_item(product.clone(), 1).expect("add");

    assert!(session.add_item(product, 0).is_err());
    assert!(session.set_quantity(&ProductId::new("ghost"), 2).is_err());

    // The snapshot on disk matches the unchanged in-memory cart
    let storage = JsonFileStorage::in_dir(dir.path());
    let restored = ShopSession::resume(fallback_catalog(), storage, "4915112345678".to_string());
    assert_eq!(restored.cart().item_count(), 1);
}
