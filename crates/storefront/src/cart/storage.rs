//! Best-effort cart persistence.
//!
//! The browser analog is localStorage under a fixed, origin-scoped key:
//! storage may silently be unavailable, and a failed save must never block
//! the in-memory mutation. Callers log [`StorageError`]s and move on.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cart, CartItem};

/// Fixed storage key the cart snapshot is kept under.
pub const STORAGE_KEY: &str = "whatsapp-shop-cart";

/// Errors from the persistence layer. Logged, never propagated to users.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot (de)serialization failed.
    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A point-in-time snapshot of the cart contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// The cart lines, in display order.
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    /// Snapshot the current cart state.
    #[must_use]
    pub fn of_cart(cart: &Cart) -> Self {
        Self {
            saved_at: Utc::now(),
            items: cart.items().to_vec(),
        }
    }
}

/// Persistence seam for the cart.
///
/// Implementations are best-effort: the session treats every error as
/// "storage unavailable", logs it, and keeps the in-memory cart.
pub trait CartStorage {
    /// Persist a snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store is unavailable.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError>;

    /// Load the last snapshot, or `None` when nothing was persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing store is unavailable or
    /// the stored snapshot cannot be decoded.
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError>;
}

/// JSON-file-backed storage, the localStorage analog.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Store the snapshot at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the snapshot under the fixed key inside a directory.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// The file the snapshot is kept in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(snapshot)?;
        std::fs::write(&self.path, encoded)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use whatsapp_shop_core::{Price, ProductId};

    use crate::catalog::Product;

    use super::*;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            Product {
                id: ProductId::new("1"),
                name: "Wireless Headphones".to_string(),
                price: Price::from(250),
                image: None,
                fallback_image: None,
                category: Some("Audio".to_string()),
                in_stock: true,
            },
            2,
        )
        .unwrap();
        cart
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::in_dir(dir.path());

        let cart = sample_cart();
        storage.save(&CartSnapshot::of_cart(&cart)).unwrap();

        let snapshot = storage.load().unwrap().expect("snapshot present");
        let restored = Cart::from_items(snapshot.items);
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_load_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::in_dir(dir.path());
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "{ not json").unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, StorageError::Encoding(_)));
    }

    #[test]
    fn test_save_into_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nope").join("cart.json"));

        let err = storage.save(&CartSnapshot::of_cart(&sample_cart())).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_file_name_uses_fixed_key() {
        let storage = JsonFileStorage::in_dir("/tmp");
        assert!(storage.path().ends_with("whatsapp-shop-cart.json"));
    }
}
