//! WhatsApp Shop Core - Shared types library.
//!
//! This crate provides the common types used by the WhatsApp Shop
//! components:
//! - `storefront` - Catalog, cart, and checkout logic
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
