//! WhatsApp Shop Storefront library.
//!
//! A small storefront: a product catalog sourced from a headless CMS
//! (Sanity), a per-session shopping cart, and a checkout that hands the
//! order off to WhatsApp as a pre-filled message instead of a payment
//! gateway.
//!
//! # Architecture
//!
//! - [`catalog`] - Sanity CMS client with a bundled static fallback list
//! - [`images`] - Display URL resolution with tiered placeholder fallback
//! - [`cart`] - In-memory cart with best-effort JSON persistence
//! - [`checkout`] - Order message and WhatsApp deep-link composition
//! - [`session`] - Per-session orchestrator wiring the pieces together
//!
//! The presentation layer (page rendering, styling) is out of scope; this
//! crate is the state and string-composition core behind it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod images;
pub mod session;
