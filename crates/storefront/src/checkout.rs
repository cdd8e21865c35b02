//! WhatsApp checkout composition.
//!
//! Checkout is a hand-off, not a transaction: the cart is rendered into a
//! human-readable order message and embedded, percent-encoded, in a
//! `https://api.whatsapp.com/send?phone=..&text=..` deep-link. Fulfillment
//! happens in the conversation that link opens.

use std::fmt::Write as _;

use thiserror::Error;
use url::Url;

use crate::cart::Cart;

/// Template host for the messaging deep-link.
const WHATSAPP_SEND_URL: &str = "https://api.whatsapp.com/send";

/// Errors from checkout composition.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Composing from an empty cart is disallowed; the UI is expected to
    /// disable the action, this guard is the backstop.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// The deep-link did not form a valid URL.
    #[error("failed to build checkout link: {0}")]
    Link(#[from] url::ParseError),
}

/// A composed checkout: the plain-text order and its deep-link.
#[derive(Debug, Clone)]
pub struct CheckoutLink {
    /// Human-readable order message (also embedded in the URL).
    pub message: String,
    /// WhatsApp deep-link with the pre-filled message.
    pub url: Url,
}

/// Render the cart into the order message text.
///
/// One line per item with name, quantity, unit price and line total,
/// closed by a grand total equal to the cart subtotal.
///
/// # Errors
///
/// Fails with [`CheckoutError::EmptyCart`] when the cart has no lines.
pub fn order_message(cart: &Cart) -> Result<String, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut text = String::from("Hello! I would like to order:\n\n");
    for item in cart.items() {
        let _ = writeln!(
            text,
            "- {} x{} @ {} = {}",
            item.product.name,
            item.quantity(),
            item.product.price,
            item.line_total()
        );
    }
    let _ = write!(text, "\nTotal: {}", cart.subtotal());

    Ok(text)
}

/// Compose the order message and its WhatsApp deep-link.
///
/// `phone` is the configured destination number, already normalized to
/// digits (see [`crate::config::ShopConfig`]); it is a deployment-time
/// setting, never user input.
///
/// # Errors
///
/// Fails with [`CheckoutError::EmptyCart`] when the cart has no lines.
pub fn compose(cart: &Cart, phone: &str) -> Result<CheckoutLink, CheckoutError> {
    let message = order_message(cart)?;

    // urlencoding percent-encodes spaces and newlines (%20, %0A), which
    // WhatsApp requires inside the text parameter.
    let encoded = urlencoding::encode(&message);
    let url = Url::parse(&format!("{WHATSAPP_SEND_URL}?phone={phone}&text={encoded}"))?;

    Ok(CheckoutLink { message, url })
}
