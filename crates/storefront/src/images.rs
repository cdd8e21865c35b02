//! Product image resolution with tiered placeholder fallback.
//!
//! Resolution order for a product image:
//!
//! 1. the primary image reference, sized for display (unless absent or the
//!    caller reports that it failed to render)
//! 2. the product's own declared fallback image
//! 3. a category-keyed static placeholder (case-insensitive substring match)
//! 4. a generic default placeholder
//!
//! Resolution is a pure function of the product's image fields; the caller
//! owns the failed-to-render signal, since only the renderer can observe a
//! broken image.

use std::fmt::Write as _;
use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use url::Url;

use crate::catalog::Product;

/// Display size requested from the image CDN, matching the product grid.
pub const DISPLAY_WIDTH: u32 = 400;
/// Display height requested from the image CDN.
pub const DISPLAY_HEIGHT: u32 = 300;

static DEFAULT_PLACEHOLDER: LazyLock<String> =
    LazyLock::new(|| svg_placeholder("Image Unavailable", "#e5e7eb"));
static AUDIO_PLACEHOLDER: LazyLock<String> =
    LazyLock::new(|| svg_placeholder("Audio Device", "#3498f4"));
static ELECTRONICS_PLACEHOLDER: LazyLock<String> =
    LazyLock::new(|| svg_placeholder("Electronic Device", "#10b981"));
static ACCESSORY_PLACEHOLDER: LazyLock<String> =
    LazyLock::new(|| svg_placeholder("Accessory", "#f59e0b"));

/// Resolve the URL to display for a product.
///
/// `primary_failed` is the renderer-reported signal that the primary image
/// reference did not load; there is no network-awareness here.
#[must_use]
pub fn resolve(product: &Product, primary_failed: bool) -> String {
    if !primary_failed
        && let Some(image) = &product.image
    {
        return display_url(image);
    }

    if let Some(fallback) = &product.fallback_image {
        return fallback.clone();
    }

    category_placeholder(product.category.as_deref()).to_string()
}

/// Size an image URL for grid display.
///
/// Sanity CDN URLs get `w`/`h`/`fit=crop` query parameters (the CDN crops
/// server-side); any other URL is returned unchanged, since foreign hosts
/// do not understand those parameters.
#[must_use]
pub fn display_url(source: &str) -> String {
    let Ok(mut url) = Url::parse(source) else {
        return source.to_string();
    };

    let is_sanity_cdn = url
        .host_str()
        .is_some_and(|host| host == "cdn.sanity.io" || host.ends_with(".sanity.io"));
    if !is_sanity_cdn {
        return source.to_string();
    }

    url.query_pairs_mut()
        .append_pair("w", &DISPLAY_WIDTH.to_string())
        .append_pair("h", &DISPLAY_HEIGHT.to_string())
        .append_pair("fit", "crop");
    url.into()
}

/// Pick the static placeholder for a category.
///
/// Matching is a case-insensitive substring check, so "Audio Gadgets" and
/// "audio" both hit the audio placeholder, and "Accessories" matches the
/// accessory keyword.
#[must_use]
pub fn category_placeholder(category: Option<&str>) -> &'static str {
    let Some(category) = category else {
        return &DEFAULT_PLACEHOLDER;
    };

    let lower = category.to_lowercase();
    if lower.contains("audio") {
        &AUDIO_PLACEHOLDER
    } else if lower.contains("electronic") {
        &ELECTRONICS_PLACEHOLDER
    } else if lower.contains("accessor") {
        &ACCESSORY_PLACEHOLDER
    } else {
        &DEFAULT_PLACEHOLDER
    }
}

/// Build a self-contained placeholder image as a base64 SVG data URI.
///
/// A data URI always renders; it is the tier that cannot fail.
#[must_use]
pub fn svg_placeholder(label: &str, color: &str) -> String {
    let mut svg = String::with_capacity(256);
    let _ = write!(
        svg,
        "<svg width=\"{DISPLAY_WIDTH}\" height=\"{DISPLAY_HEIGHT}\" \
         xmlns=\"http://www.w3.org/2000/svg\">\
         <rect width=\"{DISPLAY_WIDTH}\" height=\"{DISPLAY_HEIGHT}\" fill=\"{color}\"/>\
         <text x=\"200\" y=\"150\" font-family=\"Arial\" font-size=\"18\" \
         fill=\"white\" text-anchor=\"middle\" dy=\".3em\">{}</text>\
         </svg>",
        escape_xml(label)
    );

    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

/// Escape the XML special characters in a text node.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
