//! Bundled static product list.
//!
//! Used whenever the CMS fetch fails or comes back empty, so the shop never
//! renders an empty catalog. Every entry carries a self-contained declared
//! fallback image (a data URI) in addition to its hosted primary image.

use whatsapp_shop_core::{Price, ProductId};

use crate::images::svg_placeholder;

use super::Product;

/// (id, name, price, picsum seed, placeholder color, category)
const FALLBACK_ENTRIES: &[(&str, &str, i64, &str, &str, &str)] = &[
    ("1", "Wireless Headphones", 250, "headphones", "#3498f4", "Audio"),
    ("2", "Smart Watch", 400, "watch", "#10b981", "Wearables"),
    ("3", "Bluetooth Speaker", 180, "speaker", "#8f5cf6", "Audio"),
    ("4", "Smartphone Case", 45, "phonecase", "#f59e0b", "Accessories"),
    ("5", "Wireless Charger", 75, "charger", "#ef4444", "Charging"),
    ("6", "Gaming Mouse", 120, "mouse", "#6366f1", "Gaming"),
    ("7", "Laptop Stand", 85, "laptopstand", "#06b6d4", "Accessories"),
    ("8", "USB-C Hub", 65, "usbhub", "#84cc6f", "Accessories"),
    ("9", "Portable Power Bank", 55, "powerbank", "#fb7b19", "Charging"),
    ("10", "Webcam HD", 90, "webcam", "#f43f5e", "Electronics"),
    ("11", "Mechanical Keyboard", 150, "keyboard", "#374151", "Accessories"),
    ("12", "Phone Tripod", 35, "tripod", "#9c2749", "Photography"),
];

/// Build the bundled fallback catalog.
#[must_use]
pub fn fallback_products() -> Vec<Product> {
    FALLBACK_ENTRIES
        .iter()
        .map(|&(id, name, price, seed, color, category)| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Price::from(price),
            image: Some(format!("https://picsum.photos/400/300?random={seed}")),
            fallback_image: Some(svg_placeholder(name, color)),
            category: Some(category.to_string()),
            in_stock: true,
        })
        .collect()
}
