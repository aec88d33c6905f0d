//! Cart snapshot codec.
//!
//! Carts round-trip through the client as base64url-encoded JSON. The
//! decoder only ever builds plain data: a size cap before decoding,
//! strict JSON into known types, then field-level validation. Nothing
//! in the payload can name a type or trigger behavior.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use emporium_core::ProductId;

/// Largest encoded snapshot accepted.
const MAX_ENCODED_BYTES: usize = 8 * 1024;

/// Most distinct items in one cart.
const MAX_ITEMS: usize = 50;

/// Quantity bounds per item.
const QUANTITY_RANGE: std::ops::RangeInclusive<u32> = 1..=99;

/// Errors from decoding or validating a cart snapshot.
#[derive(Debug, Error)]
pub enum CartError {
    /// Encoded payload over the size cap.
    #[error("cart payload too large")]
    TooLarge,

    /// Not valid base64url.
    #[error("cart payload is not valid base64")]
    BadEncoding,

    /// Not the expected JSON shape.
    #[error("cart payload is not a valid cart")]
    BadJson,

    /// Too many distinct items.
    #[error("cart has more than {MAX_ITEMS} items")]
    TooManyItems,

    /// A quantity outside the allowed range.
    #[error("item quantity must be between {} and {}", QUANTITY_RANGE.start(), QUANTITY_RANGE.end())]
    BadQuantity,
}

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A client-held cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    /// Encode to base64url JSON for the client.
    #[must_use]
    pub fn encode(&self) -> String {
        // Serializing a plain struct of integers cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode and validate a client-supplied snapshot.
    ///
    /// # Errors
    ///
    /// See [`CartError`] for each rejection.
    pub fn decode(encoded: &str) -> Result<Self, CartError> {
        if encoded.len() > MAX_ENCODED_BYTES {
            return Err(CartError::TooLarge);
        }

        let json = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| CartError::BadEncoding)?;
        let snapshot: Self = serde_json::from_slice(&json).map_err(|_| CartError::BadJson)?;

        if snapshot.items.len() > MAX_ITEMS {
            return Err(CartError::TooManyItems);
        }
        if snapshot
            .items
            .iter()
            .any(|item| !QUANTITY_RANGE.contains(&item.quantity))
        {
            return Err(CartError::BadQuantity);
        }

        Ok(snapshot)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
