//! Gateway XML responses.

use std::borrow::Cow;

mod order_response;

pub use order_response::OrderResponse;

/// Decodes gateway text: UTF-8 when valid, otherwise ISO-8859-1.
///
/// The non-UTF-8 endpoints answer in Latin-1, where every byte is one code point.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}
