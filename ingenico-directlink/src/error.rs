//! Error types for the Ingenico DirectLink integration.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Transport Errors** ([`IngenicoError::TransportFailure`], [`IngenicoError::HttpError`]):
//!   the gateway could not be reached or answered with a non-success HTTP status
//! - **Response Errors** ([`IngenicoError::MalformedResponse`]): the body was not a readable
//!   order response
//! - **Gateway Errors** ([`IngenicoError::GatewayRejection`]): the gateway answered with an
//!   `NCERROR` code
//! - **Authentication Errors** ([`IngenicoError::SignatureMismatch`],
//!   [`IngenicoError::MissingSignature`]): an inbound notification failed `SHASIGN` verification
//! - **Escalations** ([`IngenicoError::UnmappedStatus`]): a status code outside the known table
//! - **Setup Errors** ([`IngenicoError::ConfigError`], [`IngenicoError::InvalidInput`])
//!
//! # Examples
//!
//! ```
//! use ingenico_directlink::error::{GatewayError, IngenicoError};
//!
//! let rejection = IngenicoError::from(GatewayError::new("50001111", "Data validation error"));
//! assert_eq!(rejection.to_string(), "Gateway rejected the order: 50001111 Data validation error");
//! ```

use thiserror::Error;

/// Result type alias for DirectLink operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, IngenicoError>;

/// Error reported by the gateway in the `NCERROR` / `NCERRORPLUS` attributes.
///
/// The string form is `"<code> <explanation>"`, separated by one space. Log
/// consumers parse this format, so it must not change.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::error::GatewayError;
///
/// let error = GatewayError::new("50001111", "Data validation error");
/// assert_eq!(error.to_string(), "50001111 Data validation error");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} {explanation}")]
pub struct GatewayError {
    /// Gateway error code (`NCERROR`).
    pub code: String,
    /// Human readable explanation (`NCERRORPLUS`).
    pub explanation: String,
}

impl GatewayError {
    /// Creates a gateway error from its code and explanation.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(code: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self { code: code.into(), explanation: explanation.into() }
    }
}

/// Errors that can occur while talking to the Ingenico gateway.
///
/// # Error Recovery
///
/// - **Transport errors** ([`TransportFailure`](Self::TransportFailure),
///   [`HttpError`](Self::HttpError)): the order state is unknown; the caller decides whether to
///   retry. Nothing in this crate retries.
/// - **Malformed responses** ([`MalformedResponse`](Self::MalformedResponse)): the payment keeps
///   its prior state.
/// - **Gateway rejections** ([`GatewayRejection`](Self::GatewayRejection)): fix the order data
///   or the account setup and submit again.
/// - **Authentication failures** ([`SignatureMismatch`](Self::SignatureMismatch),
///   [`MissingSignature`](Self::MissingSignature)): the notification is dropped.
/// - **Unmapped statuses** ([`UnmappedStatus`](Self::UnmappedStatus)): needs an operator.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum IngenicoError {
    /// The gateway could not be reached or answered with a non-success HTTP status.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS and TLS failures.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The response body could not be parsed as an order response.
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// The gateway answered with a non-empty error code.
    #[error("Gateway rejected the order: {0}")]
    GatewayRejection(#[from] GatewayError),

    /// The inbound `SHASIGN` does not match the locally computed digest.
    #[error("SHA signature mismatch")]
    SignatureMismatch,

    /// The inbound request carries no `SHASIGN` field.
    #[error("SHA signature missing from request")]
    MissingSignature,

    /// The gateway status code is not in the known status table.
    ///
    /// The payment is left untouched; an operator has to look at it.
    #[error("Unmapped gateway status: {0:?}")]
    UnmappedStatus(String),

    /// The merchant configuration is incomplete or invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Caller supplied input that cannot be turned into a request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IngenicoError {
    /// Returns `true` when the error happened at the transport boundary.
    ///
    /// ```
    /// use ingenico_directlink::error::IngenicoError;
    ///
    /// assert!(IngenicoError::TransportFailure("timeout".into()).is_transport());
    /// assert!(!IngenicoError::SignatureMismatch.is_transport());
    /// ```
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::TransportFailure(_) | Self::HttpError(_))
    }

    /// Returns `true` for inbound authentication failures.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::SignatureMismatch | Self::MissingSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display_is_code_space_explanation() {
        let error = GatewayError::new("code", "explanation");
        assert_eq!(error.to_string(), "code explanation");
    }

    #[test]
    fn test_gateway_error_keeps_explanation_verbatim() {
        let error = GatewayError::new("50001111", "Data validation error: ED!");
        assert_eq!(error.to_string(), "50001111 Data validation error: ED!");
    }

    #[test]
    fn test_gateway_rejection_from_gateway_error() {
        let error: IngenicoError = GatewayError::new("50001111", "Data validation error").into();
        assert!(matches!(error, IngenicoError::GatewayRejection(ref e) if e.code == "50001111"));
        assert!(!error.is_transport());
    }

    #[test]
    fn test_transport_predicate() {
        assert!(IngenicoError::TransportFailure("HTTP 503".to_owned()).is_transport());
        assert!(!IngenicoError::MalformedResponse("eof".to_owned()).is_transport());
        assert!(!IngenicoError::ConfigError("psp_id".to_owned()).is_transport());
    }

    #[test]
    fn test_authentication_predicate() {
        assert!(IngenicoError::SignatureMismatch.is_authentication());
        assert!(IngenicoError::MissingSignature.is_authentication());
        assert!(!IngenicoError::UnmappedStatus("46".to_owned()).is_authentication());
    }

    #[test]
    fn test_unmapped_status_display_quotes_code() {
        let error = IngenicoError::UnmappedStatus(String::new());
        assert_eq!(error.to_string(), "Unmapped gateway status: \"\"");
    }
}
