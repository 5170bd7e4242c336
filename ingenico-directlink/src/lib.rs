//! Ingenico DirectLink: signed order submission and feedback handling for the Ingenico
//! (Ogone) payment platform.
//!
//! The crate covers the trust boundary between a merchant checkout and the gateway:
//!
//! - **Field sets**: the key/value messages exchanged with the gateway, filled by typed builders
//! - **SHA signatures**: `SHASIGN` computation and verification (SHA-1, SHA-256, SHA-512)
//! - **Response parsing**: the `<ncresponse>` XML envelope, including the base64 3-D Secure page
//! - **Status mapping**: gateway status codes onto four canonical payment states
//! - **Flows**: DirectLink (server to server), OrderStandard (browser redirect) and inbound
//!   feedback notifications
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐      ┌──────────────────┐
//! │  OrderRequest    │──────│  Field builders  │
//! └──────────────────┘      └────────┬─────────┘
//!                                    │ FieldSet
//!                           ┌────────▼─────────┐
//!                           │  ShaSigner       │  SHA-IN passphrase
//!                           └────────┬─────────┘
//!                                    │ POST form
//!                           ┌────────▼─────────┐
//!                           │  Transport       │  reqwest
//!                           └────────┬─────────┘
//!                                    │ <ncresponse>
//!                           ┌────────▼─────────┐
//!                           │  OrderResponse   │──── status::transform ───▶ Payment
//!                           └──────────────────┘
//!
//! feedback query ──▶ ShaVerifier (SHA-OUT) ──▶ status::transform ──▶ Payment
//! ```
//!
//! # Quick Start
//!
//! ## 1. Submit a DirectLink order
//!
//! ```rust,no_run
//! use ingenico_directlink::{
//!     config::GatewayConfig,
//!     directlink::DirectLinkGateway,
//!     payment::{BrowserContext, CardDetails, CustomerDetails, MemoryPaymentStore, OrderRequest},
//!     transport::HttpTransport,
//! };
//!
//! # async fn example() -> ingenico_directlink::Result<()> {
//! let config = GatewayConfig::from_file("ingenico.toml")?;
//! let gateway = DirectLinkGateway::new(config, HttpTransport::new()?)?;
//!
//! let store = MemoryPaymentStore::new();
//! let mut payment = store.create("42");
//!
//! let order = OrderRequest::new("42", "EUR", 1500)
//!     .with_description("Order #42")
//!     .with_customer(CustomerDetails { name: "Jane Doe".to_owned(), ..CustomerDetails::default() })
//!     .with_card(CardDetails::new("4111111111111111", 12, 2030, "123"))
//!     .with_return_url("https://shop.example.com/return");
//!
//! let outcome = gateway.start(&mut payment, &order, &BrowserContext::default()).await?;
//! println!("PAYID {} status {:?}", outcome.pay_id(), outcome.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Handle a feedback notification
//!
//! ```rust,no_run
//! use ingenico_directlink::{
//!     config::GatewayConfig, feedback::FeedbackHandler, fields::FieldSet,
//!     payment::MemoryPaymentStore,
//! };
//!
//! # fn example(query: &str) -> ingenico_directlink::Result<()> {
//! let config = GatewayConfig::from_file("ingenico.toml")?;
//! let handler = FeedbackHandler::new(&config);
//! let store = MemoryPaymentStore::new();
//!
//! let fields: FieldSet = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();
//! let outcome = handler.listen(&store, &fields);
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`fields`]: field sets, wire names and builders
//! - [`sha`]: signature engine
//! - [`status`]: status table and mapper
//! - [`xml`]: DirectLink response parser
//! - [`transport`]: form-posting transport abstraction and its reqwest implementation
//! - [`config`]: merchant account configuration
//! - [`payment`]: persisted-payment collaborator and order model
//! - [`directlink`]: server-to-server order flow
//! - [`order_standard`]: browser redirect flow
//! - [`feedback`]: inbound notification handling
//! - [`security`]: audit logging and redaction
//! - [`error`]: error types
//!
//! # Security Considerations
//!
//! - **Passphrases and API password** are [`secrecy::SecretString`] and never appear in `Debug`
//! - **Card data** is zeroized on drop and masked in audit records
//! - **HTTPS only**: the reqwest transport refuses plain HTTP and loopback endpoints
//! - **Feedback** is applied only after its `SHASIGN` matches, compared in constant time
//! - **Unknown statuses** never change a payment; they are escalated through the audit log

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and quick-xml"
)]

pub mod config;
pub mod directlink;
pub mod error;
pub mod feedback;
pub mod fields;
pub mod order_standard;
pub mod payment;
pub mod security;
pub mod sha;
pub mod status;
pub mod transport;
pub mod xml;

pub use error::{GatewayError, IngenicoError, Result};
pub use fields::FieldSet;
pub use status::CanonicalStatus;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = std::marker::PhantomData::<IngenicoError>;
        let _ = FieldSet::new();
        assert_eq!(CanonicalStatus::Success.as_str(), "SUCCESS");
    }
}
