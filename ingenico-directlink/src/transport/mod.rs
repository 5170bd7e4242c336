//! Transport abstraction.
//!
//! The gateway flows need exactly one thing from the network: post a form to a URL and get the
//! response body back. [`Transport`] captures that contract; [`HttpTransport`] implements it with
//! reqwest. Certificates, proxies and connection pooling stay inside the transport, and no
//! implementation retries on its own.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ingenico_directlink::{
//!     fields::FieldSet,
//!     transport::{HttpTransport, Transport},
//! };
//!
//! # async fn example() -> ingenico_directlink::error::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let mut fields = FieldSet::new();
//! fields.set("PSPID", "MyPSPID");
//!
//! let body = transport
//!     .post_form("https://secure.ogone.com/ncol/test/orderdirect.asp", &fields)
//!     .await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::{error::Result, fields::FieldSet};

pub mod config;
pub mod http;

pub use config::HttpConfig;
pub use http::HttpTransport;

/// Form-posting transport.
///
/// Implementations must report network failures, timeouts and non-success HTTP statuses as
/// errors for which [`IngenicoError::is_transport`](crate::error::IngenicoError::is_transport)
/// is `true`.
pub trait Transport: Send + Sync {
    /// Posts `fields` as `application/x-www-form-urlencoded` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or the gateway answers with a non-success
    /// status.
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        fields: &'a FieldSet,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}
