//! DirectLink: server-to-server order submission.
//!
//! The merchant posts the signed order (card data included) straight to the gateway and gets an
//! `<ncresponse>` back in the same HTTP exchange:
//!
//! 1. build the order fields, `USERID`/`PSWD`/`OPERATION`, card data and, with 3-D Secure, the
//!    browser headers and redirect URLs
//! 2. sign with the SHA-IN passphrase
//! 3. post through the [`Transport`](crate::transport::Transport)
//! 4. parse the answer; a non-zero `NCERROR` is a [`GatewayRejection`](crate::IngenicoError::GatewayRejection)
//! 5. map `STATUS` and report it to the [`Payment`](crate::payment::Payment)
//!
//! When the answer carries an `HTML_ANSWER`, the shopper has to complete 3-D Secure
//! identification on that page before the order can finish; the final status then arrives as a
//! feedback notification.
//!
//! One order is exactly one request. Nothing here retries.

mod client;
mod gateway;

pub use client::DirectLinkClient;
pub use gateway::{DirectLinkGateway, DirectLinkOutcome, HTML_ANSWER_META_KEY};
