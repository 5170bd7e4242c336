//! DirectLink checkout against the gateway's test platform.
//!
//! Submits one card order, prints the outcome, and shows where the 3-D Secure page ends up when
//! the gateway asks for identification.
//!
//! # Running this example
//!
//! ```bash
//! export INGENICO_CONFIG=ingenico.toml
//! cargo run --example directlink_checkout
//! ```
//!
//! The configuration needs at least `psp_id`, `user_id`, `password` and both passphrases; use
//! `mode = "test"` unless you mean to charge the card.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::use_debug,
    reason = "examples are allowed to use println and simple formatting"
)]

use std::env;

use ingenico_directlink::{
    IngenicoError,
    config::GatewayConfig,
    directlink::{DirectLinkGateway, HTML_ANSWER_META_KEY},
    payment::{BrowserContext, CardDetails, CustomerDetails, MemoryPaymentStore, OrderRequest},
    transport::HttpTransport,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::var("INGENICO_CONFIG").unwrap_or_else(|_| "ingenico.toml".to_owned());
    let config = GatewayConfig::from_file(&path)?;

    let transport = HttpTransport::with_config(&config.transport)?;
    let gateway = DirectLinkGateway::new(config, transport)?;

    let store = MemoryPaymentStore::new();
    let mut payment = store.create("1001");

    let order = OrderRequest::new("1001", "EUR", 1500)
        .with_description("Example order")
        .with_customer(CustomerDetails {
            name: "Jane Doe".to_owned(),
            email: "jane@example.com".to_owned(),
            country: "BE".to_owned(),
            ..CustomerDetails::default()
        })
        .with_card(CardDetails::new("4111111111111111", 12, 2030, "123"))
        .with_return_url("https://shop.example.com/return");
    let browser = BrowserContext::new("text/html", "Mozilla/5.0");

    match gateway.start(&mut payment, &order, &browser).await {
        Ok(outcome) => {
            println!("PAYID:  {}", outcome.pay_id());
            println!("STATUS: {} ({:?})", outcome.response.status, outcome.status);
            if outcome.requires_redirect() {
                println!("3-D Secure identification requested");
                println!("  page stored under meta key {HTML_ANSWER_META_KEY}");
            }
        }
        Err(IngenicoError::GatewayRejection(error)) => {
            eprintln!("Gateway rejected the order: {error}");
        }
        Err(error) if error.is_transport() => {
            eprintln!("Gateway unreachable, the payment is unchanged: {error}");
        }
        Err(error) => return Err(error.into()),
    }

    println!("Payment record: {:?}", store.record("1001"));
    Ok(())
}
