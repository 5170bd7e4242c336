//! ingenico-feedback: verifies a captured feedback request offline.
//!
//! Loads a merchant configuration, checks the `SHASIGN` of one feedback query string with the
//! SHA-OUT passphrase and prints the canonical status it maps to. Useful when reconciling
//! notifications from access logs or reproducing a rejected callback.
//!
//! ```bash
//! ingenico-feedback --config ingenico.toml \
//!     'orderID=12&STATUS=9&PAYID=32100123&NCERROR=0&SHASIGN=2091...'
//! ```
//!
//! Exit status: `0` verified and mapped, `1` unusable input or configuration, `2` signature
//! missing or wrong, `3` status not in the status table.

mod observability;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use ingenico_directlink::{
    CanonicalStatus, FieldSet, IngenicoError,
    config::GatewayConfig,
    feedback::FeedbackHandler,
    fields::names,
};
use tracing::{error, info};

use crate::observability::{LogFormat, init_observability};

/// Verify an Ingenico feedback query string against a merchant configuration.
#[derive(Debug, Parser)]
#[command(name = "ingenico-feedback", version, about)]
struct Cli {
    /// Merchant configuration (TOML).
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Print the verdict as JSON.
    #[arg(long)]
    json: bool,

    /// Feedback query string, or a full URL carrying one.
    query: String,
}

/// Fields of a query string; anything before a `?` is ignored.
fn parse_query(raw: &str) -> FieldSet {
    let query = raw.trim().split_once('?').map_or(raw.trim(), |(_, query)| query);
    url::form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

fn exit_code(result: &Result<CanonicalStatus, IngenicoError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(error) if error.is_authentication() => 2,
        Err(IngenicoError::UnmappedStatus(_)) => 3,
        Err(_) => 1,
    }
}

fn verdict(fields: &FieldSet, result: &Result<CanonicalStatus, IngenicoError>) -> serde_json::Value {
    let field = |name| fields.get(name).unwrap_or_default();
    match result {
        Ok(status) => serde_json::json!({
            "verified": true,
            "status": status.as_str(),
            "gateway_status": field(names::STATUS),
            "order_id": field(names::ORDERID),
            "pay_id": field(names::PAYID),
        }),
        Err(error) => serde_json::json!({
            "verified": !error.is_authentication(),
            "error": error.to_string(),
            "gateway_status": field(names::STATUS),
            "order_id": field(names::ORDERID),
            "pay_id": field(names::PAYID),
        }),
    }
}

#[allow(clippy::print_stdout, reason = "stdout carries the verdict")]
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_observability(LogFormat::from_env());

    let config = match GatewayConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "cannot load configuration");
            return ExitCode::from(1);
        }
    };

    let handler = FeedbackHandler::new(&config);
    let fields = parse_query(&cli.query).to_uppercase_names();
    let result = handler.evaluate(&fields);

    match &result {
        Ok(status) => info!(%status, "feedback verified"),
        Err(e) => error!(error = %e, "feedback rejected"),
    }

    if cli.json {
        println!("{}", verdict(&fields, &result));
    } else {
        match &result {
            Ok(status) => println!("{status}"),
            Err(e) => println!("REJECTED: {e}"),
        }
    }

    ExitCode::from(exit_code(&result))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_arguments() {
        let cli = Cli::try_parse_from(["ingenico-feedback", "-c", "shop.toml", "--json", "STATUS=9"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("shop.toml"));
        assert!(cli.json);
        assert_eq!(cli.query, "STATUS=9");
    }

    #[test]
    fn test_parse_query() {
        let fields = parse_query("orderID=12&STATUS=9&NCERRORPLUS=%21&CN=Jane+Doe");
        assert_eq!(fields.get("ORDERID"), Some("12"));
        assert_eq!(fields.get("NCERRORPLUS"), Some("!"));
        assert_eq!(fields.get("CN"), Some("Jane Doe"));

        let from_url = parse_query("https://shop.example.com/feedback?STATUS=5&PAYID=1");
        assert_eq!(from_url.get("STATUS"), Some("5"));
        assert_eq!(from_url.len(), 2);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&Ok(CanonicalStatus::Open)), 0);
        assert_eq!(exit_code(&Err(IngenicoError::SignatureMismatch)), 2);
        assert_eq!(exit_code(&Err(IngenicoError::MissingSignature)), 2);
        assert_eq!(exit_code(&Err(IngenicoError::UnmappedStatus("46".to_owned()))), 3);
        assert_eq!(exit_code(&Err(IngenicoError::ConfigError("bad".to_owned()))), 1);
    }

    #[test]
    fn test_verdict_json() {
        let fields = parse_query("ORDERID=12&STATUS=9&PAYID=32100123");

        let ok = verdict(&fields, &Ok(CanonicalStatus::Success));
        assert_eq!(ok["status"], "SUCCESS");
        assert_eq!(ok["pay_id"], "32100123");

        let rejected = verdict(&fields, &Err(IngenicoError::SignatureMismatch));
        assert_eq!(rejected["verified"], false);
        assert_eq!(rejected["order_id"], "12");
    }
}
