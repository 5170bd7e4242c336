//! Settings for the connection to the gateway.
//!
//! Read from the `[transport]` table of the merchant configuration:
//!
//! ```toml
//! [transport]
//! timeout_secs = 30
//! connect_timeout_secs = 10
//! pool_max_idle_per_host = 16
//! user_agent = "my-shop/2.1"
//! ```

use std::{ops::RangeInclusive, time::Duration};

use serde::Deserialize;

use crate::error::{IngenicoError, Result};

const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;
const CONNECT_TIMEOUT_RANGE: RangeInclusive<u64> = 1..=60;

/// HTTP settings for DirectLink calls.
///
/// The gateway answers a DirectLink order within its own processing window; `timeout_secs`
/// bounds the whole exchange and any expiry is reported as a transport failure.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Idle keep-alive connections kept per gateway host.
    pub pool_max_idle_per_host: usize,
    /// Whole-request deadline, in seconds (1-300).
    pub timeout_secs: u64,
    /// TCP and TLS connect deadline, in seconds (1-60).
    pub connect_timeout_secs: u64,
    /// `User-Agent` sent to the gateway.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 16,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl HttpConfig {
    /// Checks the deadlines are in range.
    ///
    /// # Errors
    ///
    /// [`IngenicoError::ConfigError`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        check_range("transport.timeout_secs", self.timeout_secs, TIMEOUT_RANGE)?;
        check_range("transport.connect_timeout_secs", self.connect_timeout_secs, CONNECT_TIMEOUT_RANGE)?;
        if self.user_agent.trim().is_empty() {
            return Err(IngenicoError::ConfigError("transport.user_agent must not be empty".to_owned()));
        }
        Ok(())
    }

    /// Whole-request deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect deadline.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn check_range(key: &str, value: u64, range: RangeInclusive<u64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(IngenicoError::ConfigError(format!(
            "{key} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )))
    }
}
