//! Merchant account configuration.
//!
//! One [`GatewayConfig`] describes one Ingenico merchant account. It is read from TOML, checked
//! with [`GatewayConfig::validate`] and then owned by a gateway for its whole lifetime.
//!
//! ```toml
//! psp_id = "MyPSPID"
//! mode = "test"
//! user_id = "api-user"
//! password = "api-password"
//! sha_in_passphrase = "Mysecretsig1875!?"
//! sha_out_passphrase = "Myothersig1875!?"
//! hash_algorithm = "sha512"
//! enable_3d_secure = true
//! order_id = "{order_id}-{payment_id}"
//! home_url = "https://shop.example.com/"
//!
//! [signature]
//! inbound_fields = ["ORDERID", "PAYID", "STATUS", "NCERROR", "AMOUNT", "CURRENCY"]
//!
//! [transport]
//! timeout_secs = 20
//! ```

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::{
    error::{IngenicoError, Result},
    sha::{Direction, HashAlgorithm, ShaSigner, ShaVerifier, SignableFields},
    transport::HttpConfig,
};

const ENDPOINT_BASE: &str = "https://secure.ogone.com/ncol";

/// Gateway environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Test platform.
    Test,
    /// Live platform.
    #[default]
    Production,
}

impl Mode {
    const fn path(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Production => "prod",
        }
    }
}

/// DirectLink operation code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Operation {
    /// Authorisation with immediate data capture.
    #[default]
    #[serde(rename = "SAL", alias = "sale")]
    Sale,
    /// Authorisation only.
    #[serde(rename = "RES", alias = "authorization")]
    Authorization,
}

impl Operation {
    /// Wire value for `OPERATION`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "SAL",
            Self::Authorization => "RES",
        }
    }
}

/// Overrides for the built-in signable-field lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignatureConfig {
    /// Replacement SHA-IN list.
    #[serde(default)]
    pub outbound_fields: Option<Vec<String>>,
    /// Replacement SHA-OUT list.
    #[serde(default)]
    pub inbound_fields: Option<Vec<String>>,
}

impl SignatureConfig {
    /// Signable fields for a direction, falling back to the built-in list.
    #[must_use]
    pub fn signable_fields(&self, direction: Direction) -> SignableFields {
        let custom = match direction {
            Direction::Outbound => self.outbound_fields.as_ref(),
            Direction::Inbound => self.inbound_fields.as_ref(),
        };
        custom.map_or_else(|| SignableFields::default_for(direction), SignableFields::from_names)
    }

    fn validate(&self) -> Result<()> {
        for (key, list) in
            [("outbound_fields", &self.outbound_fields), ("inbound_fields", &self.inbound_fields)]
        {
            if let Some(list) = list
                && list.iter().all(|name| name.trim().is_empty())
            {
                return Err(IngenicoError::ConfigError(format!(
                    "signature.{key} must name at least one field"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration of one merchant account.
///
/// Secrets are [`SecretString`]s and never show up in `Debug` output.
#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    /// Merchant account identifier.
    pub psp_id: String,

    /// Test or production platform.
    #[serde(default)]
    pub mode: Mode,

    /// Use the UTF-8 endpoints.
    #[serde(default)]
    pub utf8: bool,

    /// DirectLink API user.
    #[serde(default)]
    pub user_id: Option<String>,

    /// DirectLink API user password.
    #[serde(default)]
    pub password: Option<SecretString>,

    /// SHA-IN passphrase, signs outbound requests.
    #[serde(alias = "sha_in_passphrase")]
    pub outbound_secret: SecretString,

    /// SHA-OUT passphrase, verifies inbound feedback.
    #[serde(alias = "sha_out_passphrase")]
    pub inbound_secret: SecretString,

    /// Digest used for `SHASIGN`.
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Send 3-D Secure fields with DirectLink orders.
    #[serde(default, alias = "enabled_3d_secure")]
    pub enable_3d_secure: bool,

    /// DirectLink operation.
    #[serde(default)]
    pub operation: Operation,

    /// DirectLink endpoint override.
    #[serde(default)]
    pub api_url: Option<String>,

    /// OrderStandard form action override.
    #[serde(default)]
    pub form_action_url: Option<String>,

    /// `ORDERID` template; `{payment_id}` and `{order_id}` are substituted.
    #[serde(default = "default_order_id_template")]
    pub order_id: String,

    /// `PARAMVAR` template; `{home_url}` is substituted.
    #[serde(default)]
    pub param_var: Option<String>,

    /// Dynamic template page (`TP`).
    #[serde(default)]
    pub template_page: Option<String>,

    /// Shop home URL, used for the 3-D Secure redirect page.
    #[serde(default)]
    pub home_url: Option<String>,

    /// Signable-field overrides.
    #[serde(default)]
    pub signature: SignatureConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub transport: HttpConfig,
}

fn default_order_id_template() -> String {
    "{payment_id}".to_owned()
}

impl GatewayConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::ConfigError`] if the document cannot be parsed or fails
    /// validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use ingenico_directlink::config::GatewayConfig;
    ///
    /// let config = GatewayConfig::from_toml(r#"
    ///     psp_id = "MyPSPID"
    ///     sha_in_passphrase = "in-secret"
    ///     sha_out_passphrase = "out-secret"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.directlink_url(), "https://secure.ogone.com/ncol/prod/orderdirect.asp");
    /// assert!(!format!("{config:?}").contains("in-secret"));
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| IngenicoError::ConfigError(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::ConfigError`] if the file cannot be read or is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            IngenicoError::ConfigError(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Validates the configuration.
    ///
    /// Checks that:
    /// - `psp_id` and both passphrases are not empty
    /// - `api_url` and `form_action_url` overrides are HTTPS URLs
    /// - `home_url` is an absolute URL
    /// - the `ORDERID` template is not empty
    /// - signable-field overrides name at least one field
    /// - transport timeouts are in range
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::ConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.psp_id.trim().is_empty() {
            return Err(IngenicoError::ConfigError("psp_id must not be empty".to_owned()));
        }
        if self.outbound_secret.expose_secret().is_empty() {
            return Err(IngenicoError::ConfigError(
                "outbound_secret (SHA-IN passphrase) must not be empty".to_owned(),
            ));
        }
        if self.inbound_secret.expose_secret().is_empty() {
            return Err(IngenicoError::ConfigError(
                "inbound_secret (SHA-OUT passphrase) must not be empty".to_owned(),
            ));
        }
        if self.order_id.trim().is_empty() {
            return Err(IngenicoError::ConfigError("order_id template must not be empty".to_owned()));
        }

        for (key, value) in [("api_url", &self.api_url), ("form_action_url", &self.form_action_url)]
        {
            if let Some(url) = value {
                validate_https_url(key, url)?;
            }
        }

        if let Some(home_url) = &self.home_url {
            Url::parse(home_url).map_err(|e| {
                IngenicoError::ConfigError(format!("invalid home_url '{home_url}': {e}"))
            })?;
        }

        self.signature.validate()?;
        self.transport.validate()
    }

    /// Additional checks for the DirectLink flow: API credentials are required.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::ConfigError`] when `user_id` or `password` is missing.
    pub fn validate_directlink(&self) -> Result<()> {
        if self.user_id.as_deref().is_none_or(|user| user.trim().is_empty()) {
            return Err(IngenicoError::ConfigError("DirectLink requires user_id".to_owned()));
        }
        if self.password.as_ref().is_none_or(|password| password.expose_secret().is_empty()) {
            return Err(IngenicoError::ConfigError("DirectLink requires password".to_owned()));
        }
        Ok(())
    }

    /// DirectLink endpoint for the configured mode and encoding.
    #[must_use]
    pub fn directlink_url(&self) -> String {
        self.api_url.clone().unwrap_or_else(|| self.endpoint("orderdirect"))
    }

    /// OrderStandard form action for the configured mode and encoding.
    #[must_use]
    pub fn form_action(&self) -> String {
        self.form_action_url.clone().unwrap_or_else(|| self.endpoint("orderstandard"))
    }

    fn endpoint(&self, page: &str) -> String {
        let suffix = if self.utf8 { "_utf8" } else { "" };
        format!("{ENDPOINT_BASE}/{}/{page}{suffix}.asp", self.mode.path())
    }

    /// Renders the `ORDERID` template.
    ///
    /// ```
    /// use ingenico_directlink::config::GatewayConfig;
    ///
    /// let config = GatewayConfig::from_toml(r#"
    ///     psp_id = "MyPSPID"
    ///     sha_in_passphrase = "in"
    ///     sha_out_passphrase = "out"
    ///     order_id = "shop-{order_id}-{payment_id}"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.format_order_id("42", Some("1001")), "shop-1001-42");
    /// assert_eq!(config.format_order_id("42", None), "shop--42");
    /// ```
    #[must_use]
    pub fn format_order_id(&self, payment_id: &str, order_id: Option<&str>) -> String {
        self.order_id
            .replace("{payment_id}", payment_id)
            .replace("{order_id}", order_id.unwrap_or_default())
    }

    /// Renders the `PARAMVAR` template, if configured.
    #[must_use]
    pub fn format_param_var(&self) -> Option<String> {
        self.param_var.as_ref().map(|template| {
            template.replace("{home_url}", self.home_url.as_deref().unwrap_or_default())
        })
    }

    /// Signer for outbound requests (SHA-IN passphrase and list).
    #[must_use]
    pub fn outbound_signer(&self) -> ShaSigner {
        ShaSigner::new(
            SecretString::new(self.outbound_secret.expose_secret().clone()),
            self.hash_algorithm,
            Direction::Outbound,
        )
        .with_signable_fields(self.signature.signable_fields(Direction::Outbound))
    }

    /// Verifier for inbound feedback (SHA-OUT passphrase and list).
    #[must_use]
    pub fn inbound_verifier(&self) -> ShaVerifier {
        ShaVerifier::new(
            SecretString::new(self.inbound_secret.expose_secret().clone()),
            self.hash_algorithm,
        )
        .with_signable_fields(self.signature.signable_fields(Direction::Inbound))
    }
}

fn validate_https_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| IngenicoError::ConfigError(format!("invalid {key} '{value}': {e}")))?;

    if url.scheme() != "https" {
        return Err(IngenicoError::ConfigError(format!(
            "{key} must use HTTPS, got: {}",
            url.scheme()
        )));
    }
    Ok(())
}
