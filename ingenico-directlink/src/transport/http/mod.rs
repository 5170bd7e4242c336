//! HTTP transport implementation using reqwest.

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::config::HttpConfig;
use crate::{
    error::{IngenicoError, Result},
    fields::FieldSet,
    transport::Transport,
};

/// Validates URL for security constraints.
///
/// Ensures the URL uses HTTPS and does not point to localhost.
fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| IngenicoError::InvalidInput(format!("invalid gateway URL '{raw}': {e}")))?;

    if url.scheme() != "https" {
        return Err(IngenicoError::InvalidInput("Only HTTPS URLs are allowed".to_owned()));
    }

    if let Some(host) = url.host_str()
        && (host == "localhost" || host == "127.0.0.1" || host == "::1" || host == "[::1]")
    {
        return Err(IngenicoError::InvalidInput("Localhost URLs are not allowed".to_owned()));
    }

    Ok(url)
}

/// reqwest-backed [`Transport`].
///
/// Supports connection pooling and keep-alive; the timeouts of [`HttpConfig`] surface as
/// [`IngenicoError::HttpError`].
///
/// # Examples
///
/// ```
/// use ingenico_directlink::transport::{HttpConfig, HttpTransport};
///
/// let config = HttpConfig { timeout_secs: 20, ..HttpConfig::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with default settings.
    ///
    /// Default configuration:
    /// - Pool max idle per host: 16
    /// - Timeout: 30 seconds
    /// - Connect timeout: 10 seconds
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is out of range or the HTTP client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(IngenicoError::HttpError)?;

        Ok(Self { client })
    }

    #[instrument(skip(self, url, fields), fields(url = %url, field_count = fields.len()))]
    async fn execute_post(&self, url: Url, fields: &FieldSet) -> Result<Vec<u8>> {
        let form: Vec<(&str, &str)> = fields.iter().collect();

        let response = self.client.post(url).form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(IngenicoError::TransportFailure(format!(
                "gateway returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await.map_err(IngenicoError::HttpError)?.to_vec();
        debug!(status = status.as_u16(), body_len = body.len(), "gateway responded");
        Ok(body)
    }
}

impl Transport for HttpTransport {
    async fn post_form<'a>(&'a self, url: &'a str, fields: &'a FieldSet) -> Result<Vec<u8>> {
        let url = validate_url(url)?;
        self.execute_post(url, fields).await
    }

    fn protocol_name(&self) -> &'static str {
        "https"
    }
}
