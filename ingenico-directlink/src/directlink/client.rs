//! Posts field sets to the DirectLink endpoint and parses the answer.

use tracing::{debug, instrument};

use crate::{error::Result, fields::FieldSet, transport::Transport, xml::OrderResponse};

/// DirectLink endpoint client.
///
/// The client does not interpret the answer: a response carrying `NCERROR` is still returned as
/// `Ok`. Callers decide what a gateway error means for their payment.
///
/// # Examples
///
/// ```rust,no_run
/// use ingenico_directlink::{
///     directlink::DirectLinkClient, fields::FieldSet, transport::HttpTransport,
/// };
///
/// # async fn example(signed: FieldSet) -> ingenico_directlink::Result<()> {
/// let client = DirectLinkClient::new(
///     HttpTransport::new()?,
///     "https://secure.ogone.com/ncol/test/orderdirect.asp",
/// );
/// let response = client.submit(&signed).await?;
/// println!("STATUS={} NCERROR={}", response.status, response.nc_error);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DirectLinkClient<T> {
    transport: T,
    url: String,
}

impl<T: Transport> DirectLinkClient<T> {
    /// Creates a client for `url`.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(transport: T, url: impl Into<String>) -> Self {
        Self { transport, url: url.into() }
    }

    /// Endpoint the client posts to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Posts `fields` and parses the answer.
    ///
    /// # Errors
    ///
    /// Returns the transport's error when the request fails and
    /// [`IngenicoError::MalformedResponse`](crate::IngenicoError::MalformedResponse) when the
    /// body is not an order response.
    #[instrument(skip_all, fields(url = %self.url, protocol = self.transport.protocol_name()))]
    pub async fn submit(&self, fields: &FieldSet) -> Result<OrderResponse> {
        let body = self.transport.post_form(&self.url, fields).await?;
        debug!(body_len = body.len(), "received DirectLink answer");
        OrderResponse::parse(&body)
    }
}
