//! DirectLink order orchestration.

use std::time::Instant;

use secrecy::ExposeSecret;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::client::DirectLinkClient;
use crate::{
    audit,
    config::GatewayConfig,
    error::{IngenicoError, Result},
    feedback::{FeedbackHandler, FeedbackOutcome},
    fields::{CreditCardData, DirectLinkData, FieldSet, GeneralData, SecureData, Window3ds},
    payment::{BrowserContext, OrderRequest, Payment},
    security::audit::AuditEventType,
    sha::ShaSigner,
    status::{self, CanonicalStatus},
    transport::Transport,
    xml::OrderResponse,
};

/// Payment meta key holding the decoded 3-D Secure page.
pub const HTML_ANSWER_META_KEY: &str = "ogone_directlink_html_answer";

/// Successful DirectLink answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectLinkOutcome {
    /// Parsed gateway answer.
    pub response: OrderResponse,
    /// Canonical status applied to the payment; `None` when the gateway status is not in the
    /// status table and the payment was left unchanged.
    pub status: Option<CanonicalStatus>,
}

impl DirectLinkOutcome {
    /// Gateway transaction id.
    #[must_use]
    pub fn pay_id(&self) -> &str {
        &self.response.pay_id
    }

    /// Returns `true` when the shopper must be sent to the 3-D Secure page.
    #[must_use]
    pub const fn requires_redirect(&self) -> bool {
        self.response.html_answer.is_some()
    }
}

/// DirectLink gateway for one merchant account.
///
/// Owns the configuration for its whole lifetime. The configuration is validated once, in
/// [`DirectLinkGateway::new`], before any request can be sent.
///
/// # Examples
///
/// ```rust,no_run
/// use ingenico_directlink::{
///     config::GatewayConfig,
///     directlink::DirectLinkGateway,
///     payment::{BrowserContext, CardDetails, MemoryPaymentStore, OrderRequest},
///     transport::HttpTransport,
/// };
///
/// # async fn example() -> ingenico_directlink::Result<()> {
/// let config = GatewayConfig::from_file("ingenico.toml")?;
/// let gateway = DirectLinkGateway::new(config, HttpTransport::new()?)?;
///
/// let store = MemoryPaymentStore::new();
/// let mut payment = store.create("42");
/// let order = OrderRequest::new("42", "EUR", 1500)
///     .with_card(CardDetails::new("4111111111111111", 12, 2030, "123"))
///     .with_return_url("https://shop.example.com/return");
/// let browser = BrowserContext::new("text/html", "Mozilla/5.0");
///
/// let outcome = gateway.start(&mut payment, &order, &browser).await?;
/// if outcome.requires_redirect() {
///     // send the shopper to the page stored under HTML_ANSWER_META_KEY
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DirectLinkGateway<T> {
    config: GatewayConfig,
    signer: ShaSigner,
    client: DirectLinkClient<T>,
    feedback: FeedbackHandler,
}

impl<T: Transport> DirectLinkGateway<T> {
    /// Creates a gateway.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::ConfigError`] if the configuration is invalid or lacks the
    /// DirectLink API credentials.
    pub fn new(config: GatewayConfig, transport: T) -> Result<Self> {
        config.validate()?;
        config.validate_directlink()?;

        let signer = config.outbound_signer();
        let feedback = FeedbackHandler::new(&config);
        let client = DirectLinkClient::new(transport, config.directlink_url());

        Ok(Self { config, signer, client, feedback })
    }

    /// Merchant configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Feedback handler sharing this gateway's configuration.
    #[must_use]
    pub const fn feedback(&self) -> &FeedbackHandler {
        &self.feedback
    }

    /// Builds the unsigned DirectLink field set for an order.
    #[must_use]
    pub fn order_fields(&self, order: &OrderRequest, browser: &BrowserContext) -> FieldSet {
        let mut fields = order.order_fields(&self.config);

        let mut credentials = DirectLinkData::new(&mut fields);
        if let Some(user_id) = &self.config.user_id {
            credentials.user_id(user_id);
        }
        if let Some(password) = &self.config.password {
            credentials.password(password.expose_secret());
        }
        credentials.operation(self.config.operation);

        if let Some(card) = &order.card {
            CreditCardData::new(&mut fields)
                .number(card.number())
                .expiration_date(card.expiry_month(), card.expiry_year())
                .security_code(card.security_code());
        }

        if self.config.enable_3d_secure {
            SecureData::new(&mut fields)
                .flag(true)
                .http_accept(&browser.accept)
                .http_user_agent(&browser.user_agent)
                .window(Window3ds::MainWindow);
            GeneralData::new(&mut fields)
                .accept_url(&order.return_url)
                .decline_url(&order.return_url)
                .exception_url(&order.return_url)
                .complus("");
        }

        fields
    }

    /// Submits an order and reports the outcome to `payment`.
    ///
    /// On success the payment receives the `PAYID`, the return URL as action URL and the mapped
    /// status. With an `HTML_ANSWER` the page is stored under [`HTML_ANSWER_META_KEY`] and, when
    /// `home_url` is configured, the action URL points back to the shop with
    /// `payment_redirect=<payment id>`.
    ///
    /// # Errors
    ///
    /// - Transport errors and [`IngenicoError::MalformedResponse`]: the payment is unchanged.
    /// - [`IngenicoError::GatewayRejection`]: the status carried by the rejection, if it maps,
    ///   is applied first.
    #[instrument(
        skip_all,
        fields(psp_id = %self.config.psp_id, payment_id = %order.payment_id, amount = order.amount)
    )]
    pub async fn start<P: Payment>(
        &self,
        payment: &mut P,
        order: &OrderRequest,
        browser: &BrowserContext,
    ) -> Result<DirectLinkOutcome> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let psp_id = self.config.psp_id.as_str();

        let mut fields = self.order_fields(order, browser);
        self.signer.sign_into(&mut fields);
        let order_id = fields.get(crate::fields::names::ORDERID).unwrap_or_default().to_owned();
        audit!(AuditEventType::RequestSigned, psp_id, request_id, with_order_id(order_id.as_str()));

        info!(url = self.client.url(), "submitting DirectLink order");
        audit!(AuditEventType::OrderSubmitted, psp_id, request_id, with_order_id(order_id.as_str()));

        let response = match self.client.submit(&fields).await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "DirectLink order got no usable answer");
                audit!(
                    AuditEventType::TransportFailed,
                    psp_id,
                    request_id,
                    with_order_id(order_id.as_str()),
                    with_error(error.to_string()),
                    with_duration(started.elapsed())
                );
                return Err(error);
            }
        };

        if let Some(gateway_error) = response.gateway_error() {
            if !response.status.trim().is_empty() {
                self.apply_status(payment, &response, request_id);
            }
            warn!(%gateway_error, status = %response.status, "DirectLink order rejected");
            audit!(
                AuditEventType::OrderRejected,
                psp_id,
                request_id,
                with_order_id(order_id.as_str()),
                with_gateway_status(response.status.as_str()),
                with_error(gateway_error.to_string()),
                with_duration(started.elapsed())
            );
            return Err(IngenicoError::GatewayRejection(gateway_error));
        }

        payment.set_transaction_id(&response.pay_id);
        payment.set_action_url(&order.return_url);

        let awaiting_identification = response.html_answer.is_some()
            && status::is_identification_requested(&response.status);
        let status = if awaiting_identification {
            debug!(status = %response.status, "awaiting 3-D Secure identification");
            None
        } else {
            self.apply_status(payment, &response, request_id)
        };

        if let Some(html_answer) = &response.html_answer {
            payment.set_meta(HTML_ANSWER_META_KEY, html_answer);
            if let Some(home_url) = &self.config.home_url {
                payment.set_action_url(&redirect_url(home_url, &order.payment_id)?);
            }
        }

        audit!(
            AuditEventType::OrderAccepted,
            psp_id,
            request_id,
            with_order_id(order_id.as_str()),
            with_pay_id(response.pay_id.as_str()),
            with_gateway_status(response.status.as_str()),
            with_duration(started.elapsed())
        );

        Ok(DirectLinkOutcome { response, status })
    }

    /// Applies an inbound feedback notification to `payment`.
    ///
    /// See [`FeedbackHandler::update_status`].
    pub fn update_status<P: Payment>(&self, payment: &mut P, fields: &FieldSet) -> FeedbackOutcome {
        self.feedback.update_status(payment, fields)
    }

    /// Maps the response status and applies it; unmapped codes are escalated instead.
    fn apply_status<P: Payment>(
        &self,
        payment: &mut P,
        response: &OrderResponse,
        request_id: Uuid,
    ) -> Option<CanonicalStatus> {
        match response.canonical_status() {
            Ok(status) => {
                payment.set_status(status);
                Some(status)
            }
            Err(error) => {
                warn!(status = %response.status, "gateway status is not mapped");
                audit!(
                    AuditEventType::UnmappedStatusEscalated,
                    self.config.psp_id.as_str(),
                    request_id,
                    with_order_id(response.order_id.as_str()),
                    with_pay_id(response.pay_id.as_str()),
                    with_gateway_status(response.status.as_str()),
                    with_error(error.to_string())
                );
                None
            }
        }
    }
}

/// Shop page that renders the stored 3-D Secure answer for `payment_id`.
fn redirect_url(home_url: &str, payment_id: &str) -> Result<String> {
    let mut url = Url::parse(home_url)
        .map_err(|e| IngenicoError::ConfigError(format!("invalid home_url '{home_url}': {e}")))?;
    url.query_pairs_mut().append_pair("payment_redirect", payment_id);
    Ok(url.into())
}
