//! OrderStandard: the browser redirect flow.
//!
//! The shop renders an auto-submitting form that posts the signed order to the gateway's hosted
//! payment page. Nothing is sent from the server; the outcome comes back later as a feedback
//! notification handled by [`FeedbackHandler`].

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    audit,
    config::GatewayConfig,
    error::Result,
    feedback::{FeedbackHandler, FeedbackOutcome},
    fields::{FieldSet, GeneralData, names},
    payment::{OrderRequest, Payment, PaymentRepository},
    security::audit::AuditEventType,
    sha::ShaSigner,
};

/// Signed form for the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectForm {
    /// Form action URL.
    pub action: String,
    /// Signed fields, in the order they were set; `SHASIGN` comes last.
    pub fields: Vec<(String, String)>,
}

impl RedirectForm {
    /// Value of a field, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// OrderStandard gateway for one merchant account.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::{
///     config::GatewayConfig,
///     order_standard::OrderStandardGateway,
///     payment::{MemoryPaymentStore, OrderRequest},
/// };
///
/// let config = GatewayConfig::from_toml(r#"
///     psp_id = "MyPSPID"
///     mode = "test"
///     sha_in_passphrase = "Mysecretsig1875!?"
///     sha_out_passphrase = "out-secret"
/// "#).unwrap();
/// let gateway = OrderStandardGateway::new(config).unwrap();
///
/// let store = MemoryPaymentStore::new();
/// let mut payment = store.create("42");
/// let order = OrderRequest::new("42", "EUR", 1500)
///     .with_return_url("https://shop.example.com/return");
///
/// let form = gateway.start(&mut payment, &order);
/// assert_eq!(form.action, "https://secure.ogone.com/ncol/test/orderstandard.asp");
/// assert_eq!(form.get("CANCELURL"), Some("https://shop.example.com/return"));
/// assert!(form.get("SHASIGN").is_some());
/// ```
#[derive(Debug)]
pub struct OrderStandardGateway {
    config: GatewayConfig,
    signer: ShaSigner,
    feedback: FeedbackHandler,
}

impl OrderStandardGateway {
    /// Creates a gateway.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::ConfigError`](crate::IngenicoError::ConfigError) if the
    /// configuration is invalid.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let signer = config.outbound_signer();
        let feedback = FeedbackHandler::new(&config);
        Ok(Self { config, signer, feedback })
    }

    /// Merchant configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Builds the unsigned redirect field set for an order.
    #[must_use]
    pub fn order_fields(&self, order: &OrderRequest) -> FieldSet {
        let mut fields = order.order_fields(&self.config);
        GeneralData::new(&mut fields)
            .accept_url(&order.return_url)
            .decline_url(&order.return_url)
            .exception_url(&order.return_url)
            .cancel_url(&order.return_url);
        fields
    }

    /// Signs the order and points the payment at the hosted payment page.
    ///
    /// Card data on the order is ignored; the shopper enters it on the gateway's page.
    #[instrument(skip_all, fields(psp_id = %self.config.psp_id, payment_id = %order.payment_id))]
    pub fn start<P: Payment>(&self, payment: &mut P, order: &OrderRequest) -> RedirectForm {
        let mut fields = self.order_fields(order);
        self.signer.sign_into(&mut fields);

        let action = self.config.form_action();
        payment.set_action_url(&action);

        audit!(
            AuditEventType::RequestSigned,
            self.config.psp_id.as_str(),
            Uuid::new_v4(),
            with_order_id(fields.get(names::ORDERID).unwrap_or_default())
        );
        debug!(field_count = fields.len(), "redirect form ready");

        RedirectForm { action, fields: fields.all() }
    }

    /// Applies an inbound feedback notification to `payment`.
    pub fn update_status<P: Payment>(&self, payment: &mut P, fields: &FieldSet) -> FeedbackOutcome {
        self.feedback.update_status(payment, fields)
    }

    /// Handles a raw inbound request against a payment repository.
    pub fn listen<R: PaymentRepository>(&self, repository: &R, fields: &FieldSet) -> FeedbackOutcome {
        self.feedback.listen(repository, fields)
    }
}
