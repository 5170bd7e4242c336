//! Inbound feedback notifications.
//!
//! After a payment changes state the gateway calls the merchant back with the order fields and a
//! `SHASIGN` computed with the SHA-OUT passphrase. A notification is applied only when that
//! signature matches; anything else leaves the payment untouched. There is no synchronous caller
//! to report to, so every outcome is returned as a [`FeedbackOutcome`] value and recorded in the
//! audit log.
//!
//! Handling is idempotent: the same notification applies the same status every time it arrives.
//!
//! # Examples
//!
//! ```
//! use ingenico_directlink::{
//!     CanonicalStatus,
//!     config::GatewayConfig,
//!     feedback::{FeedbackHandler, FeedbackOutcome},
//!     fields::FieldSet,
//!     payment::MemoryPaymentStore,
//!     sha::{Direction, ShaSigner},
//! };
//! use secrecy::SecretString;
//!
//! let config = GatewayConfig::from_toml(r#"
//!     psp_id = "MyPSPID"
//!     sha_in_passphrase = "in-secret"
//!     sha_out_passphrase = "out-secret"
//! "#).unwrap();
//! let handler = FeedbackHandler::new(&config);
//!
//! let store = MemoryPaymentStore::new();
//! store.create("12");
//!
//! let mut fields: FieldSet =
//!     [("orderID", "12"), ("PAYID", "32100123"), ("NCERROR", "0"), ("STATUS", "9")]
//!         .into_iter()
//!         .collect();
//! // What the gateway would have computed with the SHA-OUT passphrase.
//! let gateway_signer =
//!     ShaSigner::new(SecretString::new("out-secret".to_owned()), config.hash_algorithm, Direction::Inbound);
//! gateway_signer.sign_into(&mut fields);
//!
//! assert_eq!(handler.listen(&store, &fields), FeedbackOutcome::Applied(CanonicalStatus::Success));
//! ```

use std::fmt;

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::{
    audit,
    config::GatewayConfig,
    error::{IngenicoError, Result},
    fields::{FieldSet, names},
    payment::{Payment, PaymentRepository},
    security::audit::AuditEventType,
    sha::ShaVerifier,
    status::{self, CanonicalStatus},
};

/// Fields every feedback request carries.
const FEEDBACK_MARKERS: [&str; 4] = [names::NCERROR, names::PAYID, names::ORDERID, names::STATUS];

/// Why a notification was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// `SHASIGN` did not match the recomputed digest.
    SignatureMismatch,
    /// `SHASIGN` was absent or empty.
    MissingSignature,
    /// The request lacks the fields of a feedback request.
    NotFeedback,
    /// `PAYMENT_ID` names a payment the signed `ORDERID` was not issued for.
    ReferenceMismatch,
    /// No payment matches the notification.
    PaymentNotFound,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SignatureMismatch => "signature mismatch",
            Self::MissingSignature => "missing signature",
            Self::NotFeedback => "not a feedback request",
            Self::ReferenceMismatch => "payment id does not match the signed order id",
            Self::PaymentNotFound => "payment not found",
        })
    }
}

/// Result of handling one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Signature verified, status mapped and applied to the payment.
    Applied(CanonicalStatus),
    /// Nothing was changed.
    Ignored(IgnoreReason),
    /// Signature verified but the status is not in the status table; the payment is unchanged
    /// and the code was escalated through the audit log.
    Escalated {
        /// Raw status code as received.
        gateway_status: String,
    },
}

/// Verifies and applies feedback notifications for one merchant account.
#[derive(Debug)]
pub struct FeedbackHandler {
    psp_id: String,
    order_id_template: String,
    verifier: ShaVerifier,
}

impl FeedbackHandler {
    /// Creates a handler using the SHA-OUT passphrase and inbound field list of `config`.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            psp_id: config.psp_id.clone(),
            order_id_template: config.order_id.clone(),
            verifier: config.inbound_verifier(),
        }
    }

    /// Verifies a notification and maps its status without touching any payment.
    ///
    /// Field names are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// - [`IngenicoError::MissingSignature`] if `SHASIGN` is absent or empty
    /// - [`IngenicoError::SignatureMismatch`] if it does not match
    /// - [`IngenicoError::UnmappedStatus`] if `STATUS` is not a known code
    pub fn evaluate(&self, fields: &FieldSet) -> Result<CanonicalStatus> {
        let fields = fields.to_uppercase_names();
        self.verifier.verify(&fields)?;
        status::transform(fields.get(names::STATUS).unwrap_or_default())
    }

    /// Verifies a notification and applies its status to `payment`.
    ///
    /// The payment is only touched when the outcome is [`FeedbackOutcome::Applied`].
    #[instrument(skip_all, fields(payment_id = %payment.id()))]
    pub fn update_status<P: Payment>(&self, payment: &mut P, fields: &FieldSet) -> FeedbackOutcome {
        let request_id = Uuid::new_v4();
        let fields = fields.to_uppercase_names();
        let order_id = fields.get(names::ORDERID).unwrap_or_default();

        if let Err(error) = self.verifier.verify(&fields) {
            let reason = if matches!(error, IngenicoError::MissingSignature) {
                IgnoreReason::MissingSignature
            } else {
                IgnoreReason::SignatureMismatch
            };
            warn!(%reason, "ignoring feedback");
            audit!(
                AuditEventType::FeedbackSignatureMismatch,
                self.psp_id.as_str(),
                request_id,
                with_order_id(order_id),
                with_error(error.to_string())
            );
            return FeedbackOutcome::Ignored(reason);
        }

        let gateway_status = fields.get(names::STATUS).unwrap_or_default();
        match status::transform(gateway_status) {
            Ok(status) => {
                if let Some(pay_id) = fields.get(names::PAYID).filter(|id| !id.is_empty()) {
                    payment.set_transaction_id(pay_id);
                }
                payment.set_status(status);
                debug!(%status, gateway_status, "feedback applied");
                audit!(
                    AuditEventType::FeedbackApplied,
                    self.psp_id.as_str(),
                    request_id,
                    with_order_id(order_id),
                    with_pay_id(fields.get(names::PAYID).unwrap_or_default()),
                    with_gateway_status(gateway_status)
                );
                FeedbackOutcome::Applied(status)
            }
            Err(error) => {
                audit!(
                    AuditEventType::UnmappedStatusEscalated,
                    self.psp_id.as_str(),
                    request_id,
                    with_order_id(order_id),
                    with_gateway_status(gateway_status),
                    with_error(error.to_string())
                );
                FeedbackOutcome::Escalated { gateway_status: gateway_status.to_owned() }
            }
        }
    }

    /// Handles a raw inbound request against a payment repository.
    ///
    /// The request must carry `NCERROR`, `PAYID`, `ORDERID` and `STATUS`. The payment is looked
    /// up by the signed `ORDERID`. A `PAYMENT_ID` echoed back from `PARAMPLUS` is not signed, so
    /// it is used only when the configured order id template renders it into that `ORDERID`;
    /// otherwise the notification is ignored as [`IgnoreReason::ReferenceMismatch`].
    #[instrument(skip_all)]
    pub fn listen<R: PaymentRepository>(&self, repository: &R, fields: &FieldSet) -> FeedbackOutcome {
        let fields = fields.to_uppercase_names();

        if !FEEDBACK_MARKERS.iter().all(|name| fields.contains(name)) {
            debug!("request carries no feedback fields");
            return FeedbackOutcome::Ignored(IgnoreReason::NotFeedback);
        }

        let Some(payment_id) = self.feedback_payment_id(&fields) else {
            let order_id = fields.get(names::ORDERID).unwrap_or_default();
            warn!(order_id, "feedback payment id does not match its order id");
            audit!(
                AuditEventType::FeedbackReferenceMismatch,
                self.psp_id.as_str(),
                Uuid::new_v4(),
                with_order_id(order_id),
                with_error(format!(
                    "PAYMENT_ID {} not issued for this ORDERID",
                    fields.get(names::PAYMENT_ID).unwrap_or_default()
                ))
            );
            return FeedbackOutcome::Ignored(IgnoreReason::ReferenceMismatch);
        };
        let Some(mut payment) = repository.get_payment(&payment_id) else {
            warn!(%payment_id, "feedback for unknown payment");
            return FeedbackOutcome::Ignored(IgnoreReason::PaymentNotFound);
        };

        self.update_status(&mut payment, &fields)
    }

    /// Payment id a feedback request refers to; `None` when `PAYMENT_ID` contradicts `ORDERID`.
    fn feedback_payment_id(&self, fields: &FieldSet) -> Option<String> {
        let order_id = fields.get(names::ORDERID).unwrap_or_default();
        match fields.get(names::PAYMENT_ID).map(str::trim).filter(|id| !id.is_empty()) {
            None => Some(order_id.to_owned()),
            Some(payment_id) if renders_order_id(&self.order_id_template, payment_id, order_id) => {
                Some(payment_id.to_owned())
            }
            Some(_) => None,
        }
    }
}

/// Returns `true` when `template` yields `order_id` for `payment_id`.
///
/// A `{order_id}` placeholder stands for the merchant order number, unknown here, and matches
/// any text.
fn renders_order_id(template: &str, payment_id: &str, order_id: &str) -> bool {
    let rendered = template.replace("{payment_id}", payment_id);
    match rendered.split_once("{order_id}") {
        None => rendered == order_id,
        Some((prefix, suffix)) => {
            order_id.len() >= prefix.len() + suffix.len()
                && order_id.starts_with(prefix)
                && order_id.ends_with(suffix)
        }
    }
}
