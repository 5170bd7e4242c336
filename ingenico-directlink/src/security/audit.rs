//! Audit logging for security-relevant gateway events.
//!
//! Provides structured audit records with card data redaction and per-flow correlation ids.

use std::{
    ops::RangeInclusive,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Digit count of a primary account number.
const CARD_DIGITS: RangeInclusive<usize> = 13..=19;

/// Keywords announcing a card security code, longest first.
const SECURITY_CODE_KEYWORDS: [&str; 4] = ["cvv2", "cvv", "cvc", "cid"];

/// Types of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// `SHASIGN` was computed for an outbound request.
    RequestSigned,
    /// A DirectLink order was posted to the gateway.
    OrderSubmitted,
    /// The gateway accepted a DirectLink order.
    OrderAccepted,
    /// The gateway answered with an error code.
    OrderRejected,
    /// The order never got a readable answer (network, HTTP status, malformed body).
    TransportFailed,
    /// A feedback notification was verified and applied.
    FeedbackApplied,
    /// A feedback notification failed authentication and was ignored.
    FeedbackSignatureMismatch,
    /// A feedback notification named a payment its signed `ORDERID` does not belong to.
    FeedbackReferenceMismatch,
    /// The gateway reported a status code outside the status table.
    UnmappedStatusEscalated,
}

/// Details for audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuditDetails {
    /// Merchant order reference (`ORDERID`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Gateway transaction id (`PAYID`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_id: Option<String>,
    /// Raw gateway status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_status: Option<String>,
    /// Error message (sensitive data automatically redacted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Duration of the operation in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Audit log entry.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::security::audit::{AuditEvent, AuditEventType};
/// use uuid::Uuid;
///
/// let event = AuditEvent::new(AuditEventType::OrderRejected, "MyPSPID", Uuid::new_v4())
///     .with_order_id("1234")
///     .with_error("50001111 Data validation error");
///
/// ingenico_directlink::security::audit::audit_log(&event);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event timestamp.
    pub timestamp: SystemTime,
    /// Event type.
    pub event_type: AuditEventType,
    /// Merchant account (`PSPID`) the event belongs to.
    pub psp_id: String,
    /// Correlation id of the flow invocation.
    pub request_id: Uuid,
    /// Event details.
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Creates a new audit event.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(event_type: AuditEventType, psp_id: impl Into<String>, request_id: Uuid) -> Self {
        Self {
            timestamp: SystemTime::now(),
            event_type,
            psp_id: psp_id.into(),
            request_id,
            details: AuditDetails::default(),
        }
    }

    /// Adds the merchant order reference.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.details.order_id = Some(order_id.into());
        self
    }

    /// Adds the gateway transaction id.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_pay_id(mut self, pay_id: impl Into<String>) -> Self {
        self.details.pay_id = Some(pay_id.into());
        self
    }

    /// Adds the raw gateway status code.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_gateway_status(mut self, status: impl Into<String>) -> Self {
        self.details.gateway_status = Some(status.into());
        self
    }

    /// Adds an error message.
    ///
    /// Card numbers and security codes are masked before the message is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use ingenico_directlink::security::audit::{AuditEvent, AuditEventType};
    /// use uuid::Uuid;
    ///
    /// let event = AuditEvent::new(AuditEventType::OrderRejected, "MyPSPID", Uuid::new_v4())
    ///     .with_error("card 4111 1111 1111 1111 refused");
    ///
    /// assert_eq!(event.details.error.as_deref(), Some("card XXXX XXXX XXXX XXXX refused"));
    /// ```
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.details.error = Some(redact_sensitive(&error.into()));
        self
    }

    /// Adds duration to details.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "duration in ms fits u64 for practical values"
    )]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.details.duration_ms = Some(duration.as_millis() as u64);
        self
    }
}

/// Logs audit event to tracing with target "audit".
///
/// Escalated statuses log at error level and rejected feedback at warn level so they surface
/// without an audit-specific filter; everything else logs at info.
pub fn audit_log(event: &AuditEvent) {
    match event.event_type {
        AuditEventType::UnmappedStatusEscalated => tracing::error!(
            target: "audit",
            timestamp = ?event.timestamp,
            event_type = ?event.event_type,
            psp_id = %event.psp_id,
            request_id = %event.request_id,
            details = ?event.details,
            "AUDIT"
        ),
        AuditEventType::FeedbackSignatureMismatch | AuditEventType::FeedbackReferenceMismatch => tracing::warn!(
            target: "audit",
            timestamp = ?event.timestamp,
            event_type = ?event.event_type,
            psp_id = %event.psp_id,
            request_id = %event.request_id,
            details = ?event.details,
            "AUDIT"
        ),
        _ => tracing::info!(
            target: "audit",
            timestamp = ?event.timestamp,
            event_type = ?event.event_type,
            psp_id = %event.psp_id,
            request_id = %event.request_id,
            details = ?event.details,
            "AUDIT"
        ),
    }
}

/// Redacts card data from free text.
///
/// # Pattern Matching
///
/// - Card numbers: runs of 13 to 19 digits, optionally grouped by single spaces or dashes.
///   Every digit becomes `X`, separators are kept.
/// - Security codes: 3 or 4 digits after `CVC`, `CVV`, `CVV2` or `CID` (any case, optionally
///   followed by `:` / `=` and whitespace) become `XXX`.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::security::audit::redact_sensitive;
///
/// let redacted = redact_sensitive("card 4111-1111-1111-1111, CVC: 123");
/// assert_eq!(redacted, "card XXXX-XXXX-XXXX-XXXX, CVC: XXX");
/// ```
#[must_use]
pub fn redact_sensitive(input: &str) -> String {
    let chars: Vec<char> = mask_card_numbers(input).chars().collect();
    mask_security_codes(&chars)
}

fn mask_card_numbers(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let start = i;
        let mut digits = 0;
        while i < chars.len() {
            if chars[i].is_ascii_digit() {
                digits += 1;
                i += 1;
            } else if matches!(chars[i], ' ' | '-')
                && chars.get(i + 1).is_some_and(char::is_ascii_digit)
            {
                i += 1;
            } else {
                break;
            }
        }

        let run = &chars[start..i];
        if CARD_DIGITS.contains(&digits) {
            out.extend(run.iter().map(|&c| if c.is_ascii_digit() { 'X' } else { c }));
        } else {
            out.extend(run);
        }
    }

    out
}

fn mask_security_codes(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let Some(keyword_len) = security_keyword_at(chars, i) else {
            out.push(chars[i]);
            i += 1;
            continue;
        };

        out.extend(&chars[i..i + keyword_len]);
        i += keyword_len;

        while i < chars.len() && (chars[i].is_whitespace() || matches!(chars[i], ':' | '=')) {
            out.push(chars[i]);
            i += 1;
        }

        let digits = chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
        if (3..=4).contains(&digits) {
            out.push_str("XXX");
        } else {
            out.extend(&chars[i..i + digits]);
        }
        i += digits;
    }

    out
}

/// Length of the security-code keyword starting at `at`, if one starts a word there.
fn security_keyword_at(chars: &[char], at: usize) -> Option<usize> {
    if at > 0 && chars[at - 1].is_ascii_alphanumeric() {
        return None;
    }

    SECURITY_CODE_KEYWORDS.iter().find_map(|keyword| {
        let candidate = chars.get(at..at + keyword.len())?;
        candidate
            .iter()
            .zip(keyword.chars())
            .all(|(c, k)| c.to_ascii_lowercase() == k)
            .then_some(keyword.len())
    })
}

/// Masks a card number down to its last four digits.
///
/// Inputs of four characters or fewer are returned unchanged.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::security::audit::redact_card_number;
///
/// assert_eq!(redact_card_number("4111111111111111"), "XXXXXXXXXXXX1111");
/// assert_eq!(redact_card_number("123"), "123");
/// ```
#[must_use]
pub fn redact_card_number(number: &str) -> String {
    let len = number.chars().count();
    if len <= 4 {
        return number.to_owned();
    }

    number.chars().enumerate().map(|(i, c)| if i < len - 4 { 'X' } else { c }).collect()
}

/// Convenience macro for audit logging.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::{audit, security::audit::AuditEventType};
/// use uuid::Uuid;
///
/// // Simple event without details
/// audit!(AuditEventType::RequestSigned, "MyPSPID", Uuid::new_v4());
///
/// // Event with details
/// audit!(
///     AuditEventType::UnmappedStatusEscalated,
///     "MyPSPID",
///     Uuid::new_v4(),
///     with_order_id("1234"),
///     with_gateway_status("46")
/// );
/// ```
#[macro_export]
macro_rules! audit {
    ($event_type:expr, $psp_id:expr, $request_id:expr) => {
        $crate::security::audit::audit_log(
            &$crate::security::audit::AuditEvent::new($event_type, $psp_id, $request_id)
        )
    };
    ($event_type:expr, $psp_id:expr, $request_id:expr, $($method:ident($arg:expr)),+ $(,)?) => {
        $crate::security::audit::audit_log(
            &$crate::security::audit::AuditEvent::new($event_type, $psp_id, $request_id)
                $(.$method($arg))+
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_card_numbers() {
        let inputs = [
            ("Card: 4111-1111-1111-1111", "Card: XXXX-XXXX-XXXX-XXXX"),
            ("Card: 4111 1111 1111 1111", "Card: XXXX XXXX XXXX XXXX"),
            ("Card: 4111111111111111", "Card: XXXXXXXXXXXXXXXX"),
            ("Amex 378282246310005 refused", "Amex XXXXXXXXXXXXXXX refused"),
            ("Maestro 6759649826438453123", "Maestro XXXXXXXXXXXXXXXXXXX"),
        ];

        for (input, expected) in inputs {
            assert_eq!(redact_sensitive(input), expected, "Failed to redact: {input}");
        }
    }

    #[test]
    fn test_redact_multiple_card_numbers() {
        let result = redact_sensitive("Cards: 4111-1111-1111-1111 and 5500 0000 0000 0004");

        assert_eq!(result, "Cards: XXXX-XXXX-XXXX-XXXX and XXXX XXXX XXXX XXXX");
    }

    #[test]
    fn test_redact_security_codes() {
        let inputs = [
            ("CVC: 123", "CVC: XXX"),
            ("cvv: 1234", "cvv: XXX"),
            ("CVC=456", "CVC=XXX"),
            ("cvv2 789", "cvv2 XXX"),
            ("cid:0123", "cid:XXX"),
        ];

        for (input, expected) in inputs {
            assert_eq!(redact_sensitive(input), expected, "Failed to redact: {input}");
        }
    }

    #[test]
    fn test_security_code_keyword_needs_word_boundary() {
        assert_eq!(redact_sensitive("ABCVC 123"), "ABCVC 123");
        assert_eq!(redact_sensitive("CVC 12"), "CVC 12");
    }

    #[test]
    fn test_redact_sensitive_preserves_safe_data() {
        let input = "Order ID: 12345, Amount: 1500, PAYID 32100123, Date: 2024-01-15";
        assert_eq!(redact_sensitive(input), input);
    }

    #[test]
    fn test_redact_sensitive_empty_string() {
        assert_eq!(redact_sensitive(""), "");
    }

    #[test]
    fn test_redact_card_number() {
        assert_eq!(redact_card_number("4111111111111111"), "XXXXXXXXXXXX1111");
        assert_eq!(redact_card_number("12345"), "X2345");
        assert_eq!(redact_card_number("1234"), "1234");
        assert_eq!(redact_card_number(""), "");
    }

    #[test]
    fn test_audit_event_builder() {
        let request_id = Uuid::new_v4();
        let event = AuditEvent::new(AuditEventType::OrderAccepted, "MyPSPID", request_id)
            .with_order_id("1234")
            .with_pay_id("32100123")
            .with_gateway_status("9")
            .with_duration(Duration::from_millis(1500));

        assert_eq!(event.psp_id, "MyPSPID");
        assert_eq!(event.request_id, request_id);
        assert_eq!(event.details.order_id.as_deref(), Some("1234"));
        assert_eq!(event.details.pay_id.as_deref(), Some("32100123"));
        assert_eq!(event.details.gateway_status.as_deref(), Some("9"));
        assert_eq!(event.details.duration_ms, Some(1500));
    }

    #[test]
    fn test_audit_event_with_error_is_redacted() {
        let event = AuditEvent::new(AuditEventType::OrderRejected, "MyPSPID", Uuid::new_v4())
            .with_error("Payment failed for card 4111111111111111 with CVC 123");

        let error = event.details.error.unwrap();
        assert!(!error.contains("4111111111111111"));
        assert!(!error.contains("123"));
        assert!(error.starts_with("Payment failed for card"));
    }

    #[test]
    fn test_audit_event_serialization() {
        let event = AuditEvent::new(AuditEventType::UnmappedStatusEscalated, "MyPSPID", Uuid::new_v4())
            .with_gateway_status("46");

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("unmapped_status_escalated"));
        assert!(json.contains("MyPSPID"));
        assert!(json.contains("\"gateway_status\":\"46\""));
        assert!(!json.contains("pay_id"));
    }

    #[test]
    fn test_audit_macro_accepts_builder_calls() {
        audit!(AuditEventType::RequestSigned, "MyPSPID", Uuid::new_v4());
        audit!(
            AuditEventType::FeedbackApplied,
            "MyPSPID",
            Uuid::new_v4(),
            with_order_id("12"),
            with_gateway_status("9"),
        );
    }
}
