//! Gateway status codes and their canonical payment states.
//!
//! The gateway reports around forty numeric statuses. Every known code maps onto one of four
//! [`CanonicalStatus`] buckets through a single table built once. Codes outside the table are
//! never guessed: [`transform`] reports them as [`IngenicoError::UnmappedStatus`] so they can be
//! escalated.
//!
//! Codes are not ordered by severity (`7` and `74` are deletions, `73` is a refusal), so the table
//! is matched exactly.
//!
//! # Examples
//!
//! ```
//! use ingenico_directlink::status::{CanonicalStatus, transform};
//!
//! assert_eq!(transform("9").unwrap(), CanonicalStatus::Success);
//! assert_eq!(transform("51").unwrap(), CanonicalStatus::Open);
//! assert!(transform("46").is_err());
//! ```

use std::{collections::HashMap, fmt, sync::LazyLock};

use crate::error::{IngenicoError, Result};

/// Merchant-side payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalStatus {
    /// Provisional; the gateway has not reached a final outcome.
    Open,
    /// Paid, or a merchant-initiated follow-up completed.
    Success,
    /// Refused or invalid.
    Failure,
    /// Cancelled by the shopper or after authorisation.
    Cancelled,
}

impl CanonicalStatus {
    /// Upper-case label used in logs and by the operator binary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known gateway status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs, reason = "variant names are the gateway's own status descriptions")]
pub enum GatewayStatus {
    IncompleteOrInvalid = 0,
    CancelledByClient = 1,
    AuthorizationRefused = 2,
    OrderStored = 4,
    StoredWaitingExternalResult = 40,
    WaitingClientPayment = 41,
    Authorized = 5,
    AuthorizedWaitingExternalResult = 50,
    AuthorizationWaiting = 51,
    AuthorizationNotKnown = 52,
    StandBy = 55,
    OkWithScheduledPayments = 56,
    ErrorInScheduledPayments = 57,
    AuthorizeManually = 59,
    AuthorizedAndCancelled = 6,
    AuthorizationDeletionWaiting = 61,
    AuthorizationDeletionUncertain = 62,
    AuthorizationDeletionRefused = 63,
    AuthorizedAndCancelledByMerchant = 64,
    PaymentDeleted = 7,
    PaymentDeletionPending = 71,
    PaymentDeletionUncertain = 72,
    PaymentDeletionRefused = 73,
    PaymentDeletedPartially = 74,
    DeletionProcessedByMerchant = 75,
    Refund = 8,
    RefundPending = 81,
    RefundUncertain = 82,
    RefundRefused = 83,
    PaymentDeclinedByAcquirer = 84,
    RefundProcessedByMerchant = 85,
    PaymentRequested = 9,
    PaymentProcessing = 91,
    PaymentUncertain = 92,
    PaymentRefused = 93,
    RefundDeclinedByAcquirer = 94,
    PaymentProcessedByMerchant = 95,
    BeingProcessed = 99,
}

/// Every known status, in code order of the gateway documentation.
const KNOWN_STATUSES: [GatewayStatus; 38] = {
    use GatewayStatus as S;
    [
        S::IncompleteOrInvalid,
        S::CancelledByClient,
        S::AuthorizationRefused,
        S::OrderStored,
        S::StoredWaitingExternalResult,
        S::WaitingClientPayment,
        S::Authorized,
        S::AuthorizedWaitingExternalResult,
        S::AuthorizationWaiting,
        S::AuthorizationNotKnown,
        S::StandBy,
        S::OkWithScheduledPayments,
        S::ErrorInScheduledPayments,
        S::AuthorizeManually,
        S::AuthorizedAndCancelled,
        S::AuthorizationDeletionWaiting,
        S::AuthorizationDeletionUncertain,
        S::AuthorizationDeletionRefused,
        S::AuthorizedAndCancelledByMerchant,
        S::PaymentDeleted,
        S::PaymentDeletionPending,
        S::PaymentDeletionUncertain,
        S::PaymentDeletionRefused,
        S::PaymentDeletedPartially,
        S::DeletionProcessedByMerchant,
        S::Refund,
        S::RefundPending,
        S::RefundUncertain,
        S::RefundRefused,
        S::PaymentDeclinedByAcquirer,
        S::RefundProcessedByMerchant,
        S::PaymentRequested,
        S::PaymentProcessing,
        S::PaymentUncertain,
        S::PaymentRefused,
        S::RefundDeclinedByAcquirer,
        S::PaymentProcessedByMerchant,
        S::BeingProcessed,
    ]
};

/// Code to status and bucket, built once.
static STATUS_TABLE: LazyLock<HashMap<u16, (GatewayStatus, CanonicalStatus)>> =
    LazyLock::new(|| {
        KNOWN_STATUSES.iter().map(|&status| (status.code(), (status, status.canonical()))).collect()
    });

impl GatewayStatus {
    /// Numeric gateway code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Looks up a gateway code.
    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        STATUS_TABLE.get(&code).map(|&(status, _)| status)
    }

    /// Parses the textual code found on the wire; surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u16>().ok().and_then(Self::from_code)
    }

    /// Canonical bucket of this status.
    #[must_use]
    pub const fn canonical(self) -> CanonicalStatus {
        match self {
            Self::IncompleteOrInvalid
            | Self::AuthorizationRefused
            | Self::AuthorizationDeletionRefused
            | Self::PaymentDeletionRefused
            | Self::RefundRefused
            | Self::PaymentDeclinedByAcquirer
            | Self::PaymentRefused
            | Self::RefundDeclinedByAcquirer => CanonicalStatus::Failure,
            Self::CancelledByClient
            | Self::AuthorizedAndCancelled
            | Self::AuthorizedAndCancelledByMerchant => CanonicalStatus::Cancelled,
            Self::OrderStored
            | Self::StoredWaitingExternalResult
            | Self::WaitingClientPayment
            | Self::AuthorizedWaitingExternalResult
            | Self::AuthorizationWaiting
            | Self::AuthorizationNotKnown
            | Self::StandBy
            | Self::OkWithScheduledPayments
            | Self::ErrorInScheduledPayments
            | Self::AuthorizeManually
            | Self::AuthorizationDeletionWaiting
            | Self::AuthorizationDeletionUncertain
            | Self::PaymentDeletionPending
            | Self::PaymentDeletionUncertain
            | Self::PaymentDeletedPartially
            | Self::DeletionProcessedByMerchant
            | Self::RefundPending
            | Self::RefundUncertain
            | Self::PaymentProcessing
            | Self::PaymentUncertain
            | Self::BeingProcessed => CanonicalStatus::Open,
            Self::Authorized
            | Self::PaymentDeleted
            | Self::Refund
            | Self::RefundProcessedByMerchant
            | Self::PaymentRequested
            | Self::PaymentProcessedByMerchant => CanonicalStatus::Success,
        }
    }

    /// Every known status.
    pub fn all() -> impl Iterator<Item = Self> {
        KNOWN_STATUSES.into_iter()
    }
}

/// DirectLink status answered together with a 3-D Secure page.
///
/// Not a payment state: the shopper still has to identify, and the outcome arrives later as
/// feedback. It is deliberately absent from the status table.
pub const IDENTIFICATION_REQUESTED: u16 = 46;

/// Returns `true` when `code` is [`IDENTIFICATION_REQUESTED`].
#[must_use]
pub fn is_identification_requested(code: &str) -> bool {
    code.trim().parse::<u16>() == Ok(IDENTIFICATION_REQUESTED)
}

/// Maps a raw gateway status code onto its canonical state.
///
/// # Errors
///
/// Returns [`IngenicoError::UnmappedStatus`] for codes outside the status table, including
/// empty and non-numeric input.
pub fn transform(code: &str) -> Result<CanonicalStatus> {
    code.trim()
        .parse::<u16>()
        .ok()
        .and_then(|numeric| STATUS_TABLE.get(&numeric))
        .map(|&(_, bucket)| bucket)
        .ok_or_else(|| IngenicoError::UnmappedStatus(code.to_owned()))
}
