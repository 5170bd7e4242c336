//! Security controls around the gateway flows.
//!
//! # Audit Logging
//!
//! The audit module records security-relevant events (signed requests, gateway answers,
//! rejected feedback, unknown statuses) as structured `tracing` events on the `audit` target,
//! with card data masked before anything is recorded:
//!
//! ```rust
//! use ingenico_directlink::security::audit::{AuditEvent, AuditEventType};
//! use uuid::Uuid;
//!
//! let event = AuditEvent::new(AuditEventType::OrderAccepted, "MyPSPID", Uuid::new_v4())
//!     .with_order_id("1234")
//!     .with_pay_id("32100123")
//!     .with_gateway_status("9");
//!
//! ingenico_directlink::security::audit::audit_log(&event);
//! ```
//!
//! Or use the convenience macro:
//!
//! ```rust
//! use ingenico_directlink::{audit, security::audit::AuditEventType};
//! use uuid::Uuid;
//!
//! audit!(
//!     AuditEventType::FeedbackSignatureMismatch,
//!     "MyPSPID",
//!     Uuid::new_v4(),
//!     with_order_id("1234")
//! );
//! ```
//!
//! # Security Considerations
//!
//! - Audit logs use a separate tracing target for easy filtering
//! - Card numbers and security codes are masked in every recorded error
//! - Each flow invocation carries its own request id for correlation

pub mod audit;

pub use audit::{
    AuditDetails, AuditEvent, AuditEventType, audit_log, redact_card_number, redact_sensitive,
};
