//! `SHASIGN` computation and verification.
//!
//! The gateway authenticates every message with a digest over a canonical string built from the
//! message fields:
//!
//! 1. keep only fields listed as signable for the message [`Direction`]
//! 2. drop fields with an empty value
//! 3. sort by uppercase name, byte-wise ascending
//! 4. concatenate `NAME=value` followed by the passphrase for every field
//! 5. hash with the configured [`HashAlgorithm`], render as uppercase hex
//!
//! Outbound requests are signed with the SHA-IN passphrase, inbound feedback is verified with the
//! SHA-OUT passphrase. The direction is always explicit, so a passphrase is never picked by
//! accident.
//!
//! # Examples
//!
//! ```
//! use ingenico_directlink::{
//!     fields::FieldSet,
//!     sha::{Direction, HashAlgorithm, ShaSigner},
//! };
//! use secrecy::SecretString;
//!
//! let mut fields = FieldSet::new();
//! fields.set("AMOUNT", "1500").set("CURRENCY", "EUR").set("LANGUAGE", "en_US");
//! fields.set("ORDERID", "1234").set("PSPID", "MyPSPID");
//!
//! let signer = ShaSigner::new(
//!     SecretString::new("Mysecretsig1875!?".to_owned()),
//!     HashAlgorithm::Sha1,
//!     Direction::Outbound,
//! );
//! assert_eq!(signer.sign(&fields), "F4CC376CD7A834D997B91598FA747825A238BE0A");
//! ```

use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use crate::fields::FieldSet;

mod parameters;
mod signer;
mod verifier;

#[cfg(test)]
mod tests;

pub use parameters::SignableFields;
pub use signer::ShaSigner;
pub use verifier::ShaVerifier;

/// Digest used for `SHASIGN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-1, 160-bit.
    #[default]
    #[serde(alias = "sha-1")]
    Sha1,
    /// SHA-256.
    #[serde(alias = "sha-256")]
    Sha256,
    /// SHA-512.
    #[serde(alias = "sha-512")]
    Sha512,
}

impl HashAlgorithm {
    /// Length of the hex-encoded digest.
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }

    fn digest_upper_hex(self, input: &[u8]) -> String {
        match self {
            Self::Sha1 => hex::encode_upper(Sha1::digest(input)),
            Self::Sha256 => hex::encode_upper(Sha256::digest(input)),
            Self::Sha512 => hex::encode_upper(Sha512::digest(input)),
        }
    }
}

/// Message direction, selecting the signable-field list and the passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Merchant to gateway (SHA-IN).
    Outbound,
    /// Gateway to merchant (SHA-OUT).
    Inbound,
}

/// Canonical string for `fields`; the passphrase is appended after every field.
fn canonical_string(fields: &FieldSet, signable: &SignableFields, passphrase: &str) -> String {
    let mut selected: Vec<(String, &str)> = fields
        .iter()
        .filter(|(name, value)| !value.is_empty() && signable.contains(name))
        .map(|(name, value)| (name.to_ascii_uppercase(), value))
        .collect();

    selected.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut canonical = String::new();
    for (name, value) in selected {
        canonical.push_str(&name);
        canonical.push('=');
        canonical.push_str(value);
        canonical.push_str(passphrase);
    }
    canonical
}

/// Computes the uppercase hex `SHASIGN` for a field set.
#[must_use]
pub fn compute_signature(
    fields: &FieldSet,
    signable: &SignableFields,
    passphrase: &str,
    algorithm: HashAlgorithm,
) -> String {
    let canonical = Zeroizing::new(canonical_string(fields, signable, passphrase));
    algorithm.digest_upper_hex(canonical.as_bytes())
}
