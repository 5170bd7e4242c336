//! `SHASIGN` generation.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::{Direction, HashAlgorithm, SignableFields, compute_signature};
use crate::fields::{FieldSet, names};

/// Signs field sets with a passphrase.
///
/// Holds no mutable state; one signer can be shared across concurrent requests.
#[derive(Debug)]
pub struct ShaSigner {
    passphrase: SecretString,
    algorithm: HashAlgorithm,
    direction: Direction,
    signable: SignableFields,
}

impl ShaSigner {
    /// Creates a signer using the built-in signable-field list for `direction`.
    #[must_use]
    pub fn new(passphrase: SecretString, algorithm: HashAlgorithm, direction: Direction) -> Self {
        Self {
            passphrase,
            algorithm,
            direction,
            signable: SignableFields::default_for(direction),
        }
    }

    /// Replaces the signable-field list.
    #[must_use]
    pub fn with_signable_fields(mut self, signable: SignableFields) -> Self {
        self.signable = signable;
        self
    }

    /// Hash algorithm in use.
    #[must_use]
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Direction this signer was built for.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Computes the signature without touching the field set.
    #[instrument(skip_all, fields(direction = ?self.direction, algorithm = ?self.algorithm, field_count = fields.len()))]
    pub fn sign(&self, fields: &FieldSet) -> String {
        let signature =
            compute_signature(fields, &self.signable, self.passphrase.expose_secret(), self.algorithm);
        debug!("computed SHA signature");
        signature
    }

    /// Computes the signature and stores it in `SHASIGN`.
    ///
    /// Any `SHASIGN` already present is replaced; it never takes part in the digest.
    pub fn sign_into(&self, fields: &mut FieldSet) -> String {
        let signature = self.sign(fields);
        fields.set(names::SHASIGN, signature.as_str());
        signature
    }
}
