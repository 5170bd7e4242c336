//! `SHASIGN` verification for inbound feedback.

use secrecy::{ExposeSecret, SecretString};
use tracing::{instrument, warn};

use super::{Direction, HashAlgorithm, SignableFields, compute_signature};
use crate::{
    error::{IngenicoError, Result},
    fields::{FieldSet, names},
};

/// Verifies signatures on field sets received from the gateway.
///
/// Uses the SHA-OUT passphrase and the inbound signable-field list.
#[derive(Debug)]
pub struct ShaVerifier {
    passphrase: SecretString,
    algorithm: HashAlgorithm,
    signable: SignableFields,
}

impl ShaVerifier {
    /// Creates a verifier using the built-in inbound signable-field list.
    #[must_use]
    pub fn new(passphrase: SecretString, algorithm: HashAlgorithm) -> Self {
        Self { passphrase, algorithm, signable: SignableFields::default_for(Direction::Inbound) }
    }

    /// Replaces the signable-field list.
    #[must_use]
    pub fn with_signable_fields(mut self, signable: SignableFields) -> Self {
        self.signable = signable;
        self
    }

    /// Verifies the `SHASIGN` carried inside `fields`.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::MissingSignature`] when `SHASIGN` is absent or empty and
    /// [`IngenicoError::SignatureMismatch`] when it does not match.
    pub fn verify(&self, fields: &FieldSet) -> Result<()> {
        let supplied = fields
            .get(names::SHASIGN)
            .filter(|value| !value.is_empty())
            .ok_or(IngenicoError::MissingSignature)?;
        self.verify_signature(fields, supplied)
    }

    /// Verifies `supplied` against the digest computed over `fields`.
    ///
    /// Hex case is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::SignatureMismatch`] when the digests differ.
    #[instrument(skip_all, fields(algorithm = ?self.algorithm, field_count = fields.len()))]
    pub fn verify_signature(&self, fields: &FieldSet, supplied: &str) -> Result<()> {
        let expected =
            compute_signature(fields, &self.signable, self.passphrase.expose_secret(), self.algorithm);

        if digests_match(&expected, supplied.trim()) {
            Ok(())
        } else {
            warn!("inbound SHA signature mismatch");
            Err(IngenicoError::SignatureMismatch)
        }
    }
}

/// Case-insensitive comparison that inspects every byte once lengths agree.
fn digests_match(expected: &str, supplied: &str) -> bool {
    if expected.len() != supplied.len() {
        return false;
    }

    expected
        .bytes()
        .zip(supplied.bytes())
        .fold(0_u8, |acc, (a, b)| acc | (a.to_ascii_uppercase() ^ b.to_ascii_uppercase()))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSPHRASE: &str = "Mysecretsig1875!?";
    const FEEDBACK_SHA1: &str = "209113288F93A9AB8E474EA78D899AFDBB874355";
    const FEEDBACK_SHA256: &str =
        "C1500A19AC0A18216073A8B9952A54919C8A5C7B06F0ADAD6A59FC3EC7472A49";

    fn feedback() -> FieldSet {
        [
            ("orderID", "12"),
            ("currency", "EUR"),
            ("amount", "15"),
            ("PM", "CreditCard"),
            ("ACCEPTANCE", "1234"),
            ("STATUS", "9"),
            ("CARDNO", "XXXXXXXXXXXX1111"),
            ("PAYID", "32100123"),
            ("NCERROR", "0"),
            ("BRAND", "VISA"),
            ("PARAMPLUS", "payment_id=12"),
        ]
        .into_iter()
        .collect()
    }

    fn verifier(algorithm: HashAlgorithm) -> ShaVerifier {
        ShaVerifier::new(SecretString::new(PASSPHRASE.to_owned()), algorithm)
    }

    #[test]
    fn test_known_feedback_signature_verifies() {
        assert!(verifier(HashAlgorithm::Sha1).verify_signature(&feedback(), FEEDBACK_SHA1).is_ok());
        assert!(
            verifier(HashAlgorithm::Sha256).verify_signature(&feedback(), FEEDBACK_SHA256).is_ok()
        );
    }

    #[test]
    fn test_lowercase_digest_verifies() {
        let lowercase = FEEDBACK_SHA1.to_ascii_lowercase();
        assert!(verifier(HashAlgorithm::Sha1).verify_signature(&feedback(), &lowercase).is_ok());
    }

    #[test]
    fn test_verify_reads_shasign_field() {
        let mut fields = feedback();
        fields.set("shasign", FEEDBACK_SHA1);
        assert!(verifier(HashAlgorithm::Sha1).verify(&fields).is_ok());
    }

    #[test]
    fn test_tampered_amount_is_rejected() {
        let mut fields = feedback();
        fields.set("AMOUNT", "1500").set("SHASIGN", FEEDBACK_SHA1);

        let result = verifier(HashAlgorithm::Sha1).verify(&fields);
        assert!(matches!(result, Err(IngenicoError::SignatureMismatch)));
    }

    #[test]
    fn test_wrong_algorithm_is_rejected() {
        let result = verifier(HashAlgorithm::Sha512).verify_signature(&feedback(), FEEDBACK_SHA1);
        assert!(matches!(result, Err(IngenicoError::SignatureMismatch)));
    }

    #[test]
    fn test_missing_or_empty_signature() {
        let verifier = verifier(HashAlgorithm::Sha1);
        assert!(matches!(verifier.verify(&feedback()), Err(IngenicoError::MissingSignature)));

        let mut fields = feedback();
        fields.set("SHASIGN", "");
        assert!(matches!(verifier.verify(&fields), Err(IngenicoError::MissingSignature)));
    }

    #[test]
    fn test_digests_match() {
        assert!(digests_match("ABCDEF", "abcdef"));
        assert!(!digests_match("ABCDEF", "ABCDE"));
        assert!(!digests_match("ABCDEF", "ABCDEE"));
    }
}
