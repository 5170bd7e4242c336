use proptest::prelude::*;
use secrecy::SecretString;

use crate::{
    error::IngenicoError,
    fields::FieldSet,
    sha::{Direction, HashAlgorithm, ShaSigner, ShaVerifier},
};

const INBOUND_NAMES: &[&str] =
    &["ORDERID", "PAYID", "STATUS", "NCERROR", "AMOUNT", "CURRENCY", "PM", "BRAND", "ACCEPTANCE"];

fn algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop_oneof![Just(HashAlgorithm::Sha1), Just(HashAlgorithm::Sha256), Just(HashAlgorithm::Sha512)]
}

fn inbound_fields() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec("[A-Za-z0-9 .-]{1,16}", INBOUND_NAMES.len()).prop_map(|values| {
        INBOUND_NAMES.iter().map(|name| (*name).to_owned()).zip(values).collect()
    })
}

fn signer(passphrase: &str, algorithm: HashAlgorithm) -> ShaSigner {
    ShaSigner::new(SecretString::new(passphrase.to_owned()), algorithm, Direction::Inbound)
}

fn verifier(passphrase: &str, algorithm: HashAlgorithm) -> ShaVerifier {
    ShaVerifier::new(SecretString::new(passphrase.to_owned()), algorithm)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_signature_is_deterministic(
        pairs in inbound_fields(),
        passphrase in "[ -~]{8,32}",
        algorithm in algorithm(),
    ) {
        let fields: FieldSet = pairs.into_iter().collect();
        let signer = signer(&passphrase, algorithm);

        let first = signer.sign(&fields);
        prop_assert_eq!(&first, &signer.sign(&fields));
        prop_assert_eq!(first.len(), algorithm.hex_len());
        prop_assert!(first.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
    }

    #[test]
    fn test_insertion_order_does_not_change_signature(
        pairs in inbound_fields(),
        passphrase in "[ -~]{8,32}",
        algorithm in algorithm(),
        rotation in 0_usize..INBOUND_NAMES.len(),
    ) {
        let ordered: FieldSet = pairs.iter().cloned().collect();

        let mut rotated_pairs = pairs;
        rotated_pairs.rotate_left(rotation);
        rotated_pairs.reverse();
        let rotated: FieldSet = rotated_pairs
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        let signer = signer(&passphrase, algorithm);
        prop_assert_eq!(signer.sign(&ordered), signer.sign(&rotated));
    }

    #[test]
    fn test_verification_ignores_digest_case(
        pairs in inbound_fields(),
        passphrase in "[ -~]{8,32}",
        algorithm in algorithm(),
    ) {
        let fields: FieldSet = pairs.into_iter().collect();
        let signature = signer(&passphrase, algorithm).sign(&fields);
        let verifier = verifier(&passphrase, algorithm);

        prop_assert!(verifier.verify_signature(&fields, &signature).is_ok());
        prop_assert!(verifier.verify_signature(&fields, &signature.to_ascii_lowercase()).is_ok());
    }

    #[test]
    fn test_tampered_value_fails_verification(
        pairs in inbound_fields(),
        passphrase in "[ -~]{8,32}",
        algorithm in algorithm(),
        index in 0_usize..INBOUND_NAMES.len(),
    ) {
        let mut fields: FieldSet = pairs.into_iter().collect();
        let signature = signer(&passphrase, algorithm).sign(&fields);

        let name = INBOUND_NAMES[index];
        let tampered = format!("{}X", fields.get(name).unwrap_or_default());
        fields.set(name, tampered);

        let result = verifier(&passphrase, algorithm).verify_signature(&fields, &signature);
        prop_assert!(matches!(result, Err(IngenicoError::SignatureMismatch)));
    }

    #[test]
    fn test_wrong_passphrase_fails_verification(
        pairs in inbound_fields(),
        passphrase in "[a-z]{8,16}",
        algorithm in algorithm(),
    ) {
        let fields: FieldSet = pairs.into_iter().collect();
        let signature = signer(&passphrase, algorithm).sign(&fields);
        let other = format!("{passphrase}!");

        prop_assert!(verifier(&other, algorithm).verify_signature(&fields, &signature).is_err());
    }
}
