//! Integration tests for inbound feedback: SHA-OUT verification, tampering and routing.

use ingenico_directlink::{
    CanonicalStatus, FieldSet, IngenicoError,
    config::GatewayConfig,
    feedback::{FeedbackHandler, FeedbackOutcome, IgnoreReason},
    payment::MemoryPaymentStore,
};

/// Feedback as posted by the gateway's test platform, before `SHASIGN` is added.
const FEEDBACK: [(&str, &str); 11] = [
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
];

const KNOWN_ANSWERS: [(&str, &str); 3] = [
    ("sha1", "209113288F93A9AB8E474EA78D899AFDBB874355"),
    ("sha256", "C1500A19AC0A18216073A8B9952A54919C8A5C7B06F0ADAD6A59FC3EC7472A49"),
    (
        "sha512",
        "C1F832D7620282B07E199F25A9C6AD94EAE264359012C5374B9A33D5A9C2C9C7104A0FE600EB3401E95CE3050E684BEF040DAAE5877FAFA312C63B9556F68878",
    ),
];

fn handler(algorithm: &str) -> FeedbackHandler {
    let toml = format!(
        r#"
        psp_id = "MyPSPID"
        sha_in_passphrase = "unused-in-feedback"
        sha_out_passphrase = "Mysecretsig1875!?"
        hash_algorithm = "{algorithm}"
        "#
    );
    FeedbackHandler::new(&GatewayConfig::from_toml(&toml).expect("valid config"))
}

fn feedback(shasign: &str) -> FieldSet {
    let mut fields: FieldSet = FEEDBACK.into_iter().collect();
    fields.set("SHASIGN", shasign);
    fields
}

#[test]
fn test_known_answer_signatures_verify() {
    for (algorithm, shasign) in KNOWN_ANSWERS {
        let status = handler(algorithm).evaluate(&feedback(shasign));
        assert_eq!(status.unwrap(), CanonicalStatus::Success, "{algorithm}");
    }
}

#[test]
fn test_signature_case_is_ignored() {
    for (algorithm, shasign) in KNOWN_ANSWERS {
        let status = handler(algorithm).evaluate(&feedback(&shasign.to_lowercase()));
        assert!(status.is_ok(), "{algorithm}");
    }
}

#[test]
fn test_tampered_amount_is_ignored() {
    let (algorithm, shasign) = KNOWN_ANSWERS[1];
    let handler = handler(algorithm);
    let store = MemoryPaymentStore::new();
    store.create("12");

    let mut fields = feedback(shasign);
    fields.set("amount", "1500");

    assert!(matches!(handler.evaluate(&fields), Err(IngenicoError::SignatureMismatch)));
    assert_eq!(
        handler.listen(&store, &fields),
        FeedbackOutcome::Ignored(IgnoreReason::SignatureMismatch)
    );
    assert_eq!(store.record("12").unwrap(), Default::default());
}

#[test]
fn test_signature_from_other_algorithm_is_rejected() {
    let (_, sha1) = KNOWN_ANSWERS[0];
    assert!(matches!(
        handler("sha512").evaluate(&feedback(sha1)),
        Err(IngenicoError::SignatureMismatch)
    ));
}

#[test]
fn test_unsigned_parameters_do_not_affect_verification() {
    let (algorithm, shasign) = KNOWN_ANSWERS[2];
    let mut fields = feedback(shasign);
    fields.set("PARAMPLUS", "payment_id=99").set("PAYMENT_ID", "12");

    assert!(handler(algorithm).evaluate(&fields).is_ok());
}

#[test]
fn test_listen_applies_verified_feedback() {
    let (algorithm, shasign) = KNOWN_ANSWERS[0];
    let store = MemoryPaymentStore::new();
    store.create("12");

    let outcome = handler(algorithm).listen(&store, &feedback(shasign));

    assert_eq!(outcome, FeedbackOutcome::Applied(CanonicalStatus::Success));
    let record = store.record("12").unwrap();
    assert_eq!(record.status, Some(CanonicalStatus::Success));
    assert_eq!(record.transaction_id.as_deref(), Some("32100123"));
}

#[test]
fn test_appended_payment_id_cannot_redirect_feedback() {
    let (algorithm, shasign) = KNOWN_ANSWERS[1];
    let store = MemoryPaymentStore::new();
    store.create("12");
    store.create("77");

    let mut fields = feedback(shasign);
    fields.set("PAYMENT_ID", "77");

    assert_eq!(
        handler(algorithm).listen(&store, &fields),
        FeedbackOutcome::Ignored(IgnoreReason::ReferenceMismatch)
    );
    assert_eq!(store.record("77").unwrap(), Default::default());
    assert_eq!(store.record("12").unwrap(), Default::default());
}

#[test]
fn test_listen_without_signature() {
    let store = MemoryPaymentStore::new();
    store.create("12");
    let fields: FieldSet = FEEDBACK.into_iter().collect();

    assert_eq!(
        handler("sha1").listen(&store, &fields),
        FeedbackOutcome::Ignored(IgnoreReason::MissingSignature)
    );
    assert_eq!(store.record("12").unwrap().status, None);
}

#[test]
fn test_listen_ignores_unrelated_requests() {
    let store = MemoryPaymentStore::new();
    let fields: FieldSet = [("page", "checkout"), ("lang", "en")].into_iter().collect();

    assert_eq!(
        handler("sha1").listen(&store, &fields),
        FeedbackOutcome::Ignored(IgnoreReason::NotFeedback)
    );
}

#[test]
fn test_query_string_round_trip() {
    let (algorithm, shasign) = KNOWN_ANSWERS[1];
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(feedback(shasign).iter())
        .finish();

    let fields: FieldSet = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();

    assert_eq!(handler(algorithm).evaluate(&fields).unwrap(), CanonicalStatus::Success);
}
