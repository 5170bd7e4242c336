//! Persisted-payment collaborator and the merchant-side order model.
//!
//! The gateway flows never store anything themselves. They read an [`OrderRequest`], talk to the
//! gateway and report the outcome through the [`Payment`] trait; where and how payments live is
//! up to the caller. [`MemoryPaymentStore`] is a thread-safe in-memory implementation for tests,
//! examples and the operator tooling.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    config::GatewayConfig,
    fields::{CustomerData, FieldSet, GeneralData},
    security::redact_card_number,
    status::CanonicalStatus,
};

const DEFAULT_LOCALE: &str = "en_US";

/// A payment record the flows report to.
///
/// Every setter is expected to be idempotent: feedback notifications can arrive more than once
/// and apply the same update each time.
pub trait Payment {
    /// Merchant payment id.
    fn id(&self) -> &str;

    /// Records the gateway transaction id (`PAYID`).
    fn set_transaction_id(&mut self, transaction_id: &str);

    /// Records the canonical status.
    fn set_status(&mut self, status: CanonicalStatus);

    /// Records where the shopper should be sent next.
    fn set_action_url(&mut self, url: &str);

    /// Stores a free-form value on the payment.
    fn set_meta(&mut self, key: &str, value: &str);
}

/// Looks up payments by merchant payment id.
pub trait PaymentRepository {
    /// Handle type returned by the repository.
    type Payment: Payment;

    /// Returns the payment with the given id, if it exists.
    fn get_payment(&self, id: &str) -> Option<Self::Payment>;
}

/// Customer fields sent with an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Card holder name (`CN`).
    pub name: String,
    /// E-mail address.
    pub email: String,
    /// Street address.
    pub address: String,
    /// Postal code.
    pub zip: String,
    /// City.
    pub city: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Telephone number.
    pub telephone: String,
}

/// Card data for a DirectLink order.
///
/// Wiped from memory on drop; `Debug` shows only the last four digits of the number.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CardDetails {
    number: String,
    expiry_month: u8,
    expiry_year: u16,
    security_code: String,
}

impl CardDetails {
    /// Creates card details.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(
        number: impl Into<String>,
        expiry_month: u8,
        expiry_year: u16,
        security_code: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiry_month,
            expiry_year,
            security_code: security_code.into(),
        }
    }

    /// Card number.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Expiry month, 1 to 12.
    #[must_use]
    pub const fn expiry_month(&self) -> u8 {
        self.expiry_month
    }

    /// Expiry year, two or four digits.
    #[must_use]
    pub const fn expiry_year(&self) -> u16 {
        self.expiry_year
    }

    /// Card security code.
    #[must_use]
    pub fn security_code(&self) -> &str {
        &self.security_code
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &redact_card_number(&self.number))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("security_code", &"***")
            .finish()
    }
}

/// Shopper browser headers, forwarded for 3-D Secure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserContext {
    /// `Accept` header value.
    pub accept: String,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl BrowserContext {
    /// Creates a browser context from the shopper's request headers.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(accept: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self { accept: accept.into(), user_agent: user_agent.into() }
    }
}

/// Merchant-side inputs for one order.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::payment::{CardDetails, OrderRequest};
///
/// let order = OrderRequest::new("42", "EUR", 1500)
///     .with_order_number("1001")
///     .with_description("Order #1001")
///     .with_card(CardDetails::new("4111111111111111", 12, 2030, "123"))
///     .with_return_url("https://shop.example.com/return");
///
/// assert_eq!(order.amount, 1500);
/// assert_eq!(order.locale, "en_US");
/// assert!(!format!("{order:?}").contains("4111111111111111"));
/// ```
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Merchant payment id, echoed back through `PARAMPLUS`.
    pub payment_id: String,
    /// Merchant order number, available to the `ORDERID` template.
    pub order_number: Option<String>,
    /// Order description (`COM`).
    pub description: String,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Amount in minor units; callers round before building the request.
    pub amount: u64,
    /// Shopper locale, `en_US` by default.
    pub locale: String,
    /// Customer fields.
    pub customer: CustomerDetails,
    /// Card data, DirectLink only.
    pub card: Option<CardDetails>,
    /// Page the shopper returns to after payment.
    pub return_url: String,
}

impl OrderRequest {
    /// Creates an order with the mandatory fields.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn new(payment_id: impl Into<String>, currency: impl Into<String>, amount: u64) -> Self {
        Self {
            payment_id: payment_id.into(),
            order_number: None,
            description: String::new(),
            currency: currency.into(),
            amount,
            locale: DEFAULT_LOCALE.to_owned(),
            customer: CustomerDetails::default(),
            card: None,
            return_url: String::new(),
        }
    }

    /// Sets the merchant order number.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    /// Sets the order description.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the shopper locale.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets the customer fields.
    #[must_use]
    pub fn with_customer(mut self, customer: CustomerDetails) -> Self {
        self.customer = customer;
        self
    }

    /// Attaches card data.
    #[must_use]
    pub fn with_card(mut self, card: CardDetails) -> Self {
        self.card = Some(card);
        self
    }

    /// Sets the return URL.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = url.into();
        self
    }

    /// General and customer fields shared by both order flows.
    pub(crate) fn order_fields(&self, config: &GatewayConfig) -> FieldSet {
        let mut fields = FieldSet::new();
        let order_id = config.format_order_id(&self.payment_id, self.order_number.as_deref());
        let param_plus = format!("payment_id={}", self.payment_id);

        let mut general = GeneralData::new(&mut fields);
        general
            .psp_id(&config.psp_id)
            .order_id(&order_id)
            .order_description(&self.description)
            .param_plus(&param_plus)
            .currency(&self.currency)
            .amount(self.amount)
            .language(&self.locale);
        if let Some(param_var) = config.format_param_var() {
            general.param_var(&param_var);
        }
        if let Some(template_page) = &config.template_page {
            general.template_page(template_page);
        }

        let customer = &self.customer;
        CustomerData::new(&mut fields)
            .name(&customer.name)
            .email(&customer.email)
            .address(&customer.address)
            .zip(&customer.zip)
            .town(&customer.city)
            .country(&customer.country)
            .telephone_number(&customer.telephone);

        fields
    }
}

/// Snapshot of a payment held by [`MemoryPaymentStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentRecord {
    /// Gateway transaction id.
    pub transaction_id: Option<String>,
    /// Latest canonical status.
    pub status: Option<CanonicalStatus>,
    /// Every status applied, in order.
    pub status_history: Vec<CanonicalStatus>,
    /// Latest action URL.
    pub action_url: Option<String>,
    /// Meta values.
    pub meta: BTreeMap<String, String>,
}

type Records = Arc<Mutex<HashMap<String, PaymentRecord>>>;

fn lock(records: &Records) -> MutexGuard<'_, HashMap<String, PaymentRecord>> {
    records.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Thread-safe in-memory payment store.
///
/// Handles returned by [`MemoryPaymentStore::create`] and
/// [`PaymentRepository::get_payment`] write straight through to the store.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::{
///     CanonicalStatus,
///     payment::{MemoryPaymentStore, Payment, PaymentRepository},
/// };
///
/// let store = MemoryPaymentStore::new();
/// store.create("42");
///
/// let mut payment = store.get_payment("42").unwrap();
/// payment.set_status(CanonicalStatus::Success);
///
/// assert_eq!(store.record("42").unwrap().status, Some(CanonicalStatus::Success));
/// assert!(store.get_payment("43").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryPaymentStore {
    records: Records,
}

impl MemoryPaymentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or resets) a payment and returns a handle to it.
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn create(&self, id: impl Into<String>) -> MemoryPayment {
        let id = id.into();
        lock(&self.records).insert(id.clone(), PaymentRecord::default());
        MemoryPayment { id, records: Arc::clone(&self.records) }
    }

    /// Returns a snapshot of a payment.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<PaymentRecord> {
        lock(&self.records).get(id).cloned()
    }
}

impl PaymentRepository for MemoryPaymentStore {
    type Payment = MemoryPayment;

    fn get_payment(&self, id: &str) -> Option<MemoryPayment> {
        lock(&self.records)
            .contains_key(id)
            .then(|| MemoryPayment { id: id.to_owned(), records: Arc::clone(&self.records) })
    }
}

/// Write-through handle into a [`MemoryPaymentStore`].
#[derive(Debug, Clone)]
pub struct MemoryPayment {
    id: String,
    records: Records,
}

impl MemoryPayment {
    fn update(&self, apply: impl FnOnce(&mut PaymentRecord)) {
        apply(lock(&self.records).entry(self.id.clone()).or_default());
    }
}

impl Payment for MemoryPayment {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_transaction_id(&mut self, transaction_id: &str) {
        self.update(|record| record.transaction_id = Some(transaction_id.to_owned()));
    }

    fn set_status(&mut self, status: CanonicalStatus) {
        self.update(|record| {
            record.status = Some(status);
            record.status_history.push(status);
        });
    }

    fn set_action_url(&mut self, url: &str) {
        self.update(|record| record.action_url = Some(url.to_owned()));
    }

    fn set_meta(&mut self, key: &str, value: &str) {
        self.update(|record| {
            record.meta.insert(key.to_owned(), value.to_owned());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        psp_id = "MyPSPID"
        outbound_secret = "in"
        inbound_secret = "out"
        order_id = "shop-{order_id}"
        param_var = "{home_url}ingenico"
        template_page = "https://shop.example.com/tp.html"
        home_url = "https://shop.example.com/"
    "#;

    #[test]
    fn test_card_details_debug_is_redacted() {
        let card = CardDetails::new("4111111111111111", 1, 2031, "987");
        let rendered = format!("{card:?}");

        assert!(rendered.contains("XXXXXXXXXXXX1111"));
        assert!(!rendered.contains("4111111111111111"));
        assert!(!rendered.contains("987"));
    }

    #[test]
    fn test_order_fields() {
        let config = GatewayConfig::from_toml(CONFIG).unwrap();
        let order = OrderRequest::new("42", "EUR", 1500)
            .with_order_number("1001")
            .with_description("Order #1001")
            .with_locale("fr_FR")
            .with_customer(CustomerDetails {
                name: "Jane Doe".to_owned(),
                city: "Paris".to_owned(),
                country: "FR".to_owned(),
                ..CustomerDetails::default()
            });

        let fields = order.order_fields(&config);

        assert_eq!(fields.get("PSPID"), Some("MyPSPID"));
        assert_eq!(fields.get("ORDERID"), Some("shop-1001"));
        assert_eq!(fields.get("COM"), Some("Order #1001"));
        assert_eq!(fields.get("PARAMPLUS"), Some("payment_id=42"));
        assert_eq!(fields.get("AMOUNT"), Some("1500"));
        assert_eq!(fields.get("CURRENCY"), Some("EUR"));
        assert_eq!(fields.get("LANGUAGE"), Some("fr_FR"));
        assert_eq!(fields.get("PARAMVAR"), Some("https://shop.example.com/ingenico"));
        assert_eq!(fields.get("TP"), Some("https://shop.example.com/tp.html"));
        assert_eq!(fields.get("CN"), Some("Jane Doe"));
        assert_eq!(fields.get("OWNERTOWN"), Some("Paris"));
        assert_eq!(fields.get("OWNERCTY"), Some("FR"));
        assert_eq!(fields.get("EMAIL"), Some(""));
    }

    #[test]
    fn test_order_fields_without_optional_config() {
        let config = GatewayConfig::from_toml(
            "psp_id = \"MyPSPID\"\noutbound_secret = \"in\"\ninbound_secret = \"out\"\n",
        )
        .unwrap();
        let fields = OrderRequest::new("42", "EUR", 1).order_fields(&config);

        assert_eq!(fields.get("ORDERID"), Some("42"));
        assert!(!fields.contains("PARAMVAR"));
        assert!(!fields.contains("TP"));
    }

    #[test]
    fn test_memory_store_writes_through() {
        let store = MemoryPaymentStore::new();
        let mut created = store.create("7");
        created.set_transaction_id("32100123");

        let mut fetched = store.get_payment("7").unwrap();
        fetched.set_status(CanonicalStatus::Open);
        fetched.set_status(CanonicalStatus::Success);
        fetched.set_action_url("https://shop.example.com/return");
        fetched.set_meta("key", "value");

        let record = store.record("7").unwrap();
        assert_eq!(record.transaction_id.as_deref(), Some("32100123"));
        assert_eq!(record.status, Some(CanonicalStatus::Success));
        assert_eq!(record.status_history, vec![CanonicalStatus::Open, CanonicalStatus::Success]);
        assert_eq!(record.action_url.as_deref(), Some("https://shop.example.com/return"));
        assert_eq!(record.meta.get("key").map(String::as_str), Some("value"));
        assert_eq!(fetched.id(), "7");
    }

    #[test]
    fn test_memory_store_unknown_payment() {
        let store = MemoryPaymentStore::new();
        assert!(store.get_payment("missing").is_none());
        assert_eq!(store.record("missing"), None);
    }

    #[test]
    fn test_memory_store_is_shared_across_threads() {
        let store = MemoryPaymentStore::new();
        store.create("1");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut payment = store.get_payment("1").unwrap();
                    payment.set_status(CanonicalStatus::Success);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.record("1").unwrap().status_history.len(), 4);
    }
}
