//! Named setters over a [`FieldSet`].
//!
//! Each builder borrows a field set and writes exactly one wire field per setter. Values are not
//! validated here; bad values come back from the gateway as an `NCERROR`.
//!
//! # Examples
//!
//! ```
//! use ingenico_directlink::fields::{CustomerData, FieldSet, GeneralData};
//!
//! let mut fields = FieldSet::new();
//! GeneralData::new(&mut fields).psp_id("MyPSPID").order_id("1234").amount(1500).currency("EUR");
//! CustomerData::new(&mut fields).name("Jane Doe").email("jane@example.com");
//!
//! assert_eq!(fields.get("AMOUNT"), Some("1500"));
//! assert_eq!(fields.get("CN"), Some("Jane Doe"));
//! ```

use super::{FieldSet, names};
use crate::config::Operation;

/// General order fields: account, reference, amount and redirect targets.
#[derive(Debug)]
pub struct GeneralData<'a> {
    fields: &'a mut FieldSet,
}

impl<'a> GeneralData<'a> {
    /// Wraps a field set.
    pub const fn new(fields: &'a mut FieldSet) -> Self {
        Self { fields }
    }

    /// Sets `PSPID`.
    pub fn psp_id(&mut self, psp_id: &str) -> &mut Self {
        self.fields.set(names::PSPID, psp_id);
        self
    }

    /// Sets `ORDERID`.
    pub fn order_id(&mut self, order_id: &str) -> &mut Self {
        self.fields.set(names::ORDERID, order_id);
        self
    }

    /// Sets `COM`, the order description.
    pub fn order_description(&mut self, description: &str) -> &mut Self {
        self.fields.set(names::COM, description);
        self
    }

    /// Sets `PARAMPLUS`.
    pub fn param_plus(&mut self, param_plus: &str) -> &mut Self {
        self.fields.set(names::PARAMPLUS, param_plus);
        self
    }

    /// Sets `PARAMVAR`.
    pub fn param_var(&mut self, param_var: &str) -> &mut Self {
        self.fields.set(names::PARAMVAR, param_var);
        self
    }

    /// Sets `TP`.
    pub fn template_page(&mut self, template_page: &str) -> &mut Self {
        self.fields.set(names::TP, template_page);
        self
    }

    /// Sets `CURRENCY`.
    pub fn currency(&mut self, currency: &str) -> &mut Self {
        self.fields.set(names::CURRENCY, currency);
        self
    }

    /// Sets `AMOUNT` from minor currency units.
    pub fn amount(&mut self, minor_units: u64) -> &mut Self {
        self.fields.set(names::AMOUNT, minor_units.to_string());
        self
    }

    /// Sets `LANGUAGE`.
    pub fn language(&mut self, locale: &str) -> &mut Self {
        self.fields.set(names::LANGUAGE, locale);
        self
    }

    /// Sets `ACCEPTURL`.
    pub fn accept_url(&mut self, url: &str) -> &mut Self {
        self.fields.set(names::ACCEPTURL, url);
        self
    }

    /// Sets `DECLINEURL`.
    pub fn decline_url(&mut self, url: &str) -> &mut Self {
        self.fields.set(names::DECLINEURL, url);
        self
    }

    /// Sets `EXCEPTIONURL`.
    pub fn exception_url(&mut self, url: &str) -> &mut Self {
        self.fields.set(names::EXCEPTIONURL, url);
        self
    }

    /// Sets `CANCELURL`.
    pub fn cancel_url(&mut self, url: &str) -> &mut Self {
        self.fields.set(names::CANCELURL, url);
        self
    }

    /// Sets `COMPLUS`.
    pub fn complus(&mut self, value: &str) -> &mut Self {
        self.fields.set(names::COMPLUS, value);
        self
    }
}

/// Customer fields.
#[derive(Debug)]
pub struct CustomerData<'a> {
    fields: &'a mut FieldSet,
}

impl<'a> CustomerData<'a> {
    /// Wraps a field set.
    pub const fn new(fields: &'a mut FieldSet) -> Self {
        Self { fields }
    }

    /// Sets `CN`.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.fields.set(names::CN, name);
        self
    }

    /// Sets `EMAIL`.
    pub fn email(&mut self, email: &str) -> &mut Self {
        self.fields.set(names::EMAIL, email);
        self
    }

    /// Sets `OWNERADDRESS`.
    pub fn address(&mut self, address: &str) -> &mut Self {
        self.fields.set(names::OWNERADDRESS, address);
        self
    }

    /// Sets `OWNERZIP`.
    pub fn zip(&mut self, zip: &str) -> &mut Self {
        self.fields.set(names::OWNERZIP, zip);
        self
    }

    /// Sets `OWNERTOWN`.
    pub fn town(&mut self, town: &str) -> &mut Self {
        self.fields.set(names::OWNERTOWN, town);
        self
    }

    /// Sets `OWNERCTY`.
    pub fn country(&mut self, country: &str) -> &mut Self {
        self.fields.set(names::OWNERCTY, country);
        self
    }

    /// Sets `OWNERTELNO`.
    pub fn telephone_number(&mut self, telephone: &str) -> &mut Self {
        self.fields.set(names::OWNERTELNO, telephone);
        self
    }
}

/// Payment card fields.
#[derive(Debug)]
pub struct CreditCardData<'a> {
    fields: &'a mut FieldSet,
}

impl<'a> CreditCardData<'a> {
    /// Wraps a field set.
    pub const fn new(fields: &'a mut FieldSet) -> Self {
        Self { fields }
    }

    /// Sets `CARDNO`.
    pub fn number(&mut self, number: &str) -> &mut Self {
        self.fields.set(names::CARDNO, number);
        self
    }

    /// Sets `ED` as two-digit month followed by two-digit year.
    ///
    /// ```
    /// use ingenico_directlink::fields::{CreditCardData, FieldSet};
    ///
    /// let mut fields = FieldSet::new();
    /// CreditCardData::new(&mut fields).expiration_date(3, 2027);
    /// assert_eq!(fields.get("ED"), Some("0327"));
    /// ```
    pub fn expiration_date(&mut self, month: u8, year: u16) -> &mut Self {
        self.fields.set(names::ED, format!("{month:02}{:02}", year % 100));
        self
    }

    /// Sets `CVC`.
    pub fn security_code(&mut self, code: &str) -> &mut Self {
        self.fields.set(names::CVC, code);
        self
    }
}

/// Window the 3-D Secure identification page is shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Window3ds {
    /// Same browser window as the checkout.
    #[default]
    MainWindow,
    /// Pop-up window.
    PopUp,
    /// Pop-up window on top of the checkout.
    PopIx,
}

impl Window3ds {
    /// Wire value for `WIN3DS`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainWindow => "MAINW",
            Self::PopUp => "POPUP",
            Self::PopIx => "POPIX",
        }
    }
}

/// 3-D Secure fields.
#[derive(Debug)]
pub struct SecureData<'a> {
    fields: &'a mut FieldSet,
}

impl<'a> SecureData<'a> {
    /// Wraps a field set.
    pub const fn new(fields: &'a mut FieldSet) -> Self {
        Self { fields }
    }

    /// Sets `FLAG3D` to `Y` or `N`.
    pub fn flag(&mut self, enabled: bool) -> &mut Self {
        self.fields.set(names::FLAG3D, if enabled { "Y" } else { "N" });
        self
    }

    /// Sets `HTTP_ACCEPT`.
    pub fn http_accept(&mut self, accept: &str) -> &mut Self {
        self.fields.set(names::HTTP_ACCEPT, accept);
        self
    }

    /// Sets `HTTP_USER_AGENT`.
    pub fn http_user_agent(&mut self, user_agent: &str) -> &mut Self {
        self.fields.set(names::HTTP_USER_AGENT, user_agent);
        self
    }

    /// Sets `WIN3DS`.
    pub fn window(&mut self, window: Window3ds) -> &mut Self {
        self.fields.set(names::WIN3DS, window.as_str());
        self
    }
}

/// DirectLink API credentials and operation.
#[derive(Debug)]
pub struct DirectLinkData<'a> {
    fields: &'a mut FieldSet,
}

impl<'a> DirectLinkData<'a> {
    /// Wraps a field set.
    pub const fn new(fields: &'a mut FieldSet) -> Self {
        Self { fields }
    }

    /// Sets `USERID`.
    pub fn user_id(&mut self, user_id: &str) -> &mut Self {
        self.fields.set(names::USERID, user_id);
        self
    }

    /// Sets `PSWD`.
    pub fn password(&mut self, password: &str) -> &mut Self {
        self.fields.set(names::PSWD, password);
        self
    }

    /// Sets `OPERATION`.
    pub fn operation(&mut self, operation: Operation) -> &mut Self {
        self.fields.set(names::OPERATION, operation.as_str());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_data_writes_one_field_per_setter() {
        let mut fields = FieldSet::new();
        GeneralData::new(&mut fields)
            .psp_id("MyPSPID")
            .order_id("1234")
            .order_description("Order #1234")
            .param_plus("payment_id=7")
            .currency("EUR")
            .amount(1500)
            .language("en_US");

        assert_eq!(fields.len(), 7);
        assert_eq!(fields.get("COM"), Some("Order #1234"));
        assert_eq!(fields.get("PARAMPLUS"), Some("payment_id=7"));
        assert_eq!(fields.get("AMOUNT"), Some("1500"));
    }

    #[test]
    fn test_customer_data() {
        let mut fields = FieldSet::new();
        CustomerData::new(&mut fields)
            .name("Jane Doe")
            .email("jane@example.com")
            .address("Main Street 1")
            .zip("1234 AB")
            .town("Amsterdam")
            .country("NL")
            .telephone_number("+31 20 000 0000");

        assert_eq!(fields.get("OWNERADDRESS"), Some("Main Street 1"));
        assert_eq!(fields.get("OWNERZIP"), Some("1234 AB"));
        assert_eq!(fields.get("OWNERTOWN"), Some("Amsterdam"));
        assert_eq!(fields.get("OWNERCTY"), Some("NL"));
        assert_eq!(fields.get("OWNERTELNO"), Some("+31 20 000 0000"));
    }

    #[test]
    fn test_expiration_date_formats_month_and_two_digit_year() {
        let mut fields = FieldSet::new();
        let mut card = CreditCardData::new(&mut fields);

        card.expiration_date(1, 2030);
        assert_eq!(fields.get("ED"), Some("0130"));

        CreditCardData::new(&mut fields).expiration_date(12, 2009);
        assert_eq!(fields.get("ED"), Some("1209"));
    }

    #[test]
    fn test_credit_card_data() {
        let mut fields = FieldSet::new();
        CreditCardData::new(&mut fields).number("4111111111111111").security_code("123");

        assert_eq!(fields.get("CARDNO"), Some("4111111111111111"));
        assert_eq!(fields.get("CVC"), Some("123"));
    }

    #[test]
    fn test_secure_data() {
        let mut fields = FieldSet::new();
        SecureData::new(&mut fields)
            .flag(true)
            .http_accept("text/html")
            .http_user_agent("Mozilla/5.0")
            .window(Window3ds::MainWindow);

        assert_eq!(fields.get("FLAG3D"), Some("Y"));
        assert_eq!(fields.get("WIN3DS"), Some("MAINW"));
        assert_eq!(fields.get("HTTP_ACCEPT"), Some("text/html"));

        SecureData::new(&mut fields).flag(false).window(Window3ds::PopUp);
        assert_eq!(fields.get("FLAG3D"), Some("N"));
        assert_eq!(fields.get("WIN3DS"), Some("POPUP"));
    }

    #[test]
    fn test_directlink_data() {
        let mut fields = FieldSet::new();
        DirectLinkData::new(&mut fields)
            .user_id("api-user")
            .password("secret")
            .operation(Operation::Authorization);

        assert_eq!(fields.get("USERID"), Some("api-user"));
        assert_eq!(fields.get("PSWD"), Some("secret"));
        assert_eq!(fields.get("OPERATION"), Some("RES"));
    }
}
