//! DirectLink order response.
//!
//! The gateway answers an order with a single `<ncresponse>` element. Result fields are
//! attributes of that element; the only child is an optional `HTML_ANSWER` holding a base64
//! encoded page the shopper must be sent to (3-D Secure identification).

use base64::{Engine, engine::general_purpose::STANDARD};
use quick_xml::{Reader, events::Event};
use serde::Deserialize;

use super::decode_text;
use crate::{
    error::{GatewayError, IngenicoError, Result},
    status::{self, CanonicalStatus},
};

/// Root element of every DirectLink answer.
const ROOT_ELEMENT: &str = "ncresponse";

/// Wire shape of `<ncresponse>`.
#[derive(Debug, Deserialize)]
struct RawOrderResponse {
    #[serde(rename = "@orderID", default)]
    order_id: String,
    #[serde(rename = "@PAYID", default)]
    pay_id: String,
    #[serde(rename = "@NCSTATUS", default)]
    nc_status: String,
    #[serde(rename = "@NCERROR", default)]
    nc_error: String,
    #[serde(rename = "@NCERRORPLUS", default)]
    nc_error_plus: String,
    #[serde(rename = "@ACCEPTANCE", default)]
    acceptance: String,
    #[serde(rename = "@STATUS", default)]
    status: String,
    #[serde(rename = "@ECI", default)]
    eci: String,
    #[serde(rename = "@AMOUNT", alias = "@amount", default)]
    amount: String,
    #[serde(rename = "@CURRENCY", alias = "@currency", default)]
    currency: String,
    #[serde(rename = "@PM", default)]
    pm: String,
    #[serde(rename = "@BRAND", default)]
    brand: String,
    #[serde(rename = "HTML_ANSWER", default)]
    html_answer: Option<String>,
}

/// Parsed order response.
///
/// Attributes are kept as the raw strings the gateway sent; a missing attribute is an empty
/// string. Equality is structural.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderResponse {
    /// Merchant order reference (`orderID`).
    pub order_id: String,
    /// Gateway transaction id (`PAYID`).
    pub pay_id: String,
    /// First digit of the error code (`NCSTATUS`).
    pub nc_status: String,
    /// Gateway status code (`STATUS`).
    pub status: String,
    /// Error code (`NCERROR`); `"0"` or empty means no error.
    pub nc_error: String,
    /// Error explanation (`NCERRORPLUS`).
    pub nc_error_plus: String,
    /// Acquirer acceptance code.
    pub acceptance: String,
    /// Electronic commerce indicator.
    pub eci: String,
    /// Order amount as echoed by the gateway.
    pub amount: String,
    /// Order currency.
    pub currency: String,
    /// Payment method.
    pub pm: String,
    /// Card brand.
    pub brand: String,
    /// Decoded `HTML_ANSWER`, present when the shopper has to be redirected.
    pub html_answer: Option<String>,
}

impl OrderResponse {
    /// Parses a response body as received from the transport.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::MalformedResponse`] when the body is not a readable order
    /// response or when `HTML_ANSWER` is not valid base64.
    pub fn parse(body: &[u8]) -> Result<Self> {
        Self::from_xml(&decode_text(body))
    }

    /// Parses an XML document.
    ///
    /// # Errors
    ///
    /// Same as [`OrderResponse::parse`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ingenico_directlink::xml::OrderResponse;
    ///
    /// let response = OrderResponse::from_xml(
    ///     r#"<ncresponse orderID="54" PAYID="23286404" NCERROR="0" NCERRORPLUS="!" STATUS="9"/>"#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(response.pay_id, "23286404");
    /// assert!(!response.has_error());
    /// assert_eq!(response.html_answer, None);
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = root_element(xml)?;
        if !root.eq_ignore_ascii_case(ROOT_ELEMENT) {
            return Err(IngenicoError::MalformedResponse(format!(
                "unexpected root element <{root}>"
            )));
        }

        let raw: RawOrderResponse = quick_xml::de::from_str(xml)
            .map_err(|e| IngenicoError::MalformedResponse(format!("invalid order response: {e}")))?;

        let html_answer = raw.html_answer.as_deref().map(decode_html_answer).transpose()?.flatten();

        Ok(Self {
            order_id: raw.order_id,
            pay_id: raw.pay_id,
            nc_status: raw.nc_status,
            status: raw.status,
            nc_error: raw.nc_error,
            nc_error_plus: raw.nc_error_plus,
            acceptance: raw.acceptance,
            eci: raw.eci,
            amount: raw.amount,
            currency: raw.currency,
            pm: raw.pm,
            brand: raw.brand,
            html_answer,
        })
    }

    /// Returns `true` when `NCERROR` carries an error code.
    #[must_use]
    pub fn has_error(&self) -> bool {
        let code = self.nc_error.trim();
        !code.is_empty() && code != "0"
    }

    /// Gateway error carried by this response, if any.
    ///
    /// Code and explanation are passed on exactly as received.
    #[must_use]
    pub fn gateway_error(&self) -> Option<GatewayError> {
        self.has_error()
            .then(|| GatewayError::new(self.nc_error.as_str(), self.nc_error_plus.as_str()))
    }

    /// Canonical state of `STATUS`.
    ///
    /// # Errors
    ///
    /// Returns [`IngenicoError::UnmappedStatus`] for codes outside the status table.
    pub fn canonical_status(&self) -> Result<CanonicalStatus> {
        status::transform(&self.status)
    }
}

/// Name of the first element in the document.
fn root_element(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                return Ok(String::from_utf8_lossy(element.name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => {
                return Err(IngenicoError::MalformedResponse("empty response body".to_owned()));
            }
            Ok(_) => {}
            Err(e) => {
                return Err(IngenicoError::MalformedResponse(format!("invalid XML: {e}")));
            }
        }
    }
}

/// Decodes the base64 text of `HTML_ANSWER`; blank content counts as absent.
fn decode_html_answer(encoded: &str) -> Result<Option<String>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Ok(None);
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| IngenicoError::MalformedResponse(format!("invalid HTML_ANSWER: {e}")))?;

    Ok(Some(decode_text(&bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attributes_are_empty() {
        let response = OrderResponse::from_xml(r#"<ncresponse orderID="7"/>"#).unwrap();

        assert_eq!(
            response,
            OrderResponse { order_id: "7".to_owned(), ..OrderResponse::default() }
        );
    }

    #[test]
    fn test_all_attributes() {
        let xml = r#"<?xml version="1.0"?>
<ncresponse orderID="12" PAYID="32100123" NCSTATUS="0" NCERROR="0" NCERRORPLUS="!"
    ACCEPTANCE="test123" STATUS="9" ECI="7" amount="15" currency="EUR" PM="CreditCard"
    BRAND="VISA" IP="127.0.0.1"/>"#;

        let response = OrderResponse::from_xml(xml).unwrap();
        assert_eq!(response.order_id, "12");
        assert_eq!(response.nc_status, "0");
        assert_eq!(response.acceptance, "test123");
        assert_eq!(response.eci, "7");
        assert_eq!(response.amount, "15");
        assert_eq!(response.currency, "EUR");
        assert_eq!(response.pm, "CreditCard");
        assert_eq!(response.brand, "VISA");
        assert_eq!(response.canonical_status().unwrap(), CanonicalStatus::Success);
    }

    #[test]
    fn test_attribute_values_are_not_trimmed() {
        let response =
            OrderResponse::from_xml(r#"<ncresponse NCERRORPLUS=" padded " STATUS="5"/>"#).unwrap();
        assert_eq!(response.nc_error_plus, " padded ");
    }

    #[test]
    fn test_html_answer_decoded() {
        let xml = "<ncresponse STATUS=\"46\"><HTML_ANSWER>PGZvcm0+\nPC9mb3JtPg==</HTML_ANSWER></ncresponse>";
        let response = OrderResponse::from_xml(xml).unwrap();
        assert_eq!(response.html_answer.as_deref(), Some("<form></form>"));
    }

    #[test]
    fn test_empty_html_answer_is_absent() {
        let response =
            OrderResponse::from_xml("<ncresponse STATUS=\"9\"><HTML_ANSWER></HTML_ANSWER></ncresponse>")
                .unwrap();
        assert_eq!(response.html_answer, None);
    }

    #[test]
    fn test_invalid_base64_is_malformed() {
        let result = OrderResponse::from_xml(
            "<ncresponse STATUS=\"46\"><HTML_ANSWER>not*base64</HTML_ANSWER></ncresponse>",
        );
        assert!(matches!(result, Err(IngenicoError::MalformedResponse(_))));
    }

    #[test]
    fn test_not_xml_is_malformed() {
        assert!(matches!(
            OrderResponse::parse(b"<html><body>Service unavailable"),
            Err(IngenicoError::MalformedResponse(_))
        ));
        assert!(matches!(OrderResponse::parse(b""), Err(IngenicoError::MalformedResponse(_))));
        assert!(matches!(
            OrderResponse::parse(b"<html><body>Bad gateway</body></html>"),
            Err(IngenicoError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_latin1_body() {
        let body = b"<ncresponse NCERROR=\"50001111\" NCERRORPLUS=\"Donn\xe9es invalides\"/>";
        let response = OrderResponse::parse(body).unwrap();
        assert_eq!(response.nc_error_plus, "Donn\u{e9}es invalides");
    }

    #[test]
    fn test_error_detection() {
        let mut response = OrderResponse::default();
        assert!(!response.has_error());
        assert_eq!(response.gateway_error(), None);

        response.nc_error = "0".to_owned();
        assert!(!response.has_error());

        response.nc_error = "50001111".to_owned();
        response.nc_error_plus = "Data validation error".to_owned();
        let error = response.gateway_error().unwrap();
        assert_eq!(error.to_string(), "50001111 Data validation error");
    }

    #[test]
    fn test_gateway_error_keeps_padding() {
        let response = OrderResponse::from_xml(
            r#"<ncresponse NCERROR="50001111" NCERRORPLUS=" Data validation error: ED! " STATUS="0"/>"#,
        )
        .unwrap();
        let error = response.gateway_error().unwrap();
        assert_eq!(error.explanation, " Data validation error: ED! ");
        assert_eq!(error.to_string(), "50001111  Data validation error: ED! ");
    }
}
