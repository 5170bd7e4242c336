//! Wire names of the gateway fields.
//!
//! Names are exact on the wire. The gateway matches them case-insensitively when it computes
//! `SHASIGN`, and so does this crate.

/// Merchant account identifier.
pub const PSPID: &str = "PSPID";
/// Merchant order reference.
pub const ORDERID: &str = "ORDERID";
/// Amount in minor currency units.
pub const AMOUNT: &str = "AMOUNT";
/// ISO 4217 currency code.
pub const CURRENCY: &str = "CURRENCY";
/// Shopper locale, e.g. `en_US`.
pub const LANGUAGE: &str = "LANGUAGE";
/// Order description.
pub const COM: &str = "COM";
/// Extra parameters echoed back in feedback requests.
pub const PARAMPLUS: &str = "PARAMPLUS";
/// Variable part of the feedback URL.
pub const PARAMVAR: &str = "PARAMVAR";
/// Dynamic template page.
pub const TP: &str = "TP";

/// Customer name.
pub const CN: &str = "CN";
/// Customer e-mail address.
pub const EMAIL: &str = "EMAIL";
/// Customer street address.
pub const OWNERADDRESS: &str = "OWNERADDRESS";
/// Customer postal code.
pub const OWNERZIP: &str = "OWNERZIP";
/// Customer town.
pub const OWNERTOWN: &str = "OWNERTOWN";
/// Customer country code.
pub const OWNERCTY: &str = "OWNERCTY";
/// Customer telephone number.
pub const OWNERTELNO: &str = "OWNERTELNO";

/// Card number.
pub const CARDNO: &str = "CARDNO";
/// Card expiry, `MMYY`.
pub const ED: &str = "ED";
/// Card security code.
pub const CVC: &str = "CVC";

/// API user.
pub const USERID: &str = "USERID";
/// API user password.
pub const PSWD: &str = "PSWD";
/// Requested operation (`SAL`, `RES`).
pub const OPERATION: &str = "OPERATION";
/// Request or response signature.
pub const SHASIGN: &str = "SHASIGN";

/// Redirect target after an accepted payment.
pub const ACCEPTURL: &str = "ACCEPTURL";
/// Redirect target after a declined payment.
pub const DECLINEURL: &str = "DECLINEURL";
/// Redirect target when the result is uncertain.
pub const EXCEPTIONURL: &str = "EXCEPTIONURL";
/// Redirect target when the shopper cancels.
pub const CANCELURL: &str = "CANCELURL";
/// Free field echoed back after 3-D Secure.
pub const COMPLUS: &str = "COMPLUS";

/// 3-D Secure flag, `Y` or `N`.
pub const FLAG3D: &str = "FLAG3D";
/// Window the 3-D Secure page opens in.
pub const WIN3DS: &str = "WIN3DS";
/// Shopper browser `Accept` header.
pub const HTTP_ACCEPT: &str = "HTTP_ACCEPT";
/// Shopper browser `User-Agent` header.
pub const HTTP_USER_AGENT: &str = "HTTP_USER_AGENT";

/// Gateway status code.
pub const STATUS: &str = "STATUS";
/// Gateway transaction id.
pub const PAYID: &str = "PAYID";
/// Gateway error code.
pub const NCERROR: &str = "NCERROR";
/// Gateway error explanation.
pub const NCERRORPLUS: &str = "NCERRORPLUS";
/// First digit of the error code.
pub const NCSTATUS: &str = "NCSTATUS";

/// Merchant payment id, carried back through `PARAMPLUS`.
pub const PAYMENT_ID: &str = "PAYMENT_ID";
