//! Signable-field lists.
//!
//! The gateway signs a known subset of fields and the subset differs per direction: the
//! SHA-IN list applies to requests sent to the gateway, the SHA-OUT list to feedback the gateway
//! sends back. Both lists are data. A merchant configuration may replace either of them
//! without touching the signing code.
//!
//! An entry ending in `*` matches the prefix followed by one or more digits, which covers the
//! numbered item fields (`ITEMID1`, `ITEMID2`, ...).

use std::{
    collections::HashSet,
    sync::{Arc, LazyLock},
};

use super::Direction;

/// Built-in SHA-IN list.
const SHA_IN_FIELDS: &[&str] = &[
    "ACCEPTANCE", "ACCEPTURL", "ADDMATCH", "ADDRMATCH", "AIACTIONNUMBER", "AIAGIATA",
    "AIAIRNAME", "AIAIRTAX", "AIBOOKIND*", "AICARRIER*", "AICHDET", "AICLASS*", "AICONJTI",
    "AIDEPTCODE", "AIDESTCITY*", "AIDESTCITYL*", "AIEXTRAPASNAME*", "AIEYCD", "AIFLDATE*",
    "AIFLNUM*", "AIGLNUM", "AIINVOICE", "AIIRST", "AIORCITY*", "AIORCITYL*", "AIPASNAME",
    "AIPROJNUM", "AISTOPOV*", "AITIDATE", "AITINUM", "AITINUML*", "AITYPCH", "AIVATAMNT",
    "AIVATAPPL", "ALIAS", "ALIASOPERATION", "ALIASUSAGE", "ALLOWCORRECTION", "AMOUNT",
    "AMOUNT*", "AMOUNTHTVA", "AMOUNTTVA", "BACKURL", "BATCHID", "BGCOLOR", "BLVERNUM", "BIN",
    "BRAND", "BRANDVISUAL", "BUTTONBGCOLOR", "BUTTONTXTCOLOR", "CANCELURL", "CARDNO",
    "CATALOGURL", "CAVV_3D", "CAVVALGORITHM_3D", "CERTID", "CHECK_AAV", "CIVILITY", "CN", "COM",
    "COMPLUS", "CONVCCY", "COSTCENTER", "COSTCODE", "CREDITCODE", "CUID", "CURRENCY", "CVC",
    "CVCFLAG", "DATA", "DATATYPE", "DATEIN", "DATEOUT", "DCC_COMMPERC", "DCC_CONVAMOUNT",
    "DCC_CONVCCY", "DCC_EXCHRATE", "DCC_EXCHRATETS", "DCC_INDICATOR", "DCC_MARGINPERC",
    "DCC_REF", "DCC_SOURCE", "DCC_VALID", "DECLINEURL", "DEVICE", "DISCOUNTRATE", "DISPLAYMODE",
    "ECI", "ECI_3D", "ECOM_BILLTO_POSTAL_CITY", "ECOM_BILLTO_POSTAL_COUNTRYCODE",
    "ECOM_BILLTO_POSTAL_NAME_FIRST", "ECOM_BILLTO_POSTAL_NAME_LAST",
    "ECOM_BILLTO_POSTAL_POSTALCODE", "ECOM_BILLTO_POSTAL_STREET_LINE1",
    "ECOM_BILLTO_POSTAL_STREET_LINE2", "ECOM_BILLTO_POSTAL_STREET_NUMBER", "ECOM_CONSUMERID",
    "ECOM_CONSUMER_GENDER", "ECOM_CONSUMEROGID", "ECOM_CONSUMERORDERID",
    "ECOM_CONSUMERUSERALIAS", "ECOM_CONSUMERUSERPWD", "ECOM_CONSUMERUSERID",
    "ECOM_PAYMENT_CARD_EXPDATE_MONTH", "ECOM_PAYMENT_CARD_EXPDATE_YEAR",
    "ECOM_PAYMENT_CARD_NAME", "ECOM_PAYMENT_CARD_VERIFICATION", "ECOM_SHIPTO_COMPANY",
    "ECOM_SHIPTO_DOB", "ECOM_SHIPTO_ONLINE_EMAIL", "ECOM_SHIPTO_POSTAL_CITY",
    "ECOM_SHIPTO_POSTAL_COUNTRYCODE", "ECOM_SHIPTO_POSTAL_NAME_FIRST",
    "ECOM_SHIPTO_POSTAL_NAME_LAST", "ECOM_SHIPTO_POSTAL_NAME_PREFIX",
    "ECOM_SHIPTO_POSTAL_POSTALCODE", "ECOM_SHIPTO_POSTAL_STREET_LINE1",
    "ECOM_SHIPTO_POSTAL_STREET_LINE2", "ECOM_SHIPTO_POSTAL_STREET_NUMBER",
    "ECOM_SHIPTO_TELECOM_FAX_NUMBER", "ECOM_SHIPTO_TELECOM_PHONE_NUMBER", "ECOM_SHIPTO_TVA",
    "ED", "EMAIL", "EXCEPTIONURL", "EXCLPMLIST", "EXECUTIONDATE*", "FACEXCL*", "FACTOTAL*",
    "FIRSTCALL", "FLAG3D", "FONTTYPE", "FORCECODE1", "FORCECODE2", "FORCECODEHASH",
    "FORCEPROCESS", "FORCETP", "GENERIC_BL", "GIROPAY_ACCOUNT_NUMBER", "GIROPAY_BLZ",
    "GIROPAY_OWNER_NAME", "GLOBORDERID", "GUID", "HDFONTTYPE", "HDTBLBGCOLOR", "HDTBLTXTCOLOR",
    "HEIGHTFRAME", "HOMEURL", "HTTP_ACCEPT", "HTTP_USER_AGENT", "INCLUDE_BIN",
    "INCLUDE_COUNTRIES", "INVDATE", "INVDISCOUNT", "INVLEVEL", "INVORDERID", "ISSUERID",
    "IST_MOBILE", "ITEM_COUNT", "ITEMATTRIBUTES*", "ITEMCATEGORY*", "ITEMCOMMENTS*",
    "ITEMDESC*", "ITEMDISCOUNT*", "ITEMID*", "ITEMNAME*", "ITEMPRICE*", "ITEMQUANT*",
    "ITEMQUANTORIG*", "ITEMUNITOFMEASURE*", "ITEMVAT*", "ITEMVATCODE*", "ITEMWEIGHT*",
    "LANGUAGE", "LEVEL1AUTHCPC", "LIDEXCL*", "LIMITCLIENTSCRIPTUSAGE", "LINE_REF", "LINE_REF1",
    "LINE_REF2", "LINE_REF3", "LINE_REF4", "LINE_REF5", "LINE_REF6", "LIST_BIN",
    "LIST_COUNTRIES", "LOGO", "MANDATEID", "MAXITEMQUANT*", "MERCHANTID", "MODE", "MTIME",
    "MVER", "NETAMOUNT", "OPERATION", "ORDERID", "ORDERSHIPCOST", "ORDERSHIPMETH",
    "ORDERSHIPTAX", "ORDERSHIPTAXCODE", "ORIG", "OR_INVORDERID", "OR_ORDERID", "OWNERADDRESS",
    "OWNERADDRESS2", "OWNERCTY", "OWNERTELNO", "OWNERTELNO2", "OWNERTOWN", "OWNERZIP",
    "PAIDAMOUNT", "PARAMPLUS", "PARAMVAR", "PAYID", "PAYMETHOD", "PM", "PMLIST",
    "PMLISTPMLISTTYPE", "PMLISTTYPE", "PMLISTTYPEPMLIST", "PMTYPE", "POPUP", "POST", "PSPID",
    "PSWD", "REF", "REFER", "REFID", "REFKIND", "REF_CUSTOMERID", "REF_CUSTOMERREF",
    "REGISTRED", "REMOTE_ADDR", "REQGENFIELDS", "RTIMEOUT", "RTIMEOUTREQUESTEDTIMEOUT",
    "SCORINGCLIENT", "SETT_BATCH", "SID", "STATUS_3D", "SUBSCRIPTION_ID", "SUB_AM",
    "SUB_AMOUNT", "SUB_COM", "SUB_COMMENT", "SUB_CUR", "SUB_ENDDATE", "SUB_ORDERID",
    "SUB_PERIOD_MOMENT", "SUB_PERIOD_MOMENT_M", "SUB_PERIOD_MOMENT_WW", "SUB_PERIOD_NUMBER",
    "SUB_PERIOD_NUMBER_D", "SUB_PERIOD_NUMBER_M", "SUB_PERIOD_NUMBER_WW", "SUB_PERIOD_UNIT",
    "SUB_STARTDATE", "SUB_STATUS", "TAAL", "TAXINCLUDED*", "TBLBGCOLOR", "TBLTXTCOLOR", "TID",
    "TITLE", "TOTALAMOUNT", "TP", "TRACK2", "TXTBADDR2", "TXTCOLOR", "TXTOKEN",
    "TXTOKENTXTOKENPAYPAL", "TYPE_COUNTRY", "UCAF_AUTHENTICATION_DATA",
    "UCAF_PAYMENT_CARD_CVC2", "UCAF_PAYMENT_CARD_EXPDATE_MONTH",
    "UCAF_PAYMENT_CARD_EXPDATE_YEAR", "UCAF_PAYMENT_CARD_NUMBER", "USERID", "USERTYPE",
    "VERSION", "WBTU_MSISDN", "WBTU_ORDERID", "WEIGHTUNIT", "WIN3DS", "WITHROOT",
];

/// Built-in SHA-OUT list.
const SHA_OUT_FIELDS: &[&str] = &[
    "AAVADDRESS", "AAVCHECK", "AAVMAIL", "AAVNAME", "AAVPHONE", "AAVZIP", "ACCEPTANCE", "ALIAS",
    "AMOUNT", "BIC", "BIN", "BRAND", "CARDNO", "CCCTY", "CN", "COMPLUS", "CREATION_STATUS",
    "CURRENCY", "CVCCHECK", "DCC_COMMPERCENTAGE", "DCC_CONVAMOUNT", "DCC_CONVCCY",
    "DCC_EXCHRATE", "DCC_EXCHRATESOURCE", "DCC_EXCHRATETS", "DCC_INDICATOR",
    "DCC_MARGINPERCENTAGE", "DCC_VALIDHOURS", "DIGESTCARDNO", "ECI", "ED", "ENCCARDNO",
    "FXAMOUNT", "FXCURRENCY", "IBAN", "IP", "IPCTY", "MANDATEID", "MOBILEMODE",
    "NBREMAILUSAGE", "NBRIPUSAGE", "NBRIPUSAGE_ALLTX", "NBRUSAGE", "NCERROR", "NCERRORCARDNO",
    "NCERRORCN", "NCERRORCVC", "NCERRORED", "ORDERID", "PAYID", "PAYIDSUB", "PM",
    "SCO_CATEGORY", "SCORING", "SEQUENCETYPE", "SIGNDATE", "STATUS", "SUBBRAND",
    "SUBSCRIPTION_ID", "TRXDATE", "VC",
];

static DEFAULT_OUTBOUND: LazyLock<SignableFields> =
    LazyLock::new(|| SignableFields::from_names(SHA_IN_FIELDS.iter().copied()));

static DEFAULT_INBOUND: LazyLock<SignableFields> =
    LazyLock::new(|| SignableFields::from_names(SHA_OUT_FIELDS.iter().copied()));

/// Set of field names covered by a signature.
///
/// Cheap to clone; the underlying sets are shared.
///
/// # Examples
///
/// ```
/// use ingenico_directlink::sha::{Direction, SignableFields};
///
/// let inbound = SignableFields::default_for(Direction::Inbound);
/// assert!(inbound.contains("status"));
/// assert!(!inbound.contains("PARAMPLUS"));
///
/// let outbound = SignableFields::default_for(Direction::Outbound);
/// assert!(outbound.contains("ITEMID3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableFields {
    exact: Arc<HashSet<String>>,
    numbered: Arc<Vec<String>>,
}

impl SignableFields {
    /// Builds a list from field names; entries ending in `*` match numbered fields.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exact = HashSet::new();
        let mut numbered = Vec::new();

        for name in names {
            let name = name.as_ref().trim().to_ascii_uppercase();
            if let Some(prefix) = name.strip_suffix('*') {
                numbered.push(prefix.to_owned());
            } else if !name.is_empty() {
                exact.insert(name);
            }
        }

        Self { exact: Arc::new(exact), numbered: Arc::new(numbered) }
    }

    /// Built-in list for a direction.
    #[must_use]
    pub fn default_for(direction: Direction) -> Self {
        match direction {
            Direction::Outbound => DEFAULT_OUTBOUND.clone(),
            Direction::Inbound => DEFAULT_INBOUND.clone(),
        }
    }

    /// Returns `true` when a field with this name is signed. Case-insensitive.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let name = name.to_ascii_uppercase();
        if self.exact.contains(&name) {
            return true;
        }

        self.numbered.iter().any(|prefix| {
            name.strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_list_covers_order_fields() {
        let fields = SignableFields::default_for(Direction::Outbound);
        for name in ["PSPID", "ORDERID", "AMOUNT", "CURRENCY", "LANGUAGE", "CN", "EMAIL", "CARDNO",
            "ED", "CVC", "USERID", "PSWD", "OPERATION", "ACCEPTURL", "COMPLUS", "WIN3DS", "FLAG3D",
            "HTTP_ACCEPT", "HTTP_USER_AGENT", "PARAMPLUS", "PARAMVAR", "TP", "COM"]
        {
            assert!(fields.contains(name), "{name} should be SHA-IN signable");
        }
        assert!(!fields.contains("SHASIGN"));
    }

    #[test]
    fn test_inbound_list_covers_feedback_fields() {
        let fields = SignableFields::default_for(Direction::Inbound);
        for name in ["ORDERID", "PAYID", "STATUS", "NCERROR", "AMOUNT", "CURRENCY", "PM", "BRAND",
            "ACCEPTANCE", "CARDNO", "ED", "CN", "TRXDATE", "IP"]
        {
            assert!(fields.contains(name), "{name} should be SHA-OUT signable");
        }
        assert!(!fields.contains("PARAMPLUS"));
        assert!(!fields.contains("PAYMENT_ID"));
        assert!(!fields.contains("SHASIGN"));
    }

    #[test]
    fn test_numbered_entries() {
        let fields = SignableFields::from_names(["ITEMID*", "AMOUNT"]);
        assert!(fields.contains("ITEMID1"));
        assert!(fields.contains("itemid42"));
        assert!(!fields.contains("ITEMID"));
        assert!(!fields.contains("ITEMIDX"));
        assert!(fields.contains("amount"));
    }

    #[test]
    fn test_custom_list_normalises_names() {
        let fields = SignableFields::from_names([" orderid ", "Status", ""]);
        assert!(fields.contains("ORDERID"));
        assert!(fields.contains("STATUS"));
        assert!(!fields.contains(""));
    }
}
