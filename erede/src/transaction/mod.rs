//! Transaction model.
//!
//! A [`Transaction`] is built by the caller with the request fields, serialized
//! as the JSON body of a gateway call, and then has the response merged into it
//! in place. Request fields serialize in camelCase and are omitted when unset;
//! fields the gateway only ever returns are never serialized.

mod merge;
mod parts;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use merge::MergeError;
pub use parts::{Billing, Brand, CaptureDetails, QrCode, QrCodeResponse, StatusHistory};

use merge::{MergeFields, merge_json, nested, nested_list, text, typed};

/// Payment method of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Credit card.
    #[serde(rename = "credit", alias = "Credit", alias = "CREDIT")]
    Credit,
    /// Debit card.
    #[serde(rename = "debit", alias = "Debit", alias = "DEBIT")]
    Debit,
    /// Pix instant payment.
    #[serde(rename = "Pix", alias = "pix", alias = "PIX")]
    Pix,
}

/// One payment attempt or query result.
///
/// All fields are public. The builder methods cover the common request shapes;
/// response fields are filled in by the client.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Whether the authorization is captured immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,
    /// Payment method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    /// Merchant-assigned order reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Amount in cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    /// Number of installments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    /// Name printed on the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    /// Primary account number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    /// Card expiration month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<u32>,
    /// Card expiration year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<u32>,
    /// Card verification code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_code: Option<String>,
    /// Text shown on the cardholder's statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_descriptor: Option<String>,
    /// Marks a recurring charge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<bool>,
    /// Origin of the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<u32>,
    /// Distributor filiation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor_affiliation: Option<u64>,
    /// Card-on-file indicator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_card: Option<u32>,
    /// Pix QR code parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<QrCode>,
    /// Billing address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<Billing>,

    /// Gateway transaction id.
    #[serde(skip)]
    pub tid: Option<String>,
    /// Unique sequential number.
    #[serde(skip)]
    pub nsu: Option<String>,
    /// Issuer authorization code.
    #[serde(skip)]
    pub authorization_code: Option<String>,
    /// Transaction timestamp.
    #[serde(skip)]
    pub date_time: Option<String>,
    /// Request timestamp.
    #[serde(skip)]
    pub request_date_time: Option<String>,
    /// Gateway return code, as sent.
    #[serde(skip)]
    pub return_code: Option<String>,
    /// Gateway return message.
    #[serde(skip)]
    pub return_message: Option<String>,
    /// Refund id.
    #[serde(skip)]
    pub refund_id: Option<String>,
    /// Refund timestamp.
    #[serde(skip)]
    pub refund_date_time: Option<String>,
    /// Cancellation id.
    #[serde(skip)]
    pub cancel_id: Option<String>,
    /// Transaction status.
    #[serde(skip)]
    pub status: Option<String>,
    /// Card-brand sub-result.
    #[serde(skip)]
    pub brand: Option<Brand>,
    /// Authorization sub-result echoed on queries.
    #[serde(skip)]
    pub authorization: Option<Box<Self>>,
    /// Capture sub-result echoed on queries.
    #[serde(skip)]
    pub capture_details: Option<CaptureDetails>,
    /// Refunds issued against this transaction, in gateway order.
    #[serde(skip)]
    pub refunds: Vec<Self>,
    /// Status timeline.
    #[serde(skip)]
    pub status_history: Vec<StatusHistory>,
    /// Generated Pix QR code.
    #[serde(skip)]
    pub qr_code_response: Option<QrCodeResponse>,
}

impl Transaction {
    /// Creates a transaction with an amount in cents and an order reference.
    #[must_use]
    pub fn new(amount: u64, reference: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            reference: Some(reference.into()),
            ..Self::default()
        }
    }

    /// Fills in credit card data.
    #[must_use]
    pub fn credit_card(
        self,
        card_number: impl Into<String>,
        security_code: impl Into<String>,
        expiration_month: u32,
        expiration_year: u32,
        cardholder_name: impl Into<String>,
    ) -> Self {
        self.with_card(
            TransactionKind::Credit,
            card_number.into(),
            security_code.into(),
            (expiration_month, expiration_year),
            cardholder_name.into(),
        )
    }

    /// Fills in debit card data. Debit transactions are always captured.
    #[must_use]
    pub fn debit_card(
        self,
        card_number: impl Into<String>,
        security_code: impl Into<String>,
        expiration_month: u32,
        expiration_year: u32,
        cardholder_name: impl Into<String>,
    ) -> Self {
        self.with_card(
            TransactionKind::Debit,
            card_number.into(),
            security_code.into(),
            (expiration_month, expiration_year),
            cardholder_name.into(),
        )
        .with_capture(true)
    }

    fn with_card(
        mut self,
        kind: TransactionKind,
        card_number: String,
        security_code: String,
        (month, year): (u32, u32),
        cardholder_name: String,
    ) -> Self {
        self.kind = Some(kind);
        self.card_number = Some(card_number);
        self.security_code = Some(security_code);
        self.expiration_month = Some(month);
        self.expiration_year = Some(year);
        self.cardholder_name = Some(cardholder_name);
        self
    }

    /// Marks the transaction as a Pix payment whose QR code expires at
    /// `date_time_expiration`.
    #[must_use]
    pub fn pix(mut self, date_time_expiration: impl Into<String>) -> Self {
        self.kind = Some(TransactionKind::Pix);
        self.qr_code = Some(QrCode {
            date_time_expiration: Some(date_time_expiration.into()),
        });
        self
    }

    /// Sets the capture flag.
    #[must_use]
    pub const fn with_capture(mut self, capture: bool) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Sets the number of installments.
    #[must_use]
    pub const fn with_installments(mut self, installments: u32) -> Self {
        self.installments = Some(installments);
        self
    }

    /// Sets the statement descriptor.
    #[must_use]
    pub fn with_soft_descriptor(mut self, soft_descriptor: impl Into<String>) -> Self {
        self.soft_descriptor = Some(soft_descriptor.into());
        self
    }

    /// Sets the billing address.
    #[must_use]
    pub fn with_billing(mut self, billing: Billing) -> Self {
        self.billing = Some(billing);
        self
    }

    /// Sets the gateway transaction id, e.g. to capture an earlier
    /// authorization.
    #[must_use]
    pub fn with_tid(mut self, tid: impl Into<String>) -> Self {
        self.tid = Some(tid.into());
        self
    }

    /// Sets the refund id.
    #[must_use]
    pub fn with_refund_id(mut self, refund_id: impl Into<String>) -> Self {
        self.refund_id = Some(refund_id.into());
        self
    }

    /// Sets the subscription flag.
    #[must_use]
    pub const fn with_subscription(mut self, subscription: bool) -> Self {
        self.subscription = Some(subscription);
        self
    }

    /// Sets the distributor filiation.
    #[must_use]
    pub const fn with_distributor_affiliation(mut self, affiliation: u64) -> Self {
        self.distributor_affiliation = Some(affiliation);
        self
    }

    /// Returns the transaction id if it is set and non-empty.
    #[must_use]
    pub fn tid(&self) -> Option<&str> {
        self.tid.as_deref().filter(|tid| !tid.is_empty())
    }

    /// Returns `return_code` as an integer.
    ///
    /// Uses the leading decimal digits (with optional sign) and yields 0 when
    /// there are none: `"05"` is 5, `"abc"` is 0.
    #[must_use]
    pub fn return_code_number(&self) -> i64 {
        self.return_code.as_deref().map_or(0, leading_integer)
    }

    /// Merges a JSON response body into this transaction.
    ///
    /// Recognized fields overwrite the current values and unknown fields are
    /// ignored. When some field cannot be read the others are still applied
    /// and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError`] if the body is not a JSON object or a recognized
    /// field has the wrong shape.
    pub fn merge_json(&mut self, body: &str) -> Result<(), MergeError> {
        merge_json(self, body)
    }
}

impl MergeFields for Transaction {
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError> {
        match key {
            "capture" => match value {
                Value::Object(_) => nested(&mut self.capture_details, key, value),
                other => typed(&mut self.capture, key, other),
            },
            "kind" => typed(&mut self.kind, key, value),
            "reference" => text(&mut self.reference, key, value),
            "amount" => typed(&mut self.amount, key, value),
            "installments" => typed(&mut self.installments, key, value),
            "cardholderName" | "cardHolderName" => text(&mut self.cardholder_name, key, value),
            "cardNumber" => text(&mut self.card_number, key, value),
            "expirationMonth" => typed(&mut self.expiration_month, key, value),
            "expirationYear" => typed(&mut self.expiration_year, key, value),
            "securityCode" => text(&mut self.security_code, key, value),
            "softDescriptor" => text(&mut self.soft_descriptor, key, value),
            "subscription" => typed(&mut self.subscription, key, value),
            "origin" => typed(&mut self.origin, key, value),
            "distributorAffiliation" => typed(&mut self.distributor_affiliation, key, value),
            "storageCard" => typed(&mut self.storage_card, key, value),
            "qrCode" => nested(&mut self.qr_code, key, value),
            "billing" => nested(&mut self.billing, key, value),
            "tid" => text(&mut self.tid, key, value),
            "nsu" => text(&mut self.nsu, key, value),
            "authorizationCode" => text(&mut self.authorization_code, key, value),
            "dateTime" => text(&mut self.date_time, key, value),
            "requestDateTime" => text(&mut self.request_date_time, key, value),
            "returnCode" => text(&mut self.return_code, key, value),
            "returnMessage" => text(&mut self.return_message, key, value),
            "refundId" => text(&mut self.refund_id, key, value),
            "refundDateTime" => text(&mut self.refund_date_time, key, value),
            "cancelId" => text(&mut self.cancel_id, key, value),
            "status" => text(&mut self.status, key, value),
            "brand" => nested(&mut self.brand, key, value),
            "authorization" => nested(&mut self.authorization, key, value),
            "refunds" => nested_list(&mut self.refunds, key, value),
            "statusHistory" => nested_list(&mut self.status_history, key, value),
            "qrCodeResponse" => nested(&mut self.qr_code_response, key, value),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hidden = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("Transaction")
            .field("tid", &self.tid)
            .field("reference", &self.reference)
            .field("kind", &self.kind)
            .field("amount", &self.amount)
            .field("capture", &self.capture)
            .field("installments", &self.installments)
            .field("card_number", &hidden(&self.card_number))
            .field("cardholder_name", &hidden(&self.cardholder_name))
            .field("security_code", &hidden(&self.security_code))
            .field("return_code", &self.return_code)
            .field("return_message", &self.return_message)
            .field("status", &self.status)
            .field("refund_id", &self.refund_id)
            .field("brand", &self.brand)
            .field("refunds", &self.refunds.len())
            .finish_non_exhaustive()
    }
}

/// Parses the leading integer of `s` the way loosely typed gateways coerce
/// codes: optional whitespace, optional sign, then digits. Anything else is 0.
pub(crate) fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end]
        .bytes()
        .fold(0_i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_merges_into_fresh_transaction() {
        let mut tx = Transaction::default();
        tx.merge_json(r#"{"tid":"123","amount":1000}"#).unwrap();
        assert_eq!(tx.tid(), Some("123"));
        assert_eq!(tx.amount, Some(1000));
    }

    #[test]
    fn merge_keeps_request_fields() {
        let mut tx = Transaction::new(2099, "order-1").credit_card(
            "4111111111111111",
            "123",
            12,
            2030,
            "John Snow",
        );
        tx.merge_json(
            r#"{
                "tid": "100",
                "returnCode": "00",
                "returnMessage": "Success.",
                "brand": {"name": "Visa", "returnCode": "00", "brandTid": "b-1"},
                "unexpected": {"nested": true}
            }"#,
        )
        .unwrap();

        assert_eq!(tx.reference.as_deref(), Some("order-1"));
        assert_eq!(tx.card_number.as_deref(), Some("4111111111111111"));
        assert_eq!(tx.return_message.as_deref(), Some("Success."));
        let brand = tx.brand.as_ref().unwrap();
        assert_eq!(brand.name.as_deref(), Some("Visa"));
        assert_eq!(brand.brand_tid.as_deref(), Some("b-1"));
    }

    #[test]
    fn capture_accepts_flag_or_object() {
        let mut tx = Transaction::default();
        tx.merge_json(r#"{"capture": true}"#).unwrap();
        assert_eq!(tx.capture, Some(true));
        assert!(tx.capture_details.is_none());

        tx.merge_json(
            r#"{"capture": {"dateTime": "2024-01-01T10:00:00", "nsu": "9", "amount": 500}}"#,
        )
        .unwrap();
        assert_eq!(tx.capture, Some(true));
        let details = tx.capture_details.as_ref().unwrap();
        assert_eq!(details.amount, Some(500));
        assert_eq!(details.nsu.as_deref(), Some("9"));
    }

    #[test]
    fn nested_transactions_and_lists() {
        let mut tx = Transaction::default();
        tx.merge_json(
            r#"{
                "authorization": {"tid": "1", "status": "Approved", "amount": 100},
                "refunds": [
                    {"refundId": "r1", "amount": 40, "status": "Done"},
                    {"refundId": "r2", "amount": 60, "status": "Processing"}
                ],
                "statusHistory": [{"status": "Approved", "dateTime": "t0"}],
                "qrCodeResponse": {"qrCodeData": "000201", "qrCodeImage": "iVBOR"}
            }"#,
        )
        .unwrap();

        let authorization = tx.authorization.as_ref().unwrap();
        assert_eq!(authorization.tid(), Some("1"));
        assert_eq!(authorization.status.as_deref(), Some("Approved"));
        let refund_ids: Vec<_> = tx.refunds.iter().map(|r| r.refund_id.as_deref()).collect();
        assert_eq!(refund_ids, [Some("r1"), Some("r2")]);
        assert_eq!(tx.status_history.len(), 1);
        assert_eq!(
            tx.qr_code_response.as_ref().unwrap().qr_code_data.as_deref(),
            Some("000201")
        );
    }

    #[test]
    fn numeric_return_code_is_kept_as_text() {
        let mut tx = Transaction::default();
        tx.merge_json(r#"{"returnCode": 5}"#).unwrap();
        assert_eq!(tx.return_code.as_deref(), Some("5"));
        assert_eq!(tx.return_code_number(), 5);
    }

    #[test]
    fn leading_integer_coercion() {
        assert_eq!(leading_integer("05"), 5);
        assert_eq!(leading_integer("abc"), 0);
        assert_eq!(leading_integer(""), 0);
        assert_eq!(leading_integer("  42 apples"), 42);
        assert_eq!(leading_integer("-7"), -7);
        assert_eq!(leading_integer("+"), 0);
        assert_eq!(Transaction::default().return_code_number(), 0);
    }

    #[test]
    fn serializes_only_request_fields() {
        let tx = Transaction::new(1000, "ref-9")
            .credit_card("5448280000000007", "235", 1, 2028, "Fulano")
            .with_capture(false)
            .with_installments(2)
            .with_tid("should-not-be-sent");
        let body = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            body,
            json!({
                "capture": false,
                "kind": "credit",
                "reference": "ref-9",
                "amount": 1000,
                "installments": 2,
                "cardholderName": "Fulano",
                "cardNumber": "5448280000000007",
                "expirationMonth": 1,
                "expirationYear": 2028,
                "securityCode": "235"
            })
        );
    }

    #[test]
    fn pix_and_billing_serialize_nested() {
        let tx = Transaction::new(500, "pix-1")
            .pix("2030-01-01T00:00:00")
            .with_billing(Billing {
                postal_code: Some("01000000".into()),
                email_address: Some("a@b.test".into()),
                ..Billing::default()
            });
        let body = serde_json::to_value(&tx).unwrap();
        assert_eq!(body["kind"], "Pix");
        assert_eq!(body["qrCode"]["dateTimeExpiration"], "2030-01-01T00:00:00");
        assert_eq!(body["billing"]["postalcode"], "01000000");
        assert_eq!(body["billing"]["emailAddress"], "a@b.test");
        assert!(body["billing"].get("city").is_none());
    }

    #[test]
    fn debit_card_forces_capture() {
        let tx = Transaction::new(100, "d").debit_card("1", "2", 3, 2031, "x");
        assert_eq!(tx.kind, Some(TransactionKind::Debit));
        assert_eq!(tx.capture, Some(true));
    }

    #[test]
    fn kind_accepts_case_variants() {
        let mut tx = Transaction::default();
        tx.merge_json(r#"{"kind":"pix"}"#).unwrap();
        assert_eq!(tx.kind, Some(TransactionKind::Pix));
        assert!(tx.merge_json(r#"{"kind":"boleto"}"#).is_err());
    }

    #[test]
    fn empty_tid_counts_as_missing() {
        assert_eq!(Transaction::default().with_tid("").tid(), None);
    }

    #[test]
    fn debug_hides_card_data() {
        let tx = Transaction::new(1, "r").credit_card("4111111111111111", "999", 1, 2030, "Holder");
        let output = format!("{tx:?}");
        assert!(!output.contains("4111111111111111"));
        assert!(!output.contains("999"));
        assert!(!output.contains("Holder"));
    }
}
