//! Nested objects carried inside a transaction.

use serde::Serialize;
use serde_json::Value;

use super::merge::{MergeError, MergeFields, text, typed};

/// Card-brand sub-result returned by the issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Brand {
    /// Brand name, e.g. `Visa`.
    pub name: Option<String>,
    /// Issuer return code.
    pub return_code: Option<String>,
    /// Issuer return message.
    pub return_message: Option<String>,
    /// Brand-side transaction id.
    pub brand_tid: Option<String>,
    /// Issuer authorization code.
    pub authorization_code: Option<String>,
}

impl MergeFields for Brand {
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError> {
        match key {
            "name" => text(&mut self.name, key, value),
            "returnCode" => text(&mut self.return_code, key, value),
            "returnMessage" => text(&mut self.return_message, key, value),
            "brandTid" => text(&mut self.brand_tid, key, value),
            "authorizationCode" => text(&mut self.authorization_code, key, value),
            _ => Ok(()),
        }
    }
}

/// Billing address sent with card transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Billing {
    /// Street address (max 128 chars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// City (max 64 chars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State (max 64 chars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Country (max 64 chars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Postal code (max 9 chars).
    #[serde(rename = "postalcode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// E-mail address (max 128 chars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    /// Phone number (max 32 chars).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl MergeFields for Billing {
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError> {
        match key {
            "address" => text(&mut self.address, key, value),
            "city" => text(&mut self.city, key, value),
            "state" => text(&mut self.state, key, value),
            "country" => text(&mut self.country, key, value),
            "postalcode" => text(&mut self.postal_code, key, value),
            "emailAddress" => text(&mut self.email_address, key, value),
            "phoneNumber" => text(&mut self.phone_number, key, value),
            _ => Ok(()),
        }
    }
}

/// Pix QR code request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    /// Expiration timestamp of the generated code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_expiration: Option<String>,
}

impl MergeFields for QrCode {
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError> {
        match key {
            "dateTimeExpiration" => text(&mut self.date_time_expiration, key, value),
            _ => Ok(()),
        }
    }
}

/// Pix QR code generated by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrCodeResponse {
    /// Base64 PNG of the code.
    pub qr_code_image: Option<String>,
    /// Copy-and-paste payload.
    pub qr_code_data: Option<String>,
    /// Expiration timestamp.
    pub date_time_expiration: Option<String>,
}

impl MergeFields for QrCodeResponse {
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError> {
        match key {
            "qrCodeImage" => text(&mut self.qr_code_image, key, value),
            "qrCodeData" => text(&mut self.qr_code_data, key, value),
            "dateTimeExpiration" => text(&mut self.date_time_expiration, key, value),
            _ => Ok(()),
        }
    }
}

/// Capture sub-result echoed on queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureDetails {
    /// Capture timestamp.
    pub date_time: Option<String>,
    /// Capture NSU.
    pub nsu: Option<String>,
    /// Captured amount in cents.
    pub amount: Option<u64>,
}

impl MergeFields for CaptureDetails {
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError> {
        match key {
            "dateTime" => text(&mut self.date_time, key, value),
            "nsu" => text(&mut self.nsu, key, value),
            "amount" => typed(&mut self.amount, key, value),
            _ => Ok(()),
        }
    }
}

/// One entry of a transaction's status timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusHistory {
    /// When the status was reached.
    pub date_time: Option<String>,
    /// Status name.
    pub status: Option<String>,
}

impl MergeFields for StatusHistory {
    fn merge_field(&mut self, key: &str, value: Value) -> Result<(), MergeError> {
        match key {
            "dateTime" => text(&mut self.date_time, key, value),
            "status" => text(&mut self.status, key, value),
            _ => Ok(()),
        }
    }
}
