//! Response parsing and error classification.
//!
//! Turns a raw status code and body into a domain value or a [`RedeError`].
//! Transport failures never reach this module; they are raised before a body
//! exists.

use serde_json::{Map, Value};

use crate::credential::BearerToken;
use crate::error::{GatewayError, RedeError};
use crate::transaction::{MergeError, Transaction, leading_integer};

/// Message used when the gateway gives no usable one.
pub const FALLBACK_MESSAGE: &str = "Error on getting the content from the API";

/// OAuth error type used when the token endpoint gives none.
pub const UNKNOWN_ERROR_TYPE: &str = "unknown_error";

/// First status code treated as a failure.
pub const ERROR_STATUS: u16 = 400;

/// Merges a transaction response into `transaction`.
///
/// The body is merged first regardless of status. Statuses below 400 succeed
/// even when the merge was partial. From 400 upward a [`GatewayError`] is
/// raised carrying `returnMessage` (or [`FALLBACK_MESSAGE`]), `returnCode`
/// coerced to an integer, the merged brand, and the merge failure as cause.
///
/// # Errors
///
/// Returns [`RedeError::Gateway`] when `http_status` is 400 or above.
pub fn parse_into(
    transaction: &mut Transaction,
    body: &str,
    http_status: u16,
) -> Result<(), RedeError> {
    let merged = transaction.merge_json(body);
    if http_status < ERROR_STATUS {
        return Ok(());
    }

    let message = transaction
        .return_message
        .clone()
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned());
    let error = GatewayError::new(http_status, transaction.return_code_number(), message)
        .with_brand(transaction.brand.clone())
        .with_cause(merged.err());
    Err(error.into())
}

/// Like [`parse_into`], starting from `existing` or a fresh transaction.
///
/// # Errors
///
/// Returns [`RedeError::Gateway`] when `http_status` is 400 or above.
pub fn parse_transaction(
    body: &str,
    http_status: u16,
    existing: Option<Transaction>,
) -> Result<Transaction, RedeError> {
    let mut transaction = existing.unwrap_or_default();
    parse_into(&mut transaction, body, http_status)?;
    Ok(transaction)
}

/// Parses an OAuth token-endpoint response.
///
/// Below 400 the body must be a JSON object. From 400 upward `error_code`,
/// `error` and `error_description` are read when present and defaulted
/// otherwise, so an unreadable error body still yields a gateway error.
///
/// # Errors
///
/// Returns [`RedeError::MalformedResponse`] for a successful status with a
/// body that is not a JSON object, and [`RedeError::Gateway`] for 400 and
/// above.
pub fn parse_token_response(body: &str, http_status: u16) -> Result<BearerToken, RedeError> {
    let parsed = json_object(body);

    if http_status >= ERROR_STATUS {
        let (fields, cause) = match parsed {
            Ok(fields) => (fields, None),
            Err(err) => (Map::new(), Some(err)),
        };
        let code = fields.get("error_code").map_or(0, error_code);
        let error_type = fields
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR_TYPE);
        let message = fields
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or(FALLBACK_MESSAGE);
        let error = GatewayError::new(http_status, code, message)
            .with_error_type(error_type)
            .with_cause(cause);
        return Err(error.into());
    }

    let fields = parsed.map_err(|source| RedeError::MalformedResponse {
        context: "POST /oauth2/token",
        source,
    })?;
    Ok(BearerToken::from_token_response(&fields))
}

fn json_object(body: &str) -> Result<Map<String, Value>, MergeError> {
    match serde_json::from_str(body).map_err(MergeError::Syntax)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(MergeError::NotAnObject),
    }
}

fn error_code(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => leading_integer(s),
        _ => 0,
    }
}
