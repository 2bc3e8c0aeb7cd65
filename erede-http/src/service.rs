//! Transaction operations and the shared request pipeline.
//!
//! Each [`Operation`] supplies an HTTP method, a service path and whether the
//! transaction is sent as the body. [`TransactionService`] does the rest:
//! header selection, sending, and merging the response into the transaction.

use erede::response;
use erede::{RedeError, Store, Transaction};
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderName, USER_AGENT};
use url::form_urlencoded;

use crate::constants::{
    ACCEPT_JSON, BRAND_RETURN_OPENED, JSON_CONTENT_TYPE, REFUNDS_SEGMENT,
    TRANSACTION_RESPONSE_HEADER, TRANSACTIONS_PATH,
};
use crate::transport::{OutgoingRequest, ResponseMask, Transport};

/// A transaction operation with its identifiers resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operation {
    Create,
    Capture { tid: String },
    Cancel { tid: String },
    Get { tid: String },
    GetByReference { reference: String },
    GetRefunds { tid: String },
    GetRefund { tid: String, refund_id: String },
}

impl Operation {
    /// Capture of `transaction`, which must carry a tid.
    pub(crate) fn capture(transaction: &Transaction) -> Result<Self, RedeError> {
        Ok(Self::Capture {
            tid: required_tid(transaction.tid.as_deref(), "capture")?,
        })
    }

    /// Cancellation of `transaction`, which must carry a tid.
    pub(crate) fn cancel(transaction: &Transaction) -> Result<Self, RedeError> {
        Ok(Self::Cancel {
            tid: required_tid(transaction.tid.as_deref(), "cancel")?,
        })
    }

    pub(crate) fn get(tid: &str) -> Result<Self, RedeError> {
        Ok(Self::Get {
            tid: required_tid(Some(tid), "get")?,
        })
    }

    pub(crate) fn get_by_reference(reference: &str) -> Result<Self, RedeError> {
        if reference.is_empty() {
            return Err(RedeError::precondition(
                "get by reference requires a non-empty reference",
            ));
        }
        Ok(Self::GetByReference {
            reference: reference.to_owned(),
        })
    }

    pub(crate) fn get_refunds(tid: &str) -> Result<Self, RedeError> {
        Ok(Self::GetRefunds {
            tid: required_tid(Some(tid), "get refunds")?,
        })
    }

    pub(crate) fn get_refund(tid: &str, refund_id: &str) -> Result<Self, RedeError> {
        let tid = required_tid(Some(tid), "get refund")?;
        let refund_id = path_segment(refund_id, "refund id", "get refund")?;
        Ok(Self::GetRefund { tid, refund_id })
    }

    pub(crate) fn method(&self) -> Method {
        match self {
            Self::Create | Self::Cancel { .. } => Method::POST,
            Self::Capture { .. } => Method::PUT,
            Self::Get { .. }
            | Self::GetByReference { .. }
            | Self::GetRefunds { .. }
            | Self::GetRefund { .. } => Method::GET,
        }
    }

    pub(crate) fn path(&self) -> String {
        match self {
            Self::Create => TRANSACTIONS_PATH.to_owned(),
            Self::Capture { tid } | Self::Get { tid } => format!("{TRANSACTIONS_PATH}/{tid}"),
            Self::Cancel { tid } | Self::GetRefunds { tid } => {
                format!("{TRANSACTIONS_PATH}/{tid}/{REFUNDS_SEGMENT}")
            }
            Self::GetRefund { tid, refund_id } => {
                format!("{TRANSACTIONS_PATH}/{tid}/{REFUNDS_SEGMENT}/{refund_id}")
            }
            Self::GetByReference { reference } => {
                let query: String = form_urlencoded::Serializer::new(String::new())
                    .append_pair("reference", reference)
                    .finish();
                format!("{TRANSACTIONS_PATH}?{query}")
            }
        }
    }

    /// Whether the transaction is serialized as the request body.
    pub(crate) const fn sends_body(&self) -> bool {
        matches!(self, Self::Create | Self::Capture { .. } | Self::Cancel { .. })
    }

    /// Label used in transport errors and spans.
    pub(crate) const fn context(&self) -> &'static str {
        match self {
            Self::Create => "POST /transactions",
            Self::Capture { .. } => "PUT /transactions/{tid}",
            Self::Cancel { .. } => "POST /transactions/{tid}/refunds",
            Self::Get { .. } => "GET /transactions/{tid}",
            Self::GetByReference { .. } => "GET /transactions?reference",
            Self::GetRefunds { .. } => "GET /transactions/{tid}/refunds",
            Self::GetRefund { .. } => "GET /transactions/{tid}/refunds/{refund_id}",
        }
    }
}

fn required_tid(tid: Option<&str>, operation: &str) -> Result<String, RedeError> {
    match tid {
        Some(tid) if !tid.is_empty() => path_segment(tid, "tid", operation),
        _ => Err(RedeError::precondition(format!(
            "{operation} requires a transaction id (tid)"
        ))),
    }
}

fn path_segment(value: &str, name: &str, operation: &str) -> Result<String, RedeError> {
    if value.is_empty() {
        return Err(RedeError::precondition(format!(
            "{operation} requires a non-empty {name}"
        )));
    }
    if value.contains(['/', '?', '#']) {
        return Err(RedeError::precondition(format!(
            "{name} '{value}' is not a single path segment"
        )));
    }
    Ok(value.to_owned())
}

/// Runs one [`Operation`] against the payments API.
#[derive(Debug)]
pub(crate) struct TransactionService<'a> {
    transport: &'a Transport,
    store: &'a Store,
    user_agent: &'a str,
}

impl<'a> TransactionService<'a> {
    #[must_use]
    pub(crate) const fn new(
        transport: &'a Transport,
        store: &'a Store,
        user_agent: &'a str,
    ) -> Self {
        Self {
            transport,
            store,
            user_agent,
        }
    }

    /// Sends the operation and merges the response into `transaction`.
    ///
    /// The `Authorization` header is `Bearer <token>` when the store has a
    /// cached token and Basic with the filiation and token otherwise.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(
            name = "erede.transaction.execute",
            skip_all,
            fields(operation = operation.context()),
            err
        )
    )]
    pub(crate) async fn execute(
        &self,
        operation: &Operation,
        transaction: &mut Transaction,
    ) -> Result<(), RedeError> {
        let mut headers: Vec<(HeaderName, String)> = vec![
            (USER_AGENT, self.user_agent.to_owned()),
            (ACCEPT, ACCEPT_JSON.to_owned()),
            (
                HeaderName::from_static(TRANSACTION_RESPONSE_HEADER),
                BRAND_RETURN_OPENED.to_owned(),
            ),
            (AUTHORIZATION, self.store.authorization_header_value()),
        ];

        let body = if operation.sends_body() {
            let body = serde_json::to_string(transaction).map_err(|e| {
                RedeError::precondition(format!("transaction could not be serialized: {e}"))
            })?;
            headers.push((CONTENT_TYPE, JSON_CONTENT_TYPE.to_owned()));
            Some(body)
        } else {
            headers.push((CONTENT_LENGTH, "0".to_owned()));
            None
        };

        let request = OutgoingRequest {
            context: operation.context(),
            method: operation.method(),
            url: self.store.environment().endpoint(&operation.path()),
            headers,
            body,
            response_mask: ResponseMask::None,
        };

        let raw = self.transport.send(request).await?;
        response::parse_into(transaction, &raw.body, raw.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erede::ErrorKind;

    #[test]
    fn paths_and_methods() {
        let cases = [
            (Operation::Create, Method::POST, "transactions", true),
            (
                Operation::get("10").unwrap(),
                Method::GET,
                "transactions/10",
                false,
            ),
            (
                Operation::get_refunds("10").unwrap(),
                Method::GET,
                "transactions/10/refunds",
                false,
            ),
            (
                Operation::get_refund("10", "r-1").unwrap(),
                Method::GET,
                "transactions/10/refunds/r-1",
                false,
            ),
            (
                Operation::capture(&Transaction::default().with_tid("10")).unwrap(),
                Method::PUT,
                "transactions/10",
                true,
            ),
            (
                Operation::cancel(&Transaction::default().with_tid("10")).unwrap(),
                Method::POST,
                "transactions/10/refunds",
                true,
            ),
        ];
        for (operation, method, path, sends_body) in cases {
            assert_eq!(operation.method(), method);
            assert_eq!(operation.path(), path);
            assert_eq!(operation.sends_body(), sends_body);
        }
    }

    #[test]
    fn reference_is_form_encoded() {
        let operation = Operation::get_by_reference("order 1&x=2").unwrap();
        assert_eq!(operation.path(), "transactions?reference=order+1%26x%3D2");
        assert!(!operation.sends_body());
    }

    #[test]
    fn missing_identifiers_are_preconditions() {
        let errors = [
            Operation::capture(&Transaction::default()).unwrap_err(),
            Operation::cancel(&Transaction::default().with_tid("")).unwrap_err(),
            Operation::get("").unwrap_err(),
            Operation::get_refunds("").unwrap_err(),
            Operation::get_refund("1", "").unwrap_err(),
            Operation::get_by_reference("").unwrap_err(),
            Operation::get("a/b").unwrap_err(),
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::Precondition);
        }
    }
}
