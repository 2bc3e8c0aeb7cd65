//! The single place where requests leave the process.
//!
//! Sends one request, logs it (redacted) before sending, and logs the status,
//! body and connection diagnostics after receiving. Logging never changes the
//! outcome.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use erede::RedeError;
use erede::log::Logger;
use erede::redact::{mask_access_token, mask_authorization, redact_card_data};
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response};

/// How a response body is masked before it is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseMask {
    /// Logged as received.
    None,
    /// `access_token` values are masked.
    AccessToken,
}

/// A fully resolved request.
#[derive(Debug)]
pub(crate) struct OutgoingRequest {
    pub context: &'static str,
    pub method: Method,
    pub url: String,
    pub headers: Vec<(HeaderName, String)>,
    pub body: Option<String>,
    pub response_mask: ResponseMask,
}

/// Status and body of a received response.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    timeout: Option<Duration>,
    logger: Arc<dyn Logger>,
}

impl Transport {
    pub(crate) fn new(client: Client, timeout: Option<Duration>, logger: Arc<dyn Logger>) -> Self {
        Self {
            client,
            timeout,
            logger,
        }
    }

    /// Builds the default client: TLS 1.2 or newer with peer verification.
    #[allow(deprecated)]
    pub(crate) fn default_client() -> Result<Client, RedeError> {
        Client::builder()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .build()
            .map_err(|e| RedeError::transport("build HTTP client", false, e))
    }

    pub(crate) async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, RedeError> {
        let OutgoingRequest {
            context,
            method,
            url,
            headers,
            body,
            response_mask,
        } = request;

        self.log_request(&method, &url, &headers, body.as_deref());

        let mut builder = self.client.request(method, &url);
        for (name, value) in headers {
            let value = HeaderValue::from_str(&value).map_err(|e| {
                RedeError::precondition(format!("invalid value for header {name}: {e}"))
            })?;
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RedeError::transport(context, e.is_timeout(), e))?;

        let status = response.status().as_u16();
        let diagnostics = diagnostics(&response);
        let body = response
            .text()
            .await
            .map_err(|e| RedeError::transport(context, e.is_timeout(), e))?;

        let logged_body = match response_mask {
            ResponseMask::None => Cow::Borrowed(body.as_str()),
            ResponseMask::AccessToken => mask_access_token(&body),
        };
        self.logger
            .debug(&format!("Response Rede\nStatus Code: {status}\n\n{logged_body}"));
        for (label, value) in diagnostics {
            self.logger.debug(&format!("{label}: {value}"));
        }

        Ok(RawResponse { status, body })
    }

    fn log_request(
        &self,
        method: &Method,
        url: &str,
        headers: &[(HeaderName, String)],
        body: Option<&str>,
    ) {
        let headers = headers
            .iter()
            .map(|(name, value)| {
                if *name == AUTHORIZATION {
                    format!("{name}: {}", mask_authorization(value))
                } else {
                    format!("{name}: {value}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        let body = body.map(redact_card_data).unwrap_or_default();
        let message = format!("Request Rede\n{method} {url}\n{headers}\n\n{body}");
        self.logger.debug(message.trim());
    }
}

/// Connection metadata dumped after every response, one event per entry.
fn diagnostics(response: &Response) -> Vec<(String, String)> {
    let label = |key: &str| format!("Response[{key}]");
    let mut entries = vec![
        (label("status"), response.status().as_u16().to_string()),
        (label("version"), format!("{:?}", response.version())),
        (label("url"), response.url().to_string()),
    ];
    if let Some(addr) = response.remote_addr() {
        entries.push((label("remote_addr"), addr.to_string()));
    }
    if let Some(length) = response.content_length() {
        entries.push((label("content_length"), length.to_string()));
    }
    for (name, value) in response.headers() {
        entries.push((
            format!("Response[header][{name}]"),
            value.to_str().unwrap_or("<non-ascii>").to_owned(),
        ));
    }
    entries
}
