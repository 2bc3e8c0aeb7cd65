//! OAuth client-credentials exchange.

use erede::credential::{BasicCredential, BearerToken};
use erede::environment::{Credentials, Environment};
use erede::{RedeError, response};
use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use url::form_urlencoded;

use crate::constants::{
    ACCEPT_JSON, CLIENT_CREDENTIALS_GRANT, FORM_CONTENT_TYPE, OAUTH_TOKEN_PATH,
};
use crate::transport::{OutgoingRequest, ResponseMask, Transport};

const CONTEXT: &str = "POST /oauth2/token";

/// Exchanges a Basic credential for a Bearer token.
///
/// The form body always carries `grant_type=client_credentials`; extra fields
/// follow in the order given. A caller-supplied `grant_type` is ignored.
#[derive(Debug)]
pub(crate) struct AuthenticationService<'a> {
    transport: &'a Transport,
    credential: &'a BasicCredential,
    environment: &'a Environment<Credentials>,
    user_agent: &'a str,
    extra_fields: &'a [(String, String)],
}

impl<'a> AuthenticationService<'a> {
    #[must_use]
    pub(crate) const fn new(
        transport: &'a Transport,
        credential: &'a BasicCredential,
        environment: &'a Environment<Credentials>,
        user_agent: &'a str,
    ) -> Self {
        Self {
            transport,
            credential,
            environment,
            user_agent,
            extra_fields: &[],
        }
    }

    #[must_use]
    pub(crate) const fn with_extra_fields(mut self, fields: &'a [(String, String)]) -> Self {
        self.extra_fields = fields;
        self
    }

    fn form_body(&self) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("grant_type", CLIENT_CREDENTIALS_GRANT);
        for (name, value) in self.extra_fields {
            if name != "grant_type" {
                form.append_pair(name, value);
            }
        }
        form.finish()
    }

    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "erede.oauth.token", skip_all, err)
    )]
    pub(crate) async fn execute(&self) -> Result<BearerToken, RedeError> {
        let request = OutgoingRequest {
            context: CONTEXT,
            method: Method::POST,
            url: self.environment.endpoint(OAUTH_TOKEN_PATH),
            headers: vec![
                (USER_AGENT, self.user_agent.to_owned()),
                (ACCEPT, ACCEPT_JSON.to_owned()),
                (CONTENT_TYPE, FORM_CONTENT_TYPE.to_owned()),
                (AUTHORIZATION, self.credential.authorization_header_value()),
            ],
            body: Some(self.form_body()),
            response_mask: ResponseMask::AccessToken,
        };

        let raw = self.transport.send(request).await?;
        response::parse_token_response(&raw.body, raw.status)
    }
}
