//! Masking of sensitive values before they reach a logger.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Replacement for redacted card fields.
pub const CARD_MASK: &str = "***";

/// Infix placed between the visible ends of a masked token.
pub const TOKEN_MASK: &str = "*****";

const TOKEN_VISIBLE_CHARS: usize = 4;

static CARD_FIELDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)"(cardnumber|cardholdername|securitycode)"\s*:\s*(?:"(?:[^"\\]|\\.)*"|-?\d+)"#,
    )
    .expect("invalid card field regex")
});

static ACCESS_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"access_token"\s*:\s*"([^"]+)""#)
        .expect("invalid access token regex")
});

/// Replaces the values of `cardNumber`, `cardholderName` and `securityCode`
/// in a JSON text with [`CARD_MASK`].
///
/// Keys match case-insensitively. Anything that is not a JSON body passes
/// through unchanged.
///
/// ```
/// use erede::redact::redact_card_data;
///
/// let body = r#"{"cardNumber":"4111111111111111","amount":10}"#;
/// assert_eq!(redact_card_data(body), r#"{"cardNumber":"***","amount":10}"#);
/// ```
#[must_use]
pub fn redact_card_data(body: &str) -> Cow<'_, str> {
    CARD_FIELDS.replace_all(body, |caps: &Captures<'_>| {
        format!(r#""{}":"{CARD_MASK}""#, &caps[1])
    })
}

/// Masks a secret token, keeping its first and last four characters.
///
/// Tokens too short to keep both ends without revealing most of the secret
/// are masked entirely.
#[must_use]
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 2 * TOKEN_VISIBLE_CHARS {
        return TOKEN_MASK.to_owned();
    }
    let left: String = chars[..TOKEN_VISIBLE_CHARS].iter().collect();
    let right: String = chars[chars.len() - TOKEN_VISIBLE_CHARS..].iter().collect();
    format!("{left}{TOKEN_MASK}{right}")
}

/// Masks every `access_token` value in an OAuth response body.
#[must_use]
pub fn mask_access_token(body: &str) -> Cow<'_, str> {
    ACCESS_TOKEN.replace_all(body, |caps: &Captures<'_>| {
        format!(r#""access_token":"{}""#, mask_token(&caps[1]))
    })
}

/// Masks the credential part of an `Authorization` header value, keeping the
/// scheme: `Basic abc==` becomes `Basic ***`.
#[must_use]
pub fn mask_authorization(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{scheme} {CARD_MASK}"),
        None => CARD_MASK.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_fields_are_masked_in_any_case() {
        let body = r#"{"cardnumber":"4111111111111111","CardHolderName":"John \"J\" Snow","securityCode" : "123","reference":"abc"}"#;
        let redacted = redact_card_data(body);
        assert!(!redacted.contains("4111111111111111"));
        assert!(!redacted.contains("Snow"));
        assert!(!redacted.contains("123"));
        assert!(redacted.contains(r#""reference":"abc""#));
        assert!(redacted.contains(r#""cardnumber":"***""#));
    }

    #[test]
    fn numeric_card_values_are_masked() {
        let redacted = redact_card_data(r#"{"securityCode":123}"#);
        assert_eq!(redacted, r#"{"securityCode":"***"}"#);
    }

    #[test]
    fn bodies_without_card_data_are_borrowed() {
        assert!(matches!(redact_card_data("grant_type=client_credentials"), Cow::Borrowed(_)));
        assert!(matches!(redact_card_data(""), Cow::Borrowed(_)));
    }

    #[test]
    fn token_masking_keeps_both_ends() {
        assert_eq!(mask_token("abcdefghijklmnop"), "abcd*****mnop");
        assert_eq!(mask_token("short"), "*****");
        assert_eq!(mask_token(""), "*****");
    }

    #[test]
    fn access_token_is_masked_in_body() {
        let body = r#"{"access_token": "eyJhbGciOiJIUzI1NiJ9.payload.sig", "expires_in": 1800}"#;
        let masked = mask_access_token(body);
        assert!(masked.contains(r#""access_token":"eyJh*****.sig""#));
        assert!(masked.contains("1800"));
    }

    #[test]
    fn authorization_keeps_scheme_only() {
        assert_eq!(mask_authorization("Basic Zm9vOmJhcg=="), "Basic ***");
        assert_eq!(mask_authorization("Bearer abc"), "Bearer ***");
        assert_eq!(mask_authorization("opaque"), "***");
    }
}
