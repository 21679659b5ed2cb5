//! OAuth1 token response parsing.

use std::collections::BTreeMap;
use url::form_urlencoded;

use oauthkit_common::{Error, Result};
use oauthkit_storage::{Expiry, Token};

fn parse_fields(body: &str) -> BTreeMap<String, String> {
    form_urlencoded::parse(body.trim().as_bytes())
        .into_owned()
        .collect()
}

fn take(fields: &mut BTreeMap<String, String>, key: &str) -> Result<String> {
    fields
        .remove(key)
        .ok_or_else(|| Error::TokenResponse(format!("Response contains no {}", key)))
}

/// Parse a temporary-credentials response.
///
/// # Errors
/// - `oauth_callback_confirmed` is not `true`
/// - token or secret missing
pub fn parse_request_token_response(body: &str) -> Result<Token> {
    let mut fields = parse_fields(body);

    if fields.remove("oauth_callback_confirmed").as_deref() != Some("true") {
        return Err(Error::TokenResponse(
            "Callback was not confirmed by the provider".to_string(),
        ));
    }

    let token = take(&mut fields, "oauth_token")?;
    let secret = take(&mut fields, "oauth_token_secret")?;

    Ok(Token {
        access_token: token.clone(),
        request_token: Some(token),
        request_token_secret: Some(secret.clone()),
        access_token_secret: Some(secret),
        expiry: Expiry::Never,
        extra_params: fields,
        ..Token::default()
    })
}

/// Parse a token-credentials response.
pub fn parse_access_token_response(body: &str) -> Result<Token> {
    let mut fields = parse_fields(body);

    if let Some(problem) = fields.remove("oauth_problem") {
        return Err(Error::TokenResponse(problem));
    }

    let token = take(&mut fields, "oauth_token")?;
    let secret = take(&mut fields, "oauth_token_secret")?;

    Ok(Token {
        access_token: token,
        access_token_secret: Some(secret),
        expiry: Expiry::Never,
        extra_params: fields,
        ..Token::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_token_response() {
        let token = parse_request_token_response(
            "oauth_token=Z6eEdO8MOmk394WozF5oKyuAv855l4Mlqo7hhlSLik&oauth_token_secret=Kd75W4OQfb2oJTV0vzGzeXftVAwgMnEK9MumzYcM&oauth_callback_confirmed=true",
        )
        .unwrap();

        assert_eq!(token.request_token.as_deref(), Some("Z6eEdO8MOmk394WozF5oKyuAv855l4Mlqo7hhlSLik"));
        assert_eq!(token.request_token_secret.as_deref(), Some("Kd75W4OQfb2oJTV0vzGzeXftVAwgMnEK9MumzYcM"));
        assert!(token.extra_params.is_empty());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_unconfirmed_callback_rejected() {
        let result = parse_request_token_response("oauth_token=a&oauth_token_secret=b");
        assert!(matches!(result, Err(Error::TokenResponse(_))));
    }

    #[test]
    fn test_access_token_response_keeps_extras() {
        let token = parse_access_token_response(
            "oauth_token=at&oauth_token_secret=ats&user_id=6253282&screen_name=twitterapi",
        )
        .unwrap();

        assert_eq!(token.access_token, "at");
        assert_eq!(token.access_token_secret.as_deref(), Some("ats"));
        assert_eq!(token.extra_params.get("screen_name").map(String::as_str), Some("twitterapi"));
        assert_eq!(token.expiry, Expiry::Never);
    }

    #[test]
    fn test_access_token_problem() {
        let result = parse_access_token_response("oauth_problem=token_rejected");
        match result {
            Err(Error::TokenResponse(problem)) => assert_eq!(problem, "token_rejected"),
            other => panic!("expected token response error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_secret() {
        assert!(matches!(
            parse_access_token_response("oauth_token=at"),
            Err(Error::TokenResponse(_))
        ));
    }
}
