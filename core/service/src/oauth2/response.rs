//! OAuth2 token response parsing.

use chrono::Duration;
use serde_json::Value;
use std::collections::BTreeMap;
use url::form_urlencoded;

use oauthkit_common::{Error, Result};
use oauthkit_storage::{Expiry, Token};

/// Parse a token endpoint response.
///
/// JSON objects are preferred; anything else is read as a form-encoded
/// body, which some providers still return.
///
/// # Errors
/// - The response carries an `error` field
/// - No `access_token` is present
/// - `expires_in` is not a number of seconds, or is out of range
pub fn parse_token_response(body: &str) -> Result<Token> {
    let mut fields: BTreeMap<String, String> = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(k, v)| (k, value_to_string(v)))
            .collect(),
        _ => form_urlencoded::parse(body.trim().as_bytes())
            .into_owned()
            .collect(),
    };

    if let Some(error) = fields.remove("error") {
        let message = match fields.remove("error_description") {
            Some(description) => format!("{}: {}", error, description),
            None => error,
        };
        return Err(Error::TokenResponse(message));
    }

    let access_token = fields
        .remove("access_token")
        .ok_or_else(|| Error::TokenResponse("Response contains no access_token".to_string()))?;

    let lifetime = fields
        .remove("expires_in")
        .or_else(|| fields.remove("expires"));
    let expiry = match lifetime {
        Some(seconds) => {
            let seconds: i64 = seconds
                .parse()
                .map_err(|_| Error::TokenResponse(format!("Invalid expires_in: {}", seconds)))?;
            Duration::try_seconds(seconds)
                .and_then(Expiry::after)
                .ok_or_else(|| {
                    Error::TokenResponse(format!("expires_in out of range: {}", seconds))
                })?
        }
        None => Expiry::Unknown,
    };

    Ok(Token {
        access_token,
        refresh_token: fields.remove("refresh_token"),
        expiry,
        extra_params: fields,
        ..Token::default()
    })
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
