//! OAuth 1.0a request signatures (RFC 5849 section 3.4).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;
use url::Url;
use zeroize::Zeroizing;

use crate::encoding::encode;
use oauthkit_common::{Credentials, Error, Result, Secret};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Signature method advertised in `oauth_signature_method`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureMethod {
    #[default]
    #[serde(rename = "HMAC-SHA1")]
    HmacSha1,
    #[serde(rename = "HMAC-SHA256")]
    HmacSha256,
    #[serde(rename = "PLAINTEXT")]
    Plaintext,
}

impl SignatureMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
            SignatureMethod::HmacSha256 => "HMAC-SHA256",
            SignatureMethod::Plaintext => "PLAINTEXT",
        }
    }
}

impl fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature helper bound to a consumer secret.
///
/// The token secret changes over the lifetime of an OAuth1 flow
/// (none, then request token secret, then access token secret), so it is
/// passed per call instead of being stored here.
#[derive(Clone)]
pub struct Signature {
    consumer_secret: Secret,
    method: SignatureMethod,
}

impl Signature {
    /// Create a signature helper from consumer credentials using HMAC-SHA1.
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            consumer_secret: credentials.consumer_secret().clone(),
            method: SignatureMethod::default(),
        }
    }

    /// Use a different signature method.
    pub fn with_method(mut self, method: SignatureMethod) -> Self {
        self.method = method;
        self
    }

    /// Get the configured signature method.
    pub fn method(&self) -> SignatureMethod {
        self.method
    }

    /// Build the signature base string.
    ///
    /// Query parameters of `uri` participate alongside `params`; any
    /// `oauth_signature` entry is ignored.
    ///
    /// # Errors
    /// - `uri` has no host
    pub fn base_string(http_method: &str, uri: &Url, params: &[(String, String)]) -> Result<String> {
        let mut encoded: Vec<(String, String)> = uri
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .chain(params.iter().cloned())
            .filter(|(k, _)| k != "oauth_signature")
            .map(|(k, v)| (encode(&k), encode(&v)))
            .collect();
        encoded.sort();

        let normalized_params = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!(
            "{}&{}&{}",
            http_method.to_ascii_uppercase(),
            encode(&normalized_uri(uri)?),
            encode(&normalized_params)
        ))
    }

    /// Compute the signature for a request.
    ///
    /// # Errors
    /// - `uri` has no host
    /// - MAC initialization failed
    pub fn sign(
        &self,
        http_method: &str,
        uri: &Url,
        params: &[(String, String)],
        token_secret: Option<&str>,
    ) -> Result<String> {
        let key = Zeroizing::new(format!(
            "{}&{}",
            encode(self.consumer_secret.expose()),
            encode(token_secret.unwrap_or_default())
        ));

        match self.method {
            SignatureMethod::Plaintext => Ok(key.to_string()),
            SignatureMethod::HmacSha1 => {
                let base = Self::base_string(http_method, uri, params)?;
                let mut mac = HmacSha1::new_from_slice(key.as_bytes())
                    .map_err(|e| Error::Signature(format!("Invalid HMAC key: {}", e)))?;
                mac.update(base.as_bytes());
                Ok(BASE64.encode(mac.finalize().into_bytes()))
            }
            SignatureMethod::HmacSha256 => {
                let base = Self::base_string(http_method, uri, params)?;
                let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                    .map_err(|e| Error::Signature(format!("Invalid HMAC key: {}", e)))?;
                mac.update(base.as_bytes());
                Ok(BASE64.encode(mac.finalize().into_bytes()))
            }
        }
    }

    /// Check a received signature against the one computed for the request.
    pub fn verify(
        &self,
        http_method: &str,
        uri: &Url,
        params: &[(String, String)],
        token_secret: Option<&str>,
        signature: &str,
    ) -> Result<bool> {
        let expected = self.sign(http_method, uri, params, token_secret)?;
        Ok(expected.as_bytes().ct_eq(signature.as_bytes()).into())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}, [REDACTED])", self.method)
    }
}

/// Scheme, authority and path of `uri`; default ports, query and fragment dropped.
fn normalized_uri(uri: &Url) -> Result<String> {
    let host = uri
        .host_str()
        .ok_or_else(|| Error::Signature(format!("URI has no host: {}", uri)))?;

    let mut normalized = format!("{}://{}", uri.scheme(), host.to_ascii_lowercase());
    if let Some(port) = uri.port() {
        normalized.push_str(&format!(":{}", port));
    }
    normalized.push_str(uri.path());
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twitter_params() -> Vec<(String, String)> {
        [
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
            ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1318622958"),
            ("oauth_token", "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb"),
            ("oauth_version", "1.0"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn twitter_uri() -> Url {
        Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true").unwrap()
    }

    fn twitter_signature() -> Signature {
        let credentials = Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "oob",
        );
        Signature::new(&credentials)
    }

    #[test]
    fn test_base_string() {
        let base = Signature::base_string("post", &twitter_uri(), &twitter_params()).unwrap();
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn test_hmac_sha1_known_vector() {
        let signature = twitter_signature()
            .sign(
                "POST",
                &twitter_uri(),
                &twitter_params(),
                Some("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"),
            )
            .unwrap();
        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_hmac_sha256_known_vector() {
        let signature = twitter_signature()
            .with_method(SignatureMethod::HmacSha256)
            .sign(
                "POST",
                &twitter_uri(),
                &twitter_params(),
                Some("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"),
            )
            .unwrap();
        assert_eq!(signature, "Tp6gtfOx2bNZeJ2UUOeg9hvSzdsLa5QJoUwc/LeRFRA=");
    }

    #[test]
    fn test_plaintext_is_key() {
        let credentials = Credentials::new("key", "con sumer", "oob");
        let signature = Signature::new(&credentials).with_method(SignatureMethod::Plaintext);
        let uri = Url::parse("https://example.com/").unwrap();

        assert_eq!(signature.sign("GET", &uri, &[], None).unwrap(), "con%20sumer&");
        assert_eq!(
            signature.sign("GET", &uri, &[], Some("tok")).unwrap(),
            "con%20sumer&tok"
        );
    }

    #[test]
    fn test_oauth_signature_param_excluded() {
        let uri = Url::parse("https://example.com/a").unwrap();
        let with = vec![("oauth_signature".to_string(), "zzz".to_string())];
        assert_eq!(
            Signature::base_string("GET", &uri, &with).unwrap(),
            Signature::base_string("GET", &uri, &[]).unwrap()
        );
    }

    #[test]
    fn test_default_port_dropped_custom_port_kept() {
        let default = Url::parse("https://example.com:443/r").unwrap();
        let custom = Url::parse("http://example.com:8080/r").unwrap();

        assert_eq!(normalized_uri(&default).unwrap(), "https://example.com/r");
        assert_eq!(normalized_uri(&custom).unwrap(), "http://example.com:8080/r");
    }

    #[test]
    fn test_verify() {
        let signer = twitter_signature();
        let uri = twitter_uri();
        let params = twitter_params();

        assert!(signer
            .verify("POST", &uri, &params, Some("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"), "hCtSmYh+iHYCEqBWrE7C7hYmtUk=")
            .unwrap());
        assert!(!signer
            .verify("POST", &uri, &params, None, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=")
            .unwrap());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", twitter_signature());
        assert!(!debug.contains("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"));
        assert!(debug.contains("HMAC-SHA1"));
    }

    #[test]
    fn test_method_serialization() {
        let json = serde_json::to_string(&SignatureMethod::Plaintext).unwrap();
        assert_eq!(json, "\"PLAINTEXT\"");
        let method: SignatureMethod = serde_json::from_str("\"HMAC-SHA256\"").unwrap();
        assert_eq!(method, SignatureMethod::HmacSha256);
    }
}
