//! Service descriptors: the capability declarations the resolver checks
//! before constructing a service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::oauth1::OAuth1Service;
use crate::oauth2::OAuth2Service;
use oauthkit_common::{Credentials, Result};
use oauthkit_crypto::{Signature, SignatureMethod};
use oauthkit_http::HttpClient;
use oauthkit_storage::TokenStorage;

/// Named scope constants declared by an OAuth2 implementation.
///
/// Keys follow the `SCOPE_<NAME>` convention, values are the identifiers
/// the provider expects (e.g. `SCOPE_USER_EMAIL` → `user:email`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeTable(BTreeMap<String, String>);

impl ScopeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from constant name / value pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }

    /// Look up a constant by its full name (e.g. `SCOPE_EMAIL`).
    pub fn get(&self, constant: &str) -> Option<&str> {
        self.0.get(constant).map(String::as_str)
    }

    /// Check whether `value` is one of the declared scope values.
    pub fn contains_value(&self, value: &str) -> bool {
        self.0.values().any(|v| v == value)
    }

    /// Number of declared constants.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no constants are declared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over constant name / value pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Everything an OAuth2 service is constructed from.
#[derive(Clone)]
pub struct OAuth2Context {
    pub credentials: Arc<Credentials>,
    pub http_client: Arc<dyn HttpClient>,
    pub storage: Arc<dyn TokenStorage>,
    /// Scopes already resolved against the implementation's [`ScopeTable`].
    pub scopes: Vec<String>,
}

/// Everything an OAuth1 service is constructed from.
#[derive(Clone)]
pub struct OAuth1Context {
    pub credentials: Arc<Credentials>,
    pub http_client: Arc<dyn HttpClient>,
    pub storage: Arc<dyn TokenStorage>,
    pub signature: Signature,
}

/// A registrable service implementation.
///
/// An implementation advertises the capability sets it satisfies by
/// returning `Some` from [`as_oauth2`](Self::as_oauth2) and/or
/// [`as_oauth1`](Self::as_oauth1). Returning `None` from both makes the
/// implementation unusable: the resolver refuses to register it.
pub trait ServiceDescriptor: Send + Sync {
    /// Human-readable name used in logs and errors.
    fn type_name(&self) -> &str;

    /// OAuth2 capability set, if implemented.
    fn as_oauth2(&self) -> Option<&dyn OAuth2Descriptor> {
        None
    }

    /// OAuth1 capability set, if implemented.
    fn as_oauth1(&self) -> Option<&dyn OAuth1Descriptor> {
        None
    }
}

/// OAuth2 capability set.
pub trait OAuth2Descriptor: Send + Sync {
    /// Scope constants the implementation declares.
    fn scopes(&self) -> &ScopeTable;

    /// Construct the service.
    fn build(&self, context: OAuth2Context) -> Result<Box<dyn OAuth2Service>>;
}

/// OAuth1 capability set.
pub trait OAuth1Descriptor: Send + Sync {
    /// Signature method the provider expects.
    fn signature_method(&self) -> SignatureMethod {
        SignatureMethod::default()
    }

    /// Construct the service.
    fn build(&self, context: OAuth1Context) -> Result<Box<dyn OAuth1Service>>;
}

/// Shared handle to a descriptor, as stored by registries and catalogs.
pub type DescriptorRef = Arc<dyn ServiceDescriptor>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_table_lookup() {
        let table = ScopeTable::from_pairs(&[("SCOPE_EMAIL", "user:email"), ("SCOPE_REPO", "repo")]);

        assert_eq!(table.get("SCOPE_EMAIL"), Some("user:email"));
        assert_eq!(table.get("SCOPE_email"), None);
        assert!(table.contains_value("repo"));
        assert!(!table.contains_value("SCOPE_REPO"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_scope_table_deserializes_from_map() {
        let table: ScopeTable = serde_json::from_str(r#"{"SCOPE_READ": "read"}"#).unwrap();
        assert_eq!(table.get("SCOPE_READ"), Some("read"));
    }

    struct Nothing;

    impl ServiceDescriptor for Nothing {
        fn type_name(&self) -> &str {
            "Nothing"
        }
    }

    #[test]
    fn test_default_descriptor_has_no_capabilities() {
        assert!(Nothing.as_oauth1().is_none());
        assert!(Nothing.as_oauth2().is_none());
    }
}
