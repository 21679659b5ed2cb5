//! Catalog of known implementation types.
//!
//! Implementations are addressed by identifier, `<namespace>::<Name>`,
//! where the namespace is `oauth1` or `oauth2`. A provider with no
//! registered implementation falls back to the identifier built from its
//! name, so every built-in is reachable by convention.

use std::collections::HashMap;
use std::sync::Arc;

use oauthkit_common::{ProtocolVersion, ProviderName};
use oauthkit_service::{oauth1, oauth2, DescriptorRef};

/// Implementation identifier to descriptor table.
#[derive(Default, Clone)]
pub struct Catalog {
    types: HashMap<String, DescriptorRef>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with every built-in provider.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        for provider in oauth2::builtin::all() {
            let id = Self::identifier(ProtocolVersion::OAuth2, &ProviderName::new(&provider.name));
            catalog.insert(id, Arc::new(provider));
        }
        for provider in oauth1::builtin::all() {
            let id = Self::identifier(ProtocolVersion::OAuth1, &ProviderName::new(&provider.name));
            catalog.insert(id, Arc::new(provider));
        }

        catalog
    }

    /// Conventional identifier for `name` under `version`.
    pub fn identifier(version: ProtocolVersion, name: &ProviderName) -> String {
        format!("{}::{}", version.namespace(), name)
    }

    /// Add (or replace) an implementation type.
    pub fn insert(
        &mut self,
        identifier: impl Into<String>,
        descriptor: DescriptorRef,
    ) -> Option<DescriptorRef> {
        self.types.insert(identifier.into(), descriptor)
    }

    /// Look up an implementation type.
    pub fn get(&self, identifier: &str) -> Option<&DescriptorRef> {
        self.types.get(identifier)
    }

    /// Look up the conventional implementation for `name` under `version`.
    pub fn conventional(&self, version: ProtocolVersion, name: &ProviderName) -> Option<&DescriptorRef> {
        self.get(&Self::identifier(version, name))
    }

    /// Check if an identifier is known.
    pub fn contains(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier)
    }

    /// Known identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.types.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_identifiers() {
        let catalog = Catalog::builtin();

        assert!(catalog.contains("oauth2::Github"));
        assert!(catalog.contains("oauth2::Dropbox"));
        assert!(catalog.contains("oauth1::Dropbox"));
        assert!(catalog.contains("oauth1::Twitter"));
        assert!(!catalog.contains("oauth2::Twitter"));
        assert!(!catalog.contains("oauth1::Github"));
    }

    #[test]
    fn test_builtin_versions_match_namespaces() {
        let catalog = Catalog::builtin();
        for id in catalog.identifiers() {
            let descriptor = catalog.get(&id).unwrap();
            if id.starts_with("oauth2::") {
                assert!(descriptor.as_oauth2().is_some(), "{} is not OAuth2", id);
            } else {
                assert!(descriptor.as_oauth1().is_some(), "{} is not OAuth1", id);
            }
        }
    }

    #[test]
    fn test_conventional_lookup_uses_normalized_name() {
        let catalog = Catalog::builtin();
        let name = ProviderName::new("github");

        assert_eq!(Catalog::identifier(ProtocolVersion::OAuth2, &name), "oauth2::Github");
        assert!(catalog.conventional(ProtocolVersion::OAuth2, &name).is_some());
        assert!(catalog.conventional(ProtocolVersion::OAuth1, &name).is_none());
    }

    #[test]
    fn test_identifiers_sorted() {
        let ids = Catalog::builtin().identifiers();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 8);
    }
}
