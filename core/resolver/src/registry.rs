//! Capability registry for custom service implementations.

use std::collections::HashMap;
use tracing::debug;

use oauthkit_common::{Error, ProtocolVersion, ProviderName, Result};
use oauthkit_service::DescriptorRef;

/// Registry of caller-supplied service implementations.
///
/// Entries are keyed by protocol version and normalized provider name.
/// The version an implementation lands under is decided by the capability
/// sets it advertises, not by the caller.
#[derive(Default, Clone)]
pub struct CapabilityRegistry {
    entries: HashMap<(ProtocolVersion, ProviderName), DescriptorRef>,
}

impl CapabilityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation under `name`.
    ///
    /// # Preconditions
    /// - `descriptor` advertises the OAuth2 or OAuth1 capability set
    ///
    /// # Postconditions
    /// - The implementation is stored under OAuth2 if it advertises OAuth2,
    ///   otherwise under OAuth1
    /// - A previous registration for the same name and version is replaced
    /// - Returns the version the implementation was registered under
    ///
    /// # Errors
    /// - `InvalidServiceType` if neither capability set is advertised; the
    ///   registry is left unchanged
    pub fn register(
        &mut self,
        name: impl Into<ProviderName>,
        descriptor: DescriptorRef,
    ) -> Result<ProtocolVersion> {
        let name = name.into();
        let version = ProtocolVersion::PREFERENCE
            .into_iter()
            .find(|version| supports(descriptor.as_ref(), *version))
            .ok_or_else(|| {
                Error::InvalidServiceType(format!(
                    "{} implements neither OAuth1 nor OAuth2",
                    descriptor.type_name()
                ))
            })?;

        debug!(provider = %name, %version, implementation = descriptor.type_name(), "Registering service");
        self.entries.insert((version, name), descriptor);
        Ok(version)
    }

    /// Look up the implementation registered for `name` under `version`.
    pub fn get(&self, version: ProtocolVersion, name: &ProviderName) -> Option<&DescriptorRef> {
        self.entries.get(&(version, name.clone()))
    }

    /// Check if an implementation is registered for `name` under `version`.
    pub fn contains(&self, version: ProtocolVersion, name: &ProviderName) -> bool {
        self.entries.contains_key(&(version, name.clone()))
    }

    /// Number of registered implementations across both versions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn supports(descriptor: &dyn oauthkit_service::ServiceDescriptor, version: ProtocolVersion) -> bool {
    match version {
        ProtocolVersion::OAuth2 => descriptor.as_oauth2().is_some(),
        ProtocolVersion::OAuth1 => descriptor.as_oauth1().is_some(),
    }
}
