//! Service resolution for OAuthKit.
//!
//! Given a provider name, consumer credentials, a token storage and an
//! optional list of scopes, [`ServiceFactory`] decides which protocol
//! version handles the provider, resolves friendly scope names into the
//! provider's identifiers and builds the service.
//!
//! # Resolution rules
//! - Provider names are matched after uppercasing their first character
//! - Registered implementations shadow the built-in catalog per version
//! - OAuth2 always wins over OAuth1 when both exist
//! - Scopes requested against an OAuth1-only provider are an error
//! - Unknown providers resolve to `None`, not an error

pub mod catalog;
pub mod config;
pub mod factory;
pub mod registry;
pub mod scopes;

pub use catalog::Catalog;
pub use config::{CustomProvider, FactoryConfig};
pub use factory::ServiceFactory;
pub use registry::CapabilityRegistry;
pub use scopes::{resolve_scopes, scope_constant};
