//! OAuth service capability sets and generic implementations.
//!
//! A provider implementation is described by a [`ServiceDescriptor`]. The
//! descriptor states which capability set it satisfies ([`OAuth2Descriptor`]
//! or [`OAuth1Descriptor`]) and builds a ready-to-use service from the
//! collaborators the resolver hands it.
//!
//! Generic services cover the usual authorization-code (OAuth2) and
//! three-legged (OAuth1) flows; providers only declare endpoints, scope
//! constants and how tokens are presented.

pub mod descriptor;
pub mod oauth1;
pub mod oauth2;
pub mod service;

pub use descriptor::{
    DescriptorRef, OAuth1Context, OAuth1Descriptor, OAuth2Context, OAuth2Descriptor, ScopeTable,
    ServiceDescriptor,
};
pub use oauth1::{GenericOAuth1Service, OAuth1Provider, OAuth1Service};
pub use oauth2::{AuthorizationMethod, GenericOAuth2Service, OAuth2Provider, OAuth2Service};
pub use service::{Service, ServiceHandle};
