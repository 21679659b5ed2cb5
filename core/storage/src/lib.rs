//! Token storage abstraction for OAuthKit.
//!
//! Services persist access tokens and authorization states through the
//! [`TokenStorage`] trait. Two backends ship with the crate: an in-memory
//! store and a JSON document on the local filesystem.
//!
//! # Design Principles
//! - Storage isolation: services never know where tokens live
//! - Async operations: all storage calls are async
//! - Keyed by service name: one token and one state per provider

pub mod backend;
pub mod local;
pub mod memory;
pub mod token;

pub use backend::TokenStorage;
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use token::{Expiry, Token};
