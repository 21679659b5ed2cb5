//! HTTP transport abstraction for OAuthKit.
//!
//! Services never talk to the network directly; they hand an [`HttpRequest`]
//! to an [`HttpClient`]. The default implementation is backed by `reqwest`.

pub mod client;
pub mod reqwest_client;

pub use client::{HttpClient, HttpRequest, Method, RequestBody};
pub use reqwest_client::{HttpConfig, ReqwestClient};
