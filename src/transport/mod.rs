//! 传输层：基于 reqwest 的 Hub HTTP 客户端。
//!
//! HTTP transport for the Hub API.

pub mod http;

pub use http::{HubTransport, TransportOptions};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
