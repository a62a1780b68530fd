//! SPARQL protocol client / SPARQL协议客户端
//!
//! Only the read side of the protocol is used: one SELECT per call,
//! results in the SPARQL 1.1 JSON format.

pub mod client;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::SparqlClient;
pub use types::{Binding, RawRow, SparqlResponse};

/// Remote query failures / 远程查询错误
#[derive(Debug, Error)]
pub enum SparqlError {
    #[error("SPARQL request timed out")]
    Timeout,

    #[error("SPARQL endpoint returned status {0}")]
    Status(u16),

    #[error("SPARQL response could not be decoded: {0}")]
    Decode(String),

    #[error("SPARQL request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl SparqlError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SparqlError::Timeout
        } else if err.is_decode() {
            SparqlError::Decode(err.to_string())
        } else {
            SparqlError::Transport(err)
        }
    }
}

/// Anything that can answer a SELECT query / 可执行SELECT查询的数据源
#[async_trait]
pub trait SparqlSource: Send + Sync {
    async fn select(&self, query: &str) -> Result<Vec<RawRow>, SparqlError>;
}
