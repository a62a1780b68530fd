//! HTTP client for a SPARQL endpoint / SPARQL端点HTTP客户端

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};

use super::types::{RawRow, SparqlResponse};
use super::{SparqlError, SparqlSource};
use crate::config::{RequestMode, SparqlConfig};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const SPARQL_QUERY: &str = "application/sparql-query";

/// SPARQL endpoint client / SPARQL端点客户端
pub struct SparqlClient {
    client: Client,
    endpoint: String,
    user_agent: String,
    mode: RequestMode,
}

impl SparqlClient {
    pub fn new(config: &SparqlConfig) -> Result<Self, SparqlError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(SparqlError::Transport)?;

        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing reqwest client / 复用已有的reqwest客户端
    pub fn with_client(client: Client, config: &SparqlConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('?').to_string(),
            user_agent: config.user_agent.clone(),
            mode: config.request_mode,
        }
    }

    fn request(&self, query: &str) -> RequestBuilder {
        let builder = match self.mode {
            RequestMode::Post => self
                .client
                .post(format!("{}?format=json", self.endpoint))
                .header(header::CONTENT_TYPE, SPARQL_QUERY)
                .body(query.to_string()),
            RequestMode::Get => self.client.get(format!(
                "{}?format=json&query={}",
                self.endpoint,
                urlencoding::encode(query)
            )),
        };

        builder
            .header(header::ACCEPT, SPARQL_RESULTS_JSON)
            .header(header::USER_AGENT, &self.user_agent)
    }
}

#[async_trait]
impl SparqlSource for SparqlClient {
    async fn select(&self, query: &str) -> Result<Vec<RawRow>, SparqlError> {
        tracing::debug!("SPARQL {:?} request, {} bytes of query", self.mode, query.len());

        let resp = self
            .request(query)
            .send()
            .await
            .map_err(SparqlError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SparqlError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(SparqlError::from_reqwest)?;
        let parsed: SparqlResponse = serde_json::from_slice(&body)
            .map_err(|e| SparqlError::Decode(e.to_string()))?;

        Ok(parsed.results.bindings)
    }
}
