//! Search module - country and city lookups over SPARQL / 搜索模块
//!
//! Flow / 流程：
//! - query: builds SPARQL text for a request
//! - SparqlSource: executes it (one remote call, bounded by a timeout)
//! - rank: turns rows into ordered, deduped items
//!
//! Remote failures are kept as [`SearchOutcome::Failed`] here and only
//! collapsed to an empty list by the HTTP layer.

pub mod query;
pub mod rank;
pub mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

pub use query::{escape_literal, QueryBuilder};
pub use types::{CitySearchRequest, CountrySearchRequest, GeoPoint, SearchItem, SearchResult};

use crate::config::AppConfig;
use crate::sparql::{RawRow, SparqlError, SparqlSource};

/// Result of one search call / 一次搜索的结果
#[derive(Debug)]
pub enum SearchOutcome {
    /// Remote answered; items may still be empty / 远程已应答
    Found(SearchResult),
    /// Query was blank, nothing was sent / 查询为空，未发送请求
    Blank,
    /// Remote call failed or timed out / 远程调用失败或超时
    Failed(SparqlError),
}

impl SearchOutcome {
    /// Collapse to a response body; failures become no items / 折叠为响应体
    pub fn into_result(self) -> SearchResult {
        match self {
            SearchOutcome::Found(result) => result,
            SearchOutcome::Blank | SearchOutcome::Failed(_) => SearchResult::default(),
        }
    }
}

/// Country/city search service / 国家与城市搜索服务
pub struct SearchService {
    builder: QueryBuilder,
    source: Arc<dyn SparqlSource>,
    timeout: Duration,
}

impl SearchService {
    pub fn new(builder: QueryBuilder, source: Arc<dyn SparqlSource>, timeout: Duration) -> Self {
        Self {
            builder,
            source,
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig, source: Arc<dyn SparqlSource>) -> Self {
        Self::new(
            QueryBuilder::new(&config.search),
            source,
            config.sparql.timeout(),
        )
    }

    /// One remote call; the future is dropped when the timeout elapses / 单次远程调用，超时即取消
    async fn fetch(&self, sparql: &str) -> Result<Vec<RawRow>, SparqlError> {
        match tokio::time::timeout(self.timeout, self.source.select(sparql)).await {
            Ok(result) => result,
            Err(_) => Err(SparqlError::Timeout),
        }
    }

    /// Country search / 国家搜索
    pub async fn countries(&self, req: &CountrySearchRequest) -> SearchOutcome {
        let query = req.query.trim();
        if query.is_empty() {
            return SearchOutcome::Blank;
        }

        let sparql = self.builder.country_query(query, &req.language);
        match self.fetch(&sparql).await {
            Ok(rows) => SearchOutcome::Found(SearchResult {
                items: rank::rank_countries(&rows, query, req.limit),
            }),
            Err(e) => {
                tracing::warn!("Country search failed for q={:?}: {}", query, e);
                SearchOutcome::Failed(e)
            }
        }
    }

    /// City search; a country filter never falls back to other countries / 城市搜索
    pub async fn cities(&self, req: &CitySearchRequest) -> SearchOutcome {
        let query = req.query.trim();
        if query.is_empty() {
            return SearchOutcome::Blank;
        }

        let country = req
            .country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase);

        let sparql = self
            .builder
            .city_query(query, country.as_deref(), &req.language, req.limit);

        let started = Instant::now();
        let fetched = self.fetch(&sparql).await;
        tracing::info!(
            "City search q={:?} country={:?} -> {} rows in {}ms",
            query,
            country.as_deref().unwrap_or(""),
            fetched.as_ref().map(Vec::len).unwrap_or(0),
            started.elapsed().as_millis()
        );

        match fetched {
            Ok(rows) => SearchOutcome::Found(SearchResult {
                items: rank::normalize_cities(&rows, query, country.as_deref(), req.limit),
            }),
            Err(e) => {
                tracing::error!("City search SPARQL error: {}", e);
                SearchOutcome::Failed(e)
            }
        }
    }
}
