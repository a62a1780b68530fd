use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;

use roadtrip_search::search::{CitySearchRequest, CountrySearchRequest};
use roadtrip_search::utils::clamp_limit;

use super::types::*;
use crate::api::{json_response, ApiError};
use crate::state::AppState;

/// GET /countrysearch?q=fr&lang=fr&limit=10 - 国家搜索
///
/// Remote failures answer `200 {items: []}`.
pub async fn country_search(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = CountrySearchParams::from_pairs(&pairs);
    let settings = &state.config.search;

    let req = CountrySearchRequest {
        query: params.q.unwrap_or_default(),
        language: language_or_default(params.lang.as_deref(), settings),
        limit: clamp_limit(params.limit.as_deref(), settings.default_limit, settings.max_limit),
    };

    let outcome = state.search.countries(&req).await;
    json_response(StatusCode::OK, &outcome.into_result())
}

/// GET /citysearch?q=toul&country=FR&lang=fr&limit=12 - 城市搜索
///
/// With a country code only that country is searched, no global fallback.
pub async fn city_search(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = CitySearchParams::from_pairs(&pairs);
    let settings = &state.config.search;

    let req = CitySearchRequest {
        query: first_present(params.q, params.query).unwrap_or_default(),
        language: language_or_default(params.lang.as_deref(), settings),
        country: first_present(params.country, params.country_code).map(|c| c.to_uppercase()),
        limit: clamp_limit(params.limit.as_deref(), settings.default_limit, settings.max_limit),
    };

    let outcome = state.search.cities(&req).await;
    json_response(StatusCode::OK, &outcome.into_result())
}
