use serde::{Deserialize, Serialize};

/// One autocomplete entry / 一条自动补全结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub name: String,
    pub display_name: String,
    /// ISO 3166-1 alpha-2, or empty / ISO二位国家码，可为空
    pub country_code: String,
    /// Always empty, kept for front-end compatibility / 始终为空，兼容前端
    pub admin1: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Search response body / 搜索响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<SearchItem>,
}

/// Country search request / 国家搜索请求
#[derive(Debug, Clone)]
pub struct CountrySearchRequest {
    pub query: String,
    pub language: String,
    pub limit: usize,
}

/// City search request / 城市搜索请求
#[derive(Debug, Clone)]
pub struct CitySearchRequest {
    pub query: String,
    pub language: String,
    /// Strict ISO2 filter / 严格的国家过滤
    pub country: Option<String>,
    pub limit: usize,
}

/// Longitude/latitude pair from a WKT point / WKT点坐标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}
