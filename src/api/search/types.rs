use roadtrip_search::config::SearchConfig;
use roadtrip_search::utils::non_blank;

/// First value of a query-string key, like `URLSearchParams.get` / 取参数的第一个值
pub fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

/// GET /countrysearch query parameters / 国家搜索参数
#[derive(Debug, Default)]
pub struct CountrySearchParams {
    pub q: Option<String>,
    pub lang: Option<String>,
    /// Kept as text, non-numeric values fall back to the default / 保留原始文本
    pub limit: Option<String>,
}

impl CountrySearchParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            q: first_value(pairs, "q"),
            lang: first_value(pairs, "lang"),
            limit: first_value(pairs, "limit"),
        }
    }
}

/// GET /citysearch query parameters / 城市搜索参数
#[derive(Debug, Default)]
pub struct CitySearchParams {
    pub q: Option<String>,
    /// Older clients send `query` / 旧客户端参数名
    pub query: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub lang: Option<String>,
    pub limit: Option<String>,
}

impl CitySearchParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            q: first_value(pairs, "q"),
            query: first_value(pairs, "query"),
            country: first_value(pairs, "country"),
            country_code: first_value(pairs, "countryCode"),
            lang: first_value(pairs, "lang"),
            limit: first_value(pairs, "limit"),
        }
    }
}

/// First non-empty value / 取第一个非空值
pub fn first_present(primary: Option<String>, alias: Option<String>) -> Option<String> {
    primary.filter(|s| !s.is_empty()).or(alias.filter(|s| !s.is_empty()))
}

/// Requested language or the configured default / 请求语言或默认语言
pub fn language_or_default(lang: Option<&str>, settings: &SearchConfig) -> String {
    non_blank(lang)
        .unwrap_or(&settings.default_language)
        .to_string()
}
