//! SPARQL text for the two search shapes / 两种搜索的SPARQL语句
//!
//! Inputs are expected trimmed and clamped by the caller. Every value that
//! ends up inside a double-quoted literal goes through [`escape_literal`].

use crate::config::SearchConfig;

const PREFIXES: &str = r#"PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
PREFIX wikibase: <http://wikiba.se/ontology#>
PREFIX bd: <http://www.bigdata.com/rdf#>
PREFIX mwapi: <https://www.mediawiki.org/ontology#API/>
"#;

/// Sovereign state / 主权国家
const CLASS_COUNTRY: &str = "wd:Q6256";

/// Populated place, city, capital, municipality / 居民点、城市、首都、市镇
const CITY_CLASSES: [&str; 4] = ["wd:Q486972", "wd:Q515", "wd:Q5119", "wd:Q15284"];

/// Backslash-escape `\` and `"` for a SPARQL string literal / 转义字符串字面量
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

/// Builds query text from search settings / 根据搜索配置构建查询
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    default_language: String,
    country_languages: Vec<String>,
    city_languages: Vec<String>,
    city_candidate_limit: usize,
    city_remote_limit_max: usize,
}

impl QueryBuilder {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            default_language: config.default_language.clone(),
            country_languages: config.country_languages.clone(),
            city_languages: config.city_languages.clone(),
            city_candidate_limit: config.city_candidate_limit.max(1),
            city_remote_limit_max: config.city_remote_limit_max.max(1),
        }
    }

    /// Effective remote LIMIT for a city request / 城市查询的远程LIMIT
    pub fn city_remote_limit(&self, limit: usize) -> usize {
        limit.clamp(1, self.city_remote_limit_max)
    }

    fn language<'a>(&'a self, language: &'a str) -> &'a str {
        let language = language.trim();
        if language.is_empty() {
            &self.default_language
        } else {
            language
        }
    }

    /// `"lang,fallback1,fallback2,..."` for the label service / 标签服务语言列表
    fn label_languages(&self, language: &str, fallbacks: &[String]) -> String {
        let mut langs = Vec::with_capacity(fallbacks.len() + 1);
        langs.push(language.to_string());
        langs.extend(fallbacks.iter().cloned());
        escape_literal(&langs.join(","))
    }

    /// Country search: ISO2 exact match or label/alias prefix / 国家搜索
    pub fn country_query(&self, query: &str, language: &str) -> String {
        let q = escape_literal(query);
        let q_upper = escape_literal(&query.to_uppercase());
        let lang_in = self
            .country_languages
            .iter()
            .map(|l| format!("\"{}\"", escape_literal(l)))
            .collect::<Vec<_>>()
            .join(",");
        let label_langs = self.label_languages(self.language(language), &self.country_languages);

        format!(
            r#"{PREFIXES}
SELECT DISTINCT ?c ?cLabel ?iso2 ?sitelinks WHERE {{
  ?c wdt:P31/wdt:P279* {CLASS_COUNTRY} .
  OPTIONAL {{ ?c wdt:P297 ?iso2 }}

  OPTIONAL {{
    ?c rdfs:label ?lab .
    FILTER(LANG(?lab) IN ({lang_in}))
    FILTER(STRSTARTS(LCASE(?lab), LCASE("{q}")))
  }}
  OPTIONAL {{
    ?c skos:altLabel ?al .
    FILTER(LANG(?al) IN ({lang_in}))
    FILTER(STRSTARTS(LCASE(?al), LCASE("{q}")))
  }}

  FILTER(
    (BOUND(?iso2) && UCASE(?iso2) = "{q_upper}") ||
    BOUND(?lab) || BOUND(?al)
  )
  ?c wikibase:sitelinks ?sitelinks .
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{label_langs}" }}
}}
"#
        )
    }

    /// City search: entity-search prefilter, then class/coordinate/country constraints / 城市搜索
    pub fn city_query(
        &self,
        query: &str,
        country: Option<&str>,
        language: &str,
        limit: usize,
    ) -> String {
        let q = escape_literal(query);
        let language = self.language(language);
        let search_lang = escape_literal(language);
        let label_langs = self.label_languages(language, &self.city_languages);
        let classes = CITY_CLASSES.join(" ");
        let candidates = self.city_candidate_limit;
        let remote_limit = self.city_remote_limit(limit);

        // No global fallback: with a country code only that country matches / 指定国家时不回退
        let country_filter = match country.map(str::trim).filter(|c| !c.is_empty()) {
            Some(cc) => format!(
                r#"
  ?it (wdt:P17|wdt:P131*/wdt:P17) ?country .
  ?country wdt:P297 "{}" .
"#,
                escape_literal(&cc.to_uppercase())
            ),
            None => String::new(),
        };

        format!(
            r#"{PREFIXES}
SELECT ?it ?itLabel ?coord ?pop ?cIso WHERE {{
  SERVICE wikibase:mwapi {{
    bd:serviceParam wikibase:endpoint "www.wikidata.org" .
    bd:serviceParam wikibase:api "EntitySearch" .
    bd:serviceParam mwapi:search "{q}" .
    bd:serviceParam mwapi:language "{search_lang}" .
    bd:serviceParam mwapi:limit "{candidates}" .
    ?it wikibase:apiOutputItem mwapi:item .
  }}

  VALUES ?cls {{ {classes} }}
  ?it wdt:P31/wdt:P279* ?cls .
  ?it wdt:P625 ?coord .
{country_filter}
  OPTIONAL {{ ?it wdt:P1082 ?pop . }}
  OPTIONAL {{
    ?it (wdt:P17|wdt:P131*/wdt:P17) ?c2 .
    ?c2 wdt:P297 ?cIso .
  }}

  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{label_langs}" }}
}}
ORDER BY DESC(?pop) STRLEN(STR(?itLabel))
LIMIT {remote_limit}
"#
        )
    }
}
