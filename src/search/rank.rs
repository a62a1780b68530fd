//! Row normalization, ranking and dedupe / 结果归一化、排序与去重

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;

use super::types::{GeoPoint, SearchItem};
use crate::sparql::RawRow;
use crate::utils::{entity_id, is_entity_id, non_blank};

/// `Point(<lon> <lat>)`, both optionally signed decimals
static WKT_POINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Point\(\s*([-+]?(?:\d+\.?\d*|\.\d+))\s+([-+]?(?:\d+\.?\d*|\.\d+))\s*\)")
        .expect("WKT point pattern")
});

/// Parse a WKT point literal / 解析WKT点
///
/// Returns None for anything that is not a finite `Point(lon lat)`.
pub fn parse_wkt_point(wkt: &str) -> Option<GeoPoint> {
    let caps = WKT_POINT.captures(wkt)?;
    let lon: f64 = caps[1].parse().ok()?;
    let lat: f64 = caps[2].parse().ok()?;
    if lat.is_finite() && lon.is_finite() {
        Some(GeoPoint { lat, lon })
    } else {
        None
    }
}

/// Label of a row unless it is missing or just the entity id / 取可用标签
///
/// The label service answers with the bare id (e.g. "Q123") when no label
/// exists in any requested language.
fn usable_label<'a>(row: &'a RawRow, label_var: &str, id_var: &str) -> Option<&'a str> {
    let label = non_blank(row.get(label_var))?;
    if is_entity_id(label) {
        let id = row.get(id_var).map(entity_id);
        if id.map_or(true, |id| id == label) {
            return None;
        }
    }
    Some(label)
}

/// Country row with its ranking keys / 带排序键的国家候选
#[derive(Debug, Clone, PartialEq)]
pub struct CountryCandidate {
    pub name: String,
    pub country_code: String,
    /// 1 when the ISO2 code equals the uppercased query / ISO完全匹配
    pub iso_hit: u8,
    /// Always 1: rows are already filtered on a label/alias prefix.
    /// Kept as a ranking slot should that filter be relaxed.
    pub prefix_hit: u8,
    pub sitelinks: u64,
}

impl CountryCandidate {
    pub fn from_row(row: &RawRow, query: &str) -> Self {
        let iso2 = non_blank(row.get("iso2")).unwrap_or("");
        let iso_hit = u8::from(!iso2.is_empty() && iso2.to_uppercase() == query.to_uppercase());
        let sitelinks = row
            .get("sitelinks")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let name = usable_label(row, "cLabel", "c")
            .or(Some(iso2).filter(|s| !s.is_empty()))
            .unwrap_or(query)
            .to_string();

        Self {
            name,
            country_code: iso2.to_string(),
            iso_hit,
            prefix_hit: 1,
            sitelinks,
        }
    }

    pub fn rank_key(&self) -> (u8, u8, u64) {
        (self.iso_hit, self.prefix_hit, self.sitelinks)
    }

    /// Higher keys first, then name ascending / 键值降序，名称升序
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .rank_key()
            .cmp(&self.rank_key())
            .then_with(|| compare_names(&self.name, &other.name))
    }

    pub fn into_item(self) -> SearchItem {
        SearchItem {
            display_name: self.name.clone(),
            name: self.name,
            country_code: self.country_code,
            admin1: String::new(),
            lat: None,
            lon: None,
        }
    }
}

/// Case-insensitive first, exact bytes as tie-break / 先忽略大小写，再精确比较
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Score, sort and truncate country rows / 国家结果评分、排序并截断
pub fn rank_countries(rows: &[RawRow], query: &str, limit: usize) -> Vec<SearchItem> {
    let mut candidates: Vec<CountryCandidate> = rows
        .iter()
        .map(|row| CountryCandidate::from_row(row, query))
        .collect();

    candidates.sort_by(|a, b| a.rank_cmp(b));

    candidates
        .into_iter()
        .take(limit)
        .map(CountryCandidate::into_item)
        .collect()
}

/// Map one city row to an item / 城市行转换为结果项
///
/// The row's own country code wins over the caller's filter.
pub fn city_item(row: &RawRow, query: &str, country_filter: Option<&str>) -> SearchItem {
    let point = row.get("coord").and_then(parse_wkt_point);
    let name = usable_label(row, "itLabel", "it").unwrap_or(query).to_string();
    let country_code = non_blank(row.get("cIso"))
        .or_else(|| non_blank(country_filter))
        .unwrap_or("")
        .to_uppercase();

    SearchItem {
        display_name: name.clone(),
        name,
        country_code,
        admin1: String::new(),
        lat: point.map(|p| p.lat),
        lon: point.map(|p| p.lon),
    }
}

#[derive(Hash, PartialEq, Eq)]
struct CityKey {
    name: String,
    country_code: String,
    lat: Option<u64>,
    lon: Option<u64>,
}

fn coord_bits(v: f64) -> u64 {
    // 0.0 and -0.0 are the same place
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl CityKey {
    fn of(item: &SearchItem) -> Self {
        Self {
            name: item.name.clone(),
            country_code: item.country_code.clone(),
            lat: item.lat.map(coord_bits),
            lon: item.lon.map(coord_bits),
        }
    }
}

/// Drop repeated (name, country, lat, lon) items, keeping order / 按键去重并保持顺序
///
/// Stops pulling from `items` once `limit` items are kept.
pub fn dedupe_cities<I>(items: I, limit: usize) -> Vec<SearchItem>
where
    I: IntoIterator<Item = SearchItem>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    if limit == 0 {
        return out;
    }

    for item in items {
        if !seen.insert(CityKey::of(&item)) {
            continue;
        }
        out.push(item);
        if out.len() >= limit {
            break;
        }
    }
    out
}

/// City rows in remote order, deduped and truncated / 城市结果归一化
pub fn normalize_cities(
    rows: &[RawRow],
    query: &str,
    country_filter: Option<&str>,
    limit: usize,
) -> Vec<SearchItem> {
    dedupe_cities(
        rows.iter().map(|row| city_item(row, query, country_filter)),
        limit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(id: &str, label: &str, iso2: &str, sitelinks: &str) -> RawRow {
        let mut row = RawRow::new()
            .with_uri("c", &format!("http://www.wikidata.org/entity/{}", id))
            .with("sitelinks", sitelinks);
        if !label.is_empty() {
            row = row.with("cLabel", label);
        }
        if !iso2.is_empty() {
            row = row.with("iso2", iso2);
        }
        row
    }

    fn city(label: &str, coord: &str, iso: &str) -> RawRow {
        let mut row = RawRow::new()
            .with_uri("it", "http://www.wikidata.org/entity/Q90")
            .with("itLabel", label)
            .with("coord", coord);
        if !iso.is_empty() {
            row = row.with("cIso", iso);
        }
        row
    }

    #[test]
    fn test_parse_wkt_point() {
        assert_eq!(
            parse_wkt_point("Point(13.405 52.52)"),
            Some(GeoPoint { lat: 52.52, lon: 13.405 })
        );
        assert_eq!(
            parse_wkt_point("Point(-58.38 -34.6)"),
            Some(GeoPoint { lat: -34.6, lon: -58.38 })
        );
        assert_eq!(
            parse_wkt_point("Point(2 48)"),
            Some(GeoPoint { lat: 48.0, lon: 2.0 })
        );
        assert_eq!(parse_wkt_point("Point(abc def)"), None);
        assert_eq!(parse_wkt_point("Point(13.405)"), None);
        assert_eq!(parse_wkt_point(""), None);
        assert_eq!(parse_wkt_point("52.52,13.405"), None);
    }

    #[test]
    fn test_country_iso_hit_ranks_first() {
        let rows = vec![
            country("Q142", "France", "FR", "400"),
            country("Q1", "Frobnia", "XX", "900"),
        ];
        let items = rank_countries(&rows, "fr", 10);
        assert_eq!(items[0].country_code, "FR");
        assert_eq!(items[0].name, "France");
        assert_eq!(items[1].name, "Frobnia");
    }

    #[test]
    fn test_country_sitelinks_then_name() {
        let rows = vec![
            country("Q1", "Beta", "BB", "10"),
            country("Q2", "alpha", "AA", "10"),
            country("Q3", "Gamma", "GG", "50"),
        ];
        let names: Vec<String> = rank_countries(&rows, "zz", 10)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Gamma", "alpha", "Beta"]);
    }

    #[test]
    fn test_country_order_is_total() {
        let rows = vec![
            country("Q1", "Spain", "ES", "300"),
            country("Q2", "Estonia", "EE", "250"),
            country("Q3", "Eswatini", "SZ", "250"),
            country("Q4", "eswatini", "SZ", "250"),
            country("Q5", "Es", "", "1"),
        ];
        let candidates: Vec<CountryCandidate> = rows
            .iter()
            .map(|r| CountryCandidate::from_row(r, "es"))
            .collect();

        for a in &candidates {
            for b in &candidates {
                let ab = a.rank_cmp(b);
                assert_eq!(ab, b.rank_cmp(a).reverse());
                if ab == Ordering::Equal {
                    assert_eq!(a.rank_key(), b.rank_key());
                    assert_eq!(a.name, b.name);
                }
            }
        }

        let mut forward = candidates.clone();
        forward.sort_by(|a, b| a.rank_cmp(b));
        let mut backward = candidates;
        backward.reverse();
        backward.sort_by(|a, b| a.rank_cmp(b));
        assert_eq!(forward, backward);
        assert_eq!(forward[0].name, "Spain");
    }

    #[test]
    fn test_country_truncates_and_fills_fields() {
        let rows: Vec<RawRow> = (0..5)
            .map(|i| country(&format!("Q{}", i + 1), &format!("Land {}", i), "", &i.to_string()))
            .collect();
        let items = rank_countries(&rows, "land", 3);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Land 4");
        for item in &items {
            assert_eq!(item.name, item.display_name);
            assert_eq!(item.admin1, "");
            assert_eq!(item.lat, None);
            assert_eq!(item.lon, None);
            assert_eq!(item.country_code, "");
        }
    }

    #[test]
    fn test_country_name_fallbacks() {
        // Label service echoing the id counts as no label / 标签服务回显ID视为无标签
        let row = country("Q99", "Q99", "TV", "5");
        let candidate = CountryCandidate::from_row(&row, "tv");
        assert_eq!(candidate.name, "TV");
        assert_eq!(candidate.iso_hit, 1);

        let row = country("Q98", "", "", "1");
        assert_eq!(CountryCandidate::from_row(&row, "tuv").name, "tuv");
    }

    #[test]
    fn test_country_bad_sitelinks() {
        let row = country("Q1", "Nowhere", "", "many");
        assert_eq!(CountryCandidate::from_row(&row, "no").sitelinks, 0);
        assert_eq!(CountryCandidate::from_row(&row, "no").prefix_hit, 1);
    }

    #[test]
    fn test_city_item_fields() {
        let item = city_item(&city("Paris", "Point(2.3514 48.8575)", "fr"), "par", Some("DE"));
        assert_eq!(item.name, "Paris");
        assert_eq!(item.display_name, "Paris");
        assert_eq!(item.country_code, "FR");
        assert_eq!(item.admin1, "");
        assert_eq!(item.lat, Some(48.8575));
        assert_eq!(item.lon, Some(2.3514));
    }

    #[test]
    fn test_city_item_fallbacks() {
        let row = RawRow::new()
            .with_uri("it", "http://www.wikidata.org/entity/Q4242")
            .with("itLabel", "Q4242")
            .with("coord", "Point(abc def)");
        let item = city_item(&row, "Toul", Some("fr"));
        assert_eq!(item.name, "Toul");
        assert_eq!(item.country_code, "FR");
        assert_eq!(item.lat, None);
        assert_eq!(item.lon, None);

        let item = city_item(&RawRow::new(), "Toul", None);
        assert_eq!(item.country_code, "");
    }

    #[test]
    fn test_city_dedupe() {
        let rows = vec![
            city("Paris", "Point(2.3514 48.8575)", "FR"),
            city("Paris", "Point(2.3514 48.8575)", "FR"),
            city("Paris", "Point(-95.55 33.66)", "US"),
            city("Paris", "Point(2.3514 48.8575)", "fr"),
        ];
        let items = normalize_cities(&rows, "Paris", Some("FR"), 12);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].country_code, "FR");
        assert_eq!(items[1].country_code, "US");
    }

    #[test]
    fn test_city_keeps_remote_order_and_stops_at_limit() {
        let rows = vec![
            city("Toulouse", "Point(1.44 43.6)", "FR"),
            city("Toulon", "Point(5.93 43.12)", "FR"),
            city("Toul", "Point(5.89 48.68)", "FR"),
        ];
        let names: Vec<String> = normalize_cities(&rows, "toul", None, 2)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Toulouse", "Toulon"]);
    }

    #[test]
    fn test_city_dedupe_is_idempotent() {
        let rows = vec![
            city("Lyon", "Point(4.83 45.76)", "FR"),
            city("Lyon", "Point(4.83 45.76)", "FR"),
            city("Lyon", "broken", "FR"),
            city("Lyon", "broken", "FR"),
            city("Lyon", "Point(0 -0)", ""),
            city("Lyon", "Point(-0 0)", ""),
        ];
        let once = normalize_cities(&rows, "lyon", None, 50);
        let twice = dedupe_cities(once.clone(), 50);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_dedupe_zero_limit() {
        let items = normalize_cities(&[city("Nice", "Point(7.26 43.7)", "FR")], "nice", None, 0);
        assert!(items.is_empty());
    }
}
