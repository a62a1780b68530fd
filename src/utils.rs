/// Parse and clamp a `limit` query parameter / 解析并限制limit参数
///
/// Missing, empty, non-numeric or NaN values fall back to `default`.
/// Fractions are truncated toward zero, then clamped to `[1, max]`;
/// overflowing values such as `1e400` clamp like infinities do.
pub fn clamp_limit(raw: Option<&str>, default: usize, max: usize) -> usize {
    let max = max.max(1);
    let value = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => return default.clamp(1, max),
        Some(s) => match s.parse::<f64>() {
            Ok(v) if !v.is_nan() => v.trunc(),
            _ => return default.clamp(1, max),
        },
    };

    if value < 1.0 {
        1
    } else if value > max as f64 {
        max
    } else {
        value as usize
    }
}

/// Last path segment of an entity URI / 实体URI的最后一段
/// e.g. "http://www.wikidata.org/entity/Q142" -> "Q142"
pub fn entity_id(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Whether text is a bare item id such as "Q142" / 是否为裸实体ID
pub fn is_entity_id(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('Q')
        && text.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

/// Trimmed text, or None when blank / 去除空白，空则返回None
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|s| !s.is_empty())
}
