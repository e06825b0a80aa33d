use crate::error::CoreError;
use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use url::Url;

/// Identifier the remote service assigns to a record.
///
/// The client never interprets it; both numeric and textual ids
/// round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(u64),
    Text(String),
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Numeric(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

/// One short-URL mapping as reported by the remote service.
///
/// Timestamps are kept exactly as the service sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub id: RecordId,
    /// The long-form URL supplied by the user.
    #[serde(rename = "url")]
    pub original_url: String,
    /// The code the service assigned; unique within the local cache.
    #[serde(rename = "shortUrl")]
    pub short_code: ShortCode,
    pub created_at: String,
    pub updated_at: String,
}

impl UrlRecord {
    /// Case-insensitive substring match on the short code or original URL.
    ///
    /// An empty query matches every record.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.short_code.as_str().to_lowercase().contains(&needle)
            || self.original_url.to_lowercase().contains(&needle)
    }
}

/// A [`UrlRecord`] together with its access counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsRecord {
    #[serde(flatten)]
    pub record: UrlRecord,
    /// Reported by the service; never incremented locally.
    pub access_count: u64,
}

impl UrlStatsRecord {
    pub fn short_code(&self) -> &ShortCode {
        &self.record.short_code
    }
}

/// Validates that the URL parses, uses http or https and names a host.
pub fn validate_url(url: &str) -> Result<(), CoreError> {
    if url.is_empty() {
        return Err(CoreError::InvalidUrl("URL cannot be empty".to_string()));
    }

    if url.chars().any(char::is_whitespace) {
        return Err(CoreError::InvalidUrl(format!(
            "URL must not contain whitespace: {}",
            url
        )));
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return Err(CoreError::InvalidUrl(format!(
            "URL must have a valid scheme and host: {}",
            url
        )));
    };

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if scheme.is_empty() || host.is_empty() {
        return Err(CoreError::InvalidUrl(format!(
            "URL must have a valid scheme and host: {}",
            url
        )));
    }

    let scheme = scheme.to_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(CoreError::InvalidUrl(format!(
            "URL scheme must be http or https: {}",
            scheme
        )));
    }

    Url::parse(url).map_err(|e| CoreError::InvalidUrl(format!("{}: {}", e, url)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, url: &str) -> UrlRecord {
        UrlRecord {
            id: RecordId::Numeric(1),
            original_url: url.to_string(),
            short_code: ShortCode::new_unchecked(code),
            created_at: "2024-05-01T10:00:00".to_string(),
            updated_at: "2024-05-01T10:00:00".to_string(),
        }
    }

    #[test]
    fn decodes_wire_format() {
        let json = r#"{
            "id": 7,
            "url": "https://example.com",
            "shortUrl": "x1",
            "createdAt": "2024-05-01T10:00:00",
            "updatedAt": "2024-05-01T10:00:00"
        }"#;

        let decoded: UrlRecord = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.id, RecordId::Numeric(7));
        assert_eq!(decoded.original_url, "https://example.com");
        assert_eq!(decoded.short_code.as_str(), "x1");
    }

    #[test]
    fn stats_flatten_the_record() {
        let json = r#"{
            "id": "rec-9",
            "url": "https://example.com",
            "shortUrl": "x1",
            "createdAt": "c",
            "updatedAt": "u",
            "accessCount": 3
        }"#;

        let stats: UrlStatsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(stats.access_count, 3);
        assert_eq!(stats.record.id, RecordId::Text("rec-9".to_string()));
        assert_eq!(stats.short_code().as_str(), "x1");
    }

    #[test]
    fn encodes_wire_field_names() {
        let value = serde_json::to_value(record("x1", "https://example.com")).unwrap();
        assert_eq!(value["shortUrl"], "x1");
        assert_eq!(value["url"], "https://example.com");
        assert_eq!(value["createdAt"], "2024-05-01T10:00:00");
    }

    #[test]
    fn query_matching_is_case_insensitive() {
        let rec = record("AbC1", "https://Example.com/Path");
        assert!(rec.matches_query("abc"));
        assert!(rec.matches_query("EXAMPLE"));
        assert!(rec.matches_query(""));
        assert!(!rec.matches_query("zzz"));
    }

    #[test]
    fn valid_urls() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://localhost:8080/a?b=c").is_ok());
        assert!(validate_url("HTTPS://EXAMPLE.COM").is_ok());
    }

    #[test]
    fn invalid_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("not-a-valid-url").is_err());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("https:///path").is_err());
        assert!(validate_url("https://exa mple.com").is_err());
        assert!(validate_url("http://:80").is_err());
        assert!(validate_url("http://exa<mple.com").is_err());
        assert!(validate_url("http://[::1").is_err());
    }
}
