use crate::error::Result;
use crate::record::{UrlRecord, UrlStatsRecord};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/shorten/";
pub const DEFAULT_REDIRECT_BASE_URL: &str = "http://localhost:8080/redirect/";

/// The remote operations a client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Stats,
    Update,
    Delete,
    Lookup,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Stats => "stats",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Lookup => "lookup",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client side of the redirection service's CRUD contract.
///
/// Each call is a single request/response exchange. Implementations never
/// retry and never cache.
#[async_trait]
pub trait UrlApi: Send + Sync + 'static {
    /// Creates a short URL for `original_url`.
    async fn create(&self, original_url: &str) -> Result<UrlRecord>;

    /// Fetches the record together with its access counter.
    async fn fetch_stats(&self, code: &ShortCode) -> Result<UrlStatsRecord>;

    /// Points an existing code at `new_url`. The URL is not validated locally.
    async fn update(&self, code: &ShortCode, new_url: &str) -> Result<UrlRecord>;

    /// Deletes the mapping for `code`.
    async fn delete(&self, code: &ShortCode) -> Result<()>;

    /// Looks a code up.
    ///
    /// Returns `Ok(None)` when the service reports the code as unknown;
    /// only transport-level problems are errors.
    async fn lookup(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;
}

#[async_trait]
impl<T: UrlApi + ?Sized> UrlApi for Arc<T> {
    async fn create(&self, original_url: &str) -> Result<UrlRecord> {
        (**self).create(original_url).await
    }

    async fn fetch_stats(&self, code: &ShortCode) -> Result<UrlStatsRecord> {
        (**self).fetch_stats(code).await
    }

    async fn update(&self, code: &ShortCode, new_url: &str) -> Result<UrlRecord> {
        (**self).update(code, new_url).await
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        (**self).delete(code).await
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).lookup(code).await
    }
}
