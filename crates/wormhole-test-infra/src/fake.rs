use crate::memory::MemoryService;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use wormhole_core::error::Result;
use wormhole_core::{ApiError, Operation, ShortCode, UrlApi, UrlRecord, UrlStatsRecord};

/// One request observed by a [`FakeUrlApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub operation: Operation,
    /// The short code, or the URL for `create`.
    pub argument: String,
}

/// A [`UrlApi`] backed by a [`MemoryService`].
///
/// Failures and latency can be injected per operation. Every request is
/// logged before latency is applied, so an in-flight call is already
/// visible in [`FakeUrlApi::calls`].
#[derive(Debug, Default)]
pub struct FakeUrlApi {
    service: MemoryService,
    failing: Mutex<HashSet<Operation>>,
    latency: Mutex<HashMap<Operation, Duration>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeUrlApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(service: MemoryService) -> Self {
        Self {
            service,
            ..Self::default()
        }
    }

    /// The backing service, for seeding and inspection.
    pub fn service(&self) -> &MemoryService {
        &self.service
    }

    /// Makes every subsequent `operation` fail with `RequestFailed`.
    pub fn fail(&self, operation: Operation) {
        self.failing.lock().insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.failing.lock().remove(&operation);
    }

    /// Delays every subsequent `operation` by `delay`.
    pub fn set_latency(&self, operation: Operation, delay: Duration) {
        self.latency.lock().insert(operation, delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Arguments of every logged call of `operation`, in order.
    pub fn calls_for(&self, operation: Operation) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.operation == operation)
            .map(|call| call.argument.clone())
            .collect()
    }

    async fn enter(&self, operation: Operation, argument: &str) -> Result<()> {
        self.calls.lock().push(Call {
            operation,
            argument: argument.to_string(),
        });

        let delay = self.latency.lock().get(&operation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().contains(&operation) {
            return Err(ApiError::request_failed(operation, "injected failure"));
        }
        Ok(())
    }
}

fn not_found(operation: Operation, code: &ShortCode) -> ApiError {
    ApiError::request_failed(operation, format!("unexpected status 404 for {code}"))
}

#[async_trait]
impl UrlApi for FakeUrlApi {
    async fn create(&self, original_url: &str) -> Result<UrlRecord> {
        self.enter(Operation::Create, original_url).await?;
        Ok(self.service.create(original_url))
    }

    async fn fetch_stats(&self, code: &ShortCode) -> Result<UrlStatsRecord> {
        self.enter(Operation::Stats, code.as_str()).await?;
        self.service
            .stats(code.as_str())
            .ok_or_else(|| not_found(Operation::Stats, code))
    }

    async fn update(&self, code: &ShortCode, new_url: &str) -> Result<UrlRecord> {
        self.enter(Operation::Update, code.as_str()).await?;
        self.service
            .update(code.as_str(), new_url)
            .ok_or_else(|| not_found(Operation::Update, code))
    }

    async fn delete(&self, code: &ShortCode) -> Result<()> {
        self.enter(Operation::Delete, code.as_str()).await?;
        if self.service.delete(code.as_str()) {
            Ok(())
        } else {
            Err(not_found(Operation::Delete, code))
        }
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        self.enter(Operation::Lookup, code.as_str()).await?;
        Ok(self.service.get(code.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logs_calls_in_order() {
        let api = FakeUrlApi::new();

        let record = api.create("https://example.com").await.unwrap();
        api.lookup(&record.short_code).await.unwrap();
        api.lookup(&ShortCode::new_unchecked("nope")).await.unwrap();

        assert_eq!(api.calls().len(), 3);
        assert_eq!(api.calls_for(Operation::Lookup), vec!["x1", "nope"]);
    }

    #[tokio::test]
    async fn injected_failure_is_request_failed() {
        let api = FakeUrlApi::new();
        api.fail(Operation::Create);

        let err = api.create("https://example.com").await.unwrap_err();
        assert_eq!(err.operation(), Operation::Create);
        assert!(api.service().is_empty());

        api.recover(Operation::Create);
        assert!(api.create("https://example.com").await.is_ok());
    }

    #[tokio::test]
    async fn delete_of_unknown_code_fails() {
        let api = FakeUrlApi::new();
        let err = api.delete(&ShortCode::new_unchecked("nope")).await.unwrap_err();
        assert_eq!(err.operation(), Operation::Delete);
    }
}
