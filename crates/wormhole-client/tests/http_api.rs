use std::time::Duration;

use wormhole_client::{ClientConfig, HttpUrlApi};
use wormhole_core::{Operation, RecordId, ShortCode, UrlApi};
use wormhole_test_infra::{MemoryService, MockServer};

/// Test fixture pairing a mock redirection server with a client pointed at it.
struct Fixture {
    server: MockServer,
    api: HttpUrlApi,
}

impl Fixture {
    async fn start() -> Self {
        Self::start_with(MemoryService::new()).await
    }

    async fn start_with(service: MemoryService) -> Self {
        let server = MockServer::start_with(service)
            .await
            .expect("Failed to start mock server");
        let config = ClientConfig::builder()
            .api_base_url(server.api_base_url())
            .redirect_base_url(server.redirect_base_url())
            .timeout(Duration::from_secs(5))
            .build();
        let api = HttpUrlApi::new(config).expect("Failed to build client");
        Self { server, api }
    }
}

fn code(s: &str) -> ShortCode {
    ShortCode::new_unchecked(s)
}

#[tokio::test]
async fn test_create_then_lookup() {
    let fixture = Fixture::start().await;

    let created = fixture.api.create("https://example.com/long").await.unwrap();
    assert_eq!(created.short_code, code("x1"));
    assert_eq!(created.original_url, "https://example.com/long");
    assert_eq!(created.id, RecordId::Numeric(1));

    let found = fixture.api.lookup(&created.short_code).await.unwrap();
    assert_eq!(found, Some(created));
}

#[tokio::test]
async fn test_create_rejected_by_service() {
    let fixture = Fixture::start().await;

    let err = fixture.api.create("not a url").await.unwrap_err();

    assert_eq!(err.operation(), Operation::Create);
    assert!(err.to_string().contains("400"));
    assert!(fixture.server.service().is_empty());
}

#[tokio::test]
async fn test_lookup_unknown_code_is_none() {
    let fixture = Fixture::start().await;

    let found = fixture.api.lookup(&code("nope")).await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_stats_count_redirects() {
    let fixture = Fixture::start().await;
    let created = fixture.api.create("https://example.com").await.unwrap();

    let stats = fixture.api.fetch_stats(&created.short_code).await.unwrap();
    assert_eq!(stats.access_count, 0);
    assert_eq!(stats.record, created);

    let follower = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let response = follower
        .get(fixture.api.redirect_url(&created.short_code))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::FOUND);
    assert_eq!(
        response.headers()[reqwest::header::LOCATION],
        "https://example.com"
    );

    let stats = fixture.api.fetch_stats(&created.short_code).await.unwrap();
    assert_eq!(stats.access_count, 1);
}

#[tokio::test]
async fn test_stats_for_unknown_code_fails() {
    let fixture = Fixture::start().await;

    let err = fixture.api.fetch_stats(&code("nope")).await.unwrap_err();

    assert_eq!(err.operation(), Operation::Stats);
}

#[tokio::test]
async fn test_update_changes_target() {
    let fixture = Fixture::start().await;
    let created = fixture.api.create("https://old.example").await.unwrap();

    let updated = fixture
        .api
        .update(&created.short_code, "https://new.example")
        .await
        .unwrap();

    assert_eq!(updated.short_code, created.short_code);
    assert_eq!(updated.original_url, "https://new.example");
    let found = fixture.api.lookup(&created.short_code).await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://new.example");
}

#[tokio::test]
async fn test_update_unknown_code_fails() {
    let fixture = Fixture::start().await;

    let err = fixture
        .api
        .update(&code("nope"), "https://new.example")
        .await
        .unwrap_err();

    assert_eq!(err.operation(), Operation::Update);
}

#[tokio::test]
async fn test_delete_then_lookup_is_none() {
    let fixture = Fixture::start().await;
    let created = fixture.api.create("https://example.com").await.unwrap();

    fixture.api.delete(&created.short_code).await.unwrap();

    assert!(fixture.api.lookup(&created.short_code).await.unwrap().is_none());
    let err = fixture.api.delete(&created.short_code).await.unwrap_err();
    assert_eq!(err.operation(), Operation::Delete);
}

#[tokio::test]
async fn test_code_with_slash_stays_one_segment() {
    let service = MemoryService::new();
    service.seed("a/b", "https://slash.example");
    let fixture = Fixture::start_with(service).await;

    let found = fixture.api.lookup(&code("a/b")).await.unwrap().unwrap();

    assert_eq!(found.original_url, "https://slash.example");
}

#[tokio::test]
async fn test_unreachable_server_is_request_failed() {
    let config = ClientConfig::builder()
        .api_base_url("http://127.0.0.1:1/shorten/")
        .timeout(Duration::from_secs(2))
        .build();
    let api = HttpUrlApi::new(config).unwrap();

    let err = api.create("https://example.com").await.unwrap_err();
    assert_eq!(err.operation(), Operation::Create);

    let err = api.lookup(&code("x1")).await.unwrap_err();
    assert_eq!(err.operation(), Operation::Lookup);
}
