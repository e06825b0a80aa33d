use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::UrlRequest;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};
use wormhole_core::error::Result;
use wormhole_core::shortcode::is_dot_segment;
use wormhole_core::{ApiError, Operation, ShortCode, UrlApi, UrlRecord, UrlStatsRecord};

/// [`UrlApi`] over the redirection service's JSON HTTP interface.
///
/// | operation   | request                         |
/// |-------------|---------------------------------|
/// | create      | `POST {base}` `{"url": ...}`    |
/// | fetch_stats | `GET {base}{code}/stats`        |
/// | update      | `PUT {base}{code}` `{"url": ...}` |
/// | delete      | `DELETE {base}{code}`           |
/// | lookup      | `GET {base}{code}`              |
///
/// Codes are appended as a single percent-encoded path segment. The codes
/// `.` and `..` would resolve to another resource and fail without a request.
#[derive(Debug, Clone)]
pub struct HttpUrlApi {
    client: Client,
    base: Url,
    redirect_base_url: String,
}

impl HttpUrlApi {
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ClientError> {
        let base = parse_base(&config.api_base_url)?;
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base,
            redirect_base_url: config.redirect_base_url,
        })
    }

    /// The API base, normalized to end with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// The public short link for `code`.
    pub fn redirect_url(&self, code: &ShortCode) -> String {
        code.to_url(&self.redirect_base_url)
    }

    fn endpoint(&self, operation: Operation, segments: &[&str]) -> Result<Url> {
        if let Some(segment) = segments.iter().find(|s| is_dot_segment(s)) {
            return Err(ApiError::request_failed(
                operation,
                format!("'{segment}' cannot be used as a short code"),
            ));
        }

        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::request_failed(operation, "base url cannot carry a path")
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::request_failed(operation, e.to_string()))?;
        trace!(%operation, status = %response.status(), "received response");
        Ok(response)
    }

    async fn expect_success(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Response> {
        let response = self.send(operation, request).await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%operation, %status, "request rejected");
            return Err(ApiError::request_failed(
                operation,
                format!("unexpected status {status}"),
            ));
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::request_failed(operation, format!("malformed response: {e}")))
}

fn parse_base(raw: &str) -> std::result::Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be used as an api base".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl UrlApi for HttpUrlApi {
    #[instrument(skip(self))]
    async fn create(&self, original_url: &str) -> Result<UrlRecord> {
        let op = Operation::Create;
        let request = self
            .client
            .post(self.base.clone())
            .json(&UrlRequest { url: original_url });
        let response = self.expect_success(op, request).await?;
        decode(op, response).await
    }

    #[instrument(skip_all, fields(code = %code))]
    async fn fetch_stats(&self, code: &ShortCode) -> Result<UrlStatsRecord> {
        let op = Operation::Stats;
        let url = self.endpoint(op, &[code.as_str(), "stats"])?;
        let response = self.expect_success(op, self.client.get(url)).await?;
        decode(op, response).await
    }

    #[instrument(skip_all, fields(code = %code))]
    async fn update(&self, code: &ShortCode, new_url: &str) -> Result<UrlRecord> {
        let op = Operation::Update;
        let url = self.endpoint(op, &[code.as_str()])?;
        let request = self.client.put(url).json(&UrlRequest { url: new_url });
        let response = self.expect_success(op, request).await?;
        decode(op, response).await
    }

    #[instrument(skip_all, fields(code = %code))]
    async fn delete(&self, code: &ShortCode) -> Result<()> {
        let op = Operation::Delete;
        let url = self.endpoint(op, &[code.as_str()])?;
        self.expect_success(op, self.client.delete(url)).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(code = %code))]
    async fn lookup(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let op = Operation::Lookup;
        let url = self.endpoint(op, &[code.as_str()])?;
        let response = self.send(op, self.client.get(url)).await?;
        if !response.status().is_success() {
            return Ok(None);
        }
        decode(op, response).await.map(Some)
    }
}
