use std::time::Duration;
use typed_builder::TypedBuilder;
use wormhole_core::{DEFAULT_API_BASE_URL, DEFAULT_REDIRECT_BASE_URL};

/// Where the redirection service lives and how long to wait for it.
///
/// ```
/// use wormhole_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .api_base_url("http://127.0.0.1:9000/shorten/")
///     .build();
/// assert_eq!(config.redirect_base_url, "http://localhost:8080/redirect/");
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct ClientConfig {
    /// Base of the CRUD API. Create posts here, per-code calls append the code.
    #[builder(default = DEFAULT_API_BASE_URL.to_string(), setter(into))]
    pub api_base_url: String,

    /// Base short links are resolved through.
    #[builder(default = DEFAULT_REDIRECT_BASE_URL.to_string(), setter(into))]
    pub redirect_base_url: String,

    /// Per-request timeout.
    #[builder(default = Duration::from_secs(10))]
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
