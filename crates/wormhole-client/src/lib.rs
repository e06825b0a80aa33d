//! HTTP implementation of [`wormhole_core::UrlApi`].

pub mod config;
pub mod error;
pub mod http;
mod model;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpUrlApi;
