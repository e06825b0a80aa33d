//! Core types and traits for the Wormhole short-URL client.
//!
//! This crate provides the data model shared by the remote API client,
//! the local cache and the synchronization session.

pub mod api;
pub mod error;
pub mod record;
pub mod shortcode;

pub use api::{Operation, UrlApi, DEFAULT_API_BASE_URL, DEFAULT_REDIRECT_BASE_URL};
pub use error::{ApiError, CoreError};
pub use record::{validate_url, RecordId, UrlRecord, UrlStatsRecord};
pub use shortcode::ShortCode;
