use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Display;

/// The short identifier the remote service assigns to a URL.
///
/// Codes are opaque to the client. Values coming off the wire are wrapped
/// with [`ShortCode::new_unchecked`]; [`ShortCode::new`] is for user input
/// and only rejects strings that could never be a single path segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Valid codes are non-empty, contain no whitespace or `/` and are not
    /// the dot segments `.` or `..`.
    pub fn new(code: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this for codes reported by the remote service.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Builds the redirect URL for this code under `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code is `.` or `..`, which URL path handling resolves
    /// away instead of treating as a segment.
    pub fn is_dot_segment(&self) -> bool {
        is_dot_segment(&self.0)
    }

    fn validate(code: &str) -> std::result::Result<(), CoreError> {
        if code.is_empty() {
            return Err(CoreError::InvalidShortCode(
                "short code cannot be empty".to_string(),
            ));
        }

        if code.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(CoreError::InvalidShortCode(format!(
                "must not contain whitespace or '/': '{}'",
                code
            )));
        }

        if is_dot_segment(code) {
            return Err(CoreError::InvalidShortCode(format!(
                "'{}' is not a valid short code",
                code
            )));
        }

        Ok(())
    }
}

/// Whether `segment` is `.` or `..`.
pub fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ShortCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}
