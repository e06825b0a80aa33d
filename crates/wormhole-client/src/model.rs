use serde::Serialize;

/// Body of create and update requests.
#[derive(Serialize)]
pub(crate) struct UrlRequest<'a> {
    pub url: &'a str,
}
