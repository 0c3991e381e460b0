//! Paths of the fragments service consumed by this client.
//!
//! ## Structure
//! - `GET    /`                       : health check
//! - `GET    /v1/fragments`           : list fragment ids (`?expand=1` for metadata)
//! - `POST   /v1/fragments`           : create fragment
//! - `GET    /v1/fragments/{id}`      : fetch fragment content
//! - `GET    /v1/fragments/{id}/info` : fetch fragment metadata
//! - `PUT    /v1/fragments/{id}`      : replace fragment content
//! - `DELETE /v1/fragments/{id}`      : delete fragment
//!
//! Ids are appended as a single percent-encoded path segment. `.` and `..`
//! are rejected: URL normalization would fold them into the parent path.

use crate::errors::{ClientError, ClientResult};
use reqwest::Url;

/// Address used when neither `--api-url` nor `API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

const FRAGMENTS_SEGMENTS: [&str; 2] = ["v1", "fragments"];

/// URL builder rooted at the service's base address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse a base address. A trailing slash is ignored; the address may
    /// carry a path prefix such as `https://host/api`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|_| ClientError::InvalidUrl(base_url.into()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(base_url.into()));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `GET /`
    pub fn health(&self) -> Url {
        self.base.clone()
    }

    /// `/v1/fragments`, with `?expand=1` when `expand` is set.
    pub fn fragments(&self, expand: bool) -> Url {
        let mut url = self.with_segments(&FRAGMENTS_SEGMENTS);
        if expand {
            url.query_pairs_mut().append_pair("expand", "1");
        }
        url
    }

    /// `/v1/fragments/{id}`
    pub fn fragment(&self, id: &str) -> ClientResult<Url> {
        let id = checked_id(id)?;
        Ok(self.with_segments(&[FRAGMENTS_SEGMENTS[0], FRAGMENTS_SEGMENTS[1], id]))
    }

    /// `/v1/fragments/{id}/info`
    pub fn fragment_info(&self, id: &str) -> ClientResult<Url> {
        let id = checked_id(id)?;
        Ok(self.with_segments(&[FRAGMENTS_SEGMENTS[0], FRAGMENTS_SEGMENTS[1], id, "info"]))
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// True for ids that URL parsing treats as `.`/`..` path segments.
pub fn is_dot_segment(id: &str) -> bool {
    id == "." || id == ".."
}

fn checked_id(id: &str) -> ClientResult<&str> {
    if is_dot_segment(id) {
        return Err(ClientError::InvalidId(id.into()));
    }
    Ok(id)
}
