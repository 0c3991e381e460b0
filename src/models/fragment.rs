//! Represents a fragment, a small piece of text or binary content owned by a user.

use crate::errors::{ClientError, ClientResult};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type assumed when the service omits `Content-Type`.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Fragment metadata as served by `/v1/fragments/{id}/info`.
///
/// The client never stores these; they are relayed from the service as-is.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// Opaque identifier generated by the service.
    pub id: String,

    /// Hashed owner identifier.
    pub owner_id: String,

    /// MIME type declared when the fragment was written.
    #[serde(rename = "type")]
    pub content_type: String,

    /// Size of the payload in bytes.
    pub size: u64,

    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Result of listing a user's fragments.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum FragmentList {
    /// Bare identifiers (`expand` off).
    Ids(Vec<String>),
    /// Full metadata records (`expand=1`).
    Expanded(Vec<Fragment>),
}

impl FragmentList {
    /// Identifiers in service order, regardless of the listing form.
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Ids(ids) => ids.iter().map(String::as_str).collect(),
            Self::Expanded(fragments) => fragments.iter().map(|f| f.id.as_str()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Expanded(fragments) => fragments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Payload of a fragment fetched from `/v1/fragments/{id}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentContent {
    pub content_type: String,
    pub body: FragmentBody,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FragmentBody {
    Binary(Bytes),
    Text(String),
}

impl FragmentContent {
    /// Classify a raw response body by its content type.
    ///
    /// Image types stay as bytes; everything else must be valid UTF-8 text.
    pub fn from_bytes(content_type: impl Into<String>, data: Bytes) -> ClientResult<Self> {
        let content_type = content_type.into();
        let body = if is_binary_content_type(&content_type) {
            FragmentBody::Binary(data)
        } else {
            let text = String::from_utf8(data.to_vec()).map_err(|err| {
                ClientError::Decode(format!("`{}` body is not UTF-8: {}", content_type, err))
            })?;
            FragmentBody::Text(text)
        };
        Ok(Self { content_type, body })
    }

    pub fn len(&self) -> usize {
        match &self.body {
            FragmentBody::Binary(data) => data.len(),
            FragmentBody::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes of the payload, whichever form it was decoded into.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.body {
            FragmentBody::Binary(data) => data,
            FragmentBody::Text(text) => text.as_bytes(),
        }
    }
}

/// True when content of this type is handed back as raw bytes.
pub fn is_binary_content_type(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Compare two content types by their `type/subtype` part only.
pub fn same_media_type(left: &str, right: &str) -> bool {
    fn essence(value: &str) -> &str {
        value.split(';').next().unwrap_or(value).trim()
    }
    essence(left).eq_ignore_ascii_case(essence(right))
}

/// `{ "status": "ok", "fragment": {...} }`
#[derive(Deserialize, Debug)]
pub(crate) struct FragmentEnvelope {
    pub fragment: Fragment,
}

/// `{ "status": "ok", "fragments": ["id", ...] }`
#[derive(Deserialize, Debug)]
pub(crate) struct IdListEnvelope {
    pub fragments: Vec<String>,
}

/// `{ "status": "ok", "fragments": [{...}, ...] }`
#[derive(Deserialize, Debug)]
pub(crate) struct ExpandedListEnvelope {
    pub fragments: Vec<Fragment>,
}
