//! The signed-in user, as handed to us by the identity provider.

use crate::errors::{ClientError, ClientResult};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::fmt;

/// Capability that produces the headers for authenticated requests.
///
/// Sign-in happens elsewhere; implementors only need to know how to present
/// the resulting credential.
pub trait AuthenticatedUser: Send + Sync {
    fn username(&self) -> &str;

    /// Headers for a read request.
    fn authorization_headers(&self) -> ClientResult<HeaderMap>;

    /// Headers for a write request carrying a body of `content_type`.
    fn write_authorization_headers(&self, content_type: &str) -> ClientResult<HeaderMap> {
        let mut headers = self.authorization_headers()?;
        let value = HeaderValue::from_str(content_type)
            .map_err(|_| ClientError::InvalidHeader(format!("content type `{}`", content_type)))?;
        headers.insert(CONTENT_TYPE, value);
        Ok(headers)
    }
}

/// A user authenticated with an id token, sent as `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerUser {
    username: String,
    id_token: String,
}

impl BearerUser {
    pub fn new(username: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            id_token: id_token.into(),
        }
    }
}

impl AuthenticatedUser for BearerUser {
    fn username(&self) -> &str {
        &self.username
    }

    fn authorization_headers(&self) -> ClientResult<HeaderMap> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.id_token))
            .map_err(|_| ClientError::InvalidHeader("authorization token".into()))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

impl fmt::Debug for BearerUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerUser")
            .field("username", &self.username)
            .field("id_token", &"<redacted>")
            .finish()
    }
}
