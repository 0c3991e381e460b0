//! Commands for fragment operations.
//! Validates what the user typed, then delegates the request to `FragmentClient`.

use crate::{
    errors::{CommandResult, InputError},
    handlers::output::CommandOutput,
    models::user::AuthenticatedUser,
    routes::endpoints::is_dot_segment,
    services::fragment_client::FragmentClient,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a fragment command needs, passed in rather than looked up.
#[derive(Clone)]
pub struct FragmentCommands {
    client: FragmentClient,
    user: Arc<dyn AuthenticatedUser>,
}

impl FragmentCommands {
    pub fn new(client: FragmentClient, user: Arc<dyn AuthenticatedUser>) -> Self {
        Self { client, user }
    }

    pub fn username(&self) -> &str {
        self.user.username()
    }

    pub fn client(&self) -> &FragmentClient {
        &self.client
    }

    /// List the user's fragments, as ids or full metadata.
    pub async fn list(&self, expand: bool) -> CommandResult<CommandOutput> {
        let list = self.client.list_fragments(self.user.as_ref(), expand).await?;
        info!(count = list.len(), expand, "listed fragments");
        Ok(CommandOutput::Fragments(list))
    }

    /// Create a fragment from typed text. Surrounding whitespace is dropped.
    pub async fn create_text(&self, data: &str, content_type: &str) -> CommandResult<CommandOutput> {
        let data = require_text(data)?;
        let fragment = self
            .client
            .create_fragment(self.user.as_ref(), Bytes::copy_from_slice(data.as_bytes()), content_type)
            .await?;
        info!(id = %fragment.id, "created fragment");
        Ok(CommandOutput::Fragment(fragment))
    }

    /// Create a fragment from file contents, sent as-is (empty files included).
    pub async fn create_binary(&self, data: Bytes, content_type: &str) -> CommandResult<CommandOutput> {
        let fragment = self
            .client
            .create_fragment(self.user.as_ref(), data, content_type)
            .await?;
        info!(id = %fragment.id, "created fragment");
        Ok(CommandOutput::Fragment(fragment))
    }

    /// Fetch a fragment's content.
    pub async fn get(&self, id: &str) -> CommandResult<CommandOutput> {
        let id = require_id(id)?;
        let content = self.client.get_fragment_by_id(self.user.as_ref(), id).await?;
        Ok(CommandOutput::Content(content))
    }

    /// Fetch a fragment's metadata.
    pub async fn info(&self, id: &str) -> CommandResult<CommandOutput> {
        let id = require_id(id)?;
        let fragment = self
            .client
            .get_fragment_meta_by_id(self.user.as_ref(), id)
            .await?;
        Ok(CommandOutput::Fragment(fragment))
    }

    /// Replace a fragment's content with typed text.
    pub async fn update_text(
        &self,
        id: &str,
        data: &str,
        content_type: &str,
    ) -> CommandResult<CommandOutput> {
        let id = require_id(id)?;
        let data = require_text(data)?;
        let fragment = self
            .client
            .update_fragment(
                self.user.as_ref(),
                id,
                Bytes::copy_from_slice(data.as_bytes()),
                content_type,
            )
            .await?;
        info!(id, "updated fragment");
        Ok(CommandOutput::Fragment(fragment))
    }

    /// Replace a fragment's content with file contents.
    pub async fn update_binary(
        &self,
        id: &str,
        data: Bytes,
        content_type: &str,
    ) -> CommandResult<CommandOutput> {
        let id = require_id(id)?;
        let fragment = self
            .client
            .update_fragment(self.user.as_ref(), id, data, content_type)
            .await?;
        info!(id, "updated fragment");
        Ok(CommandOutput::Fragment(fragment))
    }

    pub async fn delete(&self, id: &str) -> CommandResult<CommandOutput> {
        let id = require_id(id)?;
        self.client.delete_fragment(self.user.as_ref(), id).await?;
        info!(id, "deleted fragment");
        Ok(CommandOutput::Deleted(id.to_string()))
    }
}

fn require_id(id: &str) -> Result<&str, InputError> {
    let id = id.trim();
    if id.is_empty() {
        warn!("{}", InputError::NoId);
        return Err(InputError::NoId);
    }
    if is_dot_segment(id) {
        warn!(id, "{}", InputError::DotSegmentId);
        return Err(InputError::DotSegmentId);
    }
    Ok(id)
}

fn require_text(data: &str) -> Result<&str, InputError> {
    let data = data.trim();
    if data.is_empty() {
        warn!("{}", InputError::NoData);
        return Err(InputError::NoData);
    }
    Ok(data)
}
