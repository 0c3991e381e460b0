//! Health command.
//!
//! - `health` -> `GET /` on the fragments service, no credentials required

use crate::{
    errors::CommandResult, handlers::output::CommandOutput,
    services::fragment_client::FragmentClient,
};
use tracing::{info, warn};

/// Ask the service whether it is up. Works without a signed-in user.
pub async fn health(client: &FragmentClient) -> CommandResult<CommandOutput> {
    let health = client.health_check().await?;
    if health.is_ok() {
        info!(version = health.version.as_deref(), "fragments service is healthy");
    } else {
        warn!(status = %health.status, "fragments service reported a problem");
    }
    Ok(CommandOutput::Health(health))
}
