use anyhow::{Context, Result};
use bytes::Bytes;
use fragments_client::{
    config::{self, Command, PayloadArgs},
    handlers::{
        fragment_handlers::FragmentCommands, health_handlers, output::CommandOutput,
    },
    services::fragment_client::FragmentClient,
};
use std::{path::Path, sync::Arc};
use tokio::fs;
use tracing_subscriber::EnvFilter;

/// Body of a create/update request as given on the command line.
enum Payload {
    Text(String),
    File(Bytes),
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup (stderr, so stdout only carries results) ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // --- Parse config + command ---
    let (cfg, command) = config::AppConfig::from_env_and_args()?;
    tracing::debug!("Starting fragments-client with config: {:?}", cfg);

    let client = FragmentClient::new(cfg.endpoints.clone())?;
    let output = match command {
        Command::Health => health_handlers::health(&client).await?,
        Command::Session => {
            let commands = sign_in(&cfg, client)?;
            let list = commands.list(true).await?;
            println!("Signed in as {}\n{}", commands.username(), list);
            return Ok(());
        }
        Command::List { expand } => sign_in(&cfg, client)?.list(expand).await?,
        Command::Create {
            content_type,
            payload,
        } => {
            let commands = sign_in(&cfg, client)?;
            let content_type = payload.content_type(content_type.as_deref())?;
            match read_payload(payload).await? {
                Payload::Text(text) => commands.create_text(&text, &content_type).await?,
                Payload::File(data) => commands.create_binary(data, &content_type).await?,
            }
        }
        Command::Get { id, output } => {
            let fetched = sign_in(&cfg, client)?.get(&id).await?;
            if let (Some(path), CommandOutput::Content(content)) = (output.as_ref(), &fetched) {
                fs::write(path, content.as_bytes())
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
                println!(
                    "Wrote {} bytes of {} to {}",
                    content.len(),
                    content.content_type,
                    path.display()
                );
                return Ok(());
            }
            fetched
        }
        Command::Info { id } => sign_in(&cfg, client)?.info(&id).await?,
        Command::Update {
            id,
            content_type,
            payload,
        } => {
            let commands = sign_in(&cfg, client)?;
            let content_type = payload.content_type(content_type.as_deref())?;
            match read_payload(payload).await? {
                Payload::Text(text) => commands.update_text(&id, &text, &content_type).await?,
                Payload::File(data) => commands.update_binary(&id, data, &content_type).await?,
            }
        }
        Command::Delete { id } => sign_in(&cfg, client)?.delete(&id).await?,
    };

    println!("{}", output);
    Ok(())
}

/// Commands for the signed-in user; fails when no token was supplied.
fn sign_in(cfg: &config::AppConfig, client: FragmentClient) -> Result<FragmentCommands> {
    let user = cfg.user().with_context(|| {
        format!(
            "not signed in: pass --token or set {}",
            config::ID_TOKEN_ENV
        )
    })?;
    Ok(FragmentCommands::new(client, Arc::new(user)))
}

async fn read_payload(payload: PayloadArgs) -> Result<Payload> {
    match (payload.data, payload.file) {
        (Some(text), _) => Ok(Payload::Text(text)),
        (None, Some(path)) => read_file(&path).await.map(Payload::File),
        (None, None) => Ok(Payload::Text(String::new())),
    }
}

async fn read_file(path: &Path) -> Result<Bytes> {
    let data = fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(Bytes::from(data))
}
