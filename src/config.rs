use crate::{
    models::user::BearerUser,
    routes::endpoints::{DEFAULT_API_URL, Endpoints},
};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::{env, fmt, path::PathBuf};

pub const API_URL_ENV: &str = "API_URL";
pub const ID_TOKEN_ENV: &str = "FRAGMENTS_ID_TOKEN";
pub const USERNAME_ENV: &str = "FRAGMENTS_USERNAME";

const DEFAULT_USERNAME: &str = "anonymous";
const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Centralized client configuration.
/// Combines environment variables and CLI arguments.
#[derive(Clone)]
pub struct AppConfig {
    pub endpoints: Endpoints,
    pub username: String,
    pub id_token: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Client for the fragments microservice")]
pub struct Args {
    /// Base URL of the fragments service (overrides API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Id token issued by the identity provider (overrides FRAGMENTS_ID_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Name of the signed-in user (overrides FRAGMENTS_USERNAME)
    #[arg(long, global = true)]
    pub username: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the service is up (no sign-in needed)
    Health,

    /// Show the signed-in user and their fragments
    Session,

    /// List your fragments
    List {
        /// Return full metadata instead of ids
        #[arg(long)]
        expand: bool,
    },

    /// Create a fragment
    Create {
        /// MIME type of the payload [default: text/plain for --data, guessed from --file]
        #[arg(long = "type")]
        content_type: Option<String>,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Fetch a fragment's content
    Get {
        id: String,

        /// Write the content to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Fetch a fragment's metadata
    Info { id: String },

    /// Replace a fragment's content
    Update {
        id: String,

        /// MIME type of the payload [default: text/plain for --data, guessed from --file]
        #[arg(long = "type")]
        content_type: Option<String>,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Delete a fragment
    Delete { id: String },
}

/// Exactly one source for a fragment body.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Text content
    #[arg(long)]
    pub data: Option<String>,

    /// Read the content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    /// Content type to send with this payload.
    ///
    /// An explicit `--type` wins. Otherwise `--data` is `text/plain` and
    /// `--file` is guessed from the file extension.
    pub fn content_type(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(content_type) = explicit {
            return Ok(content_type.to_string());
        }
        match &self.file {
            Some(path) => match mime_guess::from_path(path).first() {
                Some(mime) => Ok(mime.essence_str().to_string()),
                None => bail!("cannot tell the type of {}: pass --type", path.display()),
            },
            None => Ok(TEXT_CONTENT_TYPE.into()),
        }
    }
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the command to run.
    pub fn from_env_and_args() -> Result<(Self, Command)> {
        Self::resolve(Args::parse(), read_env)
    }

    /// Merge parsed args over values from `lookup`, then defaults.
    pub fn resolve<F>(args: Args, lookup: F) -> Result<(Self, Command)>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let api_url = match args.api_url {
            Some(url) => url,
            None => lookup(API_URL_ENV)?.unwrap_or_else(|| DEFAULT_API_URL.into()),
        };
        let endpoints =
            Endpoints::new(&api_url).with_context(|| format!("parsing API url `{}`", api_url))?;

        let id_token = match args.token {
            Some(token) => Some(token),
            None => lookup(ID_TOKEN_ENV)?,
        }
        .filter(|token| !token.trim().is_empty());

        let username = match args.username {
            Some(name) => name,
            None => lookup(USERNAME_ENV)?.unwrap_or_else(|| DEFAULT_USERNAME.into()),
        };

        let cfg = Self {
            endpoints,
            username,
            id_token,
        };
        Ok((cfg, args.command))
    }

    /// The signed-in user, if a token was supplied.
    pub fn user(&self) -> Option<BearerUser> {
        self.id_token
            .as_ref()
            .map(|token| BearerUser::new(self.username.clone(), token.trim()))
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.endpoints.base().as_str())
            .field("username", &self.username)
            .field("signed_in", &self.id_token.is_some())
            .finish()
    }
}

fn read_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}
