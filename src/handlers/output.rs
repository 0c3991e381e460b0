//! Text rendering of command results.

use crate::models::{
    fragment::{Fragment, FragmentBody, FragmentContent, FragmentList},
    health::HealthStatus,
};
use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;
use std::fmt;

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Health(HealthStatus),
    Fragments(FragmentList),
    Fragment(Fragment),
    Content(FragmentContent),
    Deleted(String),
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Health(health) => write_json(f, health),
            Self::Fragments(list) => write_json(f, list),
            Self::Fragment(fragment) => write_json(f, fragment),
            Self::Content(content) => match &content.body {
                FragmentBody::Text(text) => f.write_str(text),
                // images are shown inline as a data URL
                FragmentBody::Binary(data) => write!(
                    f,
                    "data:{};base64,{}",
                    content.content_type,
                    general_purpose::STANDARD.encode(data)
                ),
            },
            Self::Deleted(id) => write!(f, "Deleted fragment {}", id),
        }
    }
}

fn write_json<T: Serialize>(f: &mut fmt::Formatter<'_>, value: &T) -> fmt::Result {
    let json = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
    f.write_str(&json)
}
