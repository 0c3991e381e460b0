//! User-facing commands. Each one takes its collaborators explicitly and
//! returns a `CommandOutput` for the caller to display.

pub mod fragment_handlers;
pub mod health_handlers;
pub mod output;
