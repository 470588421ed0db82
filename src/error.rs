//! Typed errors callers branch on. Collaborator and I/O failures use `anyhow`.

use thiserror::Error;

/// Reasons an alias draft is rejected. All are user-correctable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AliasError {
    #[error("alias name is required")]
    EmptyName,
    #[error("alias name `{0}` must not contain whitespace")]
    NameHasWhitespace(String),
    #[error("an alias named `{0}` already exists")]
    DuplicateName(String),
    #[error("select a command for the alias")]
    NoCommandSelected,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("no alias named `{0}`")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got `{value}`")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be one of {expected}, got `{value}`")]
    InvalidChoice {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("BUILDKITE_ORG is set but BUILDKITE_API_TOKEN is missing")]
    MissingToken,
}
