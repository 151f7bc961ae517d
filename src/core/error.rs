use thiserror::Error;

use crate::core::types::Handle;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown directive: {0}")]
    UnknownDirective(String),

    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("Unknown addition for {handle}: {name}")]
    UnknownAddition { handle: Handle, name: String },

    #[error("Unknown geom type: {0}")]
    UnknownGeom(String),

    #[error("Input ended while reading {0}")]
    UnexpectedEndOfInput(String),

    #[error("Malformed value for {field}: {token:?}")]
    MalformedValue { field: String, token: String },

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Handle {0} does not name a registered entity")]
    DanglingHandle(i64),

    #[error("Entity {referrer} references {target}, which is declared after it")]
    ForwardReference { referrer: Handle, target: Handle },

    #[error("Entity {handle} is a {found}, expected {expected}")]
    WrongKind {
        handle: Handle,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Entity {0} was used before it was bound")]
    Unbound(Handle),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
