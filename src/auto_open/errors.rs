//! Error types surfaced by host calls and settings persistence.
use std::fmt;

/// Failures reported by the host when the loop reads or uses a world object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The object has no interaction entry point at all.
    MissingEntryPoint,
    /// The entry point exists but rejected the argument shape.
    SignatureMismatch,
    /// The handle no longer refers to a live object.
    StaleHandle,
    #[cfg_attr(not(test), allow(dead_code))]
    QueryFailed(String),
    #[cfg_attr(not(test), allow(dead_code))]
    DefinitionUnreadable(String),
    /// The host raised while running the interaction.
    Fault(String),
}

impl HostError {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn definition_unreadable(message: impl Into<String>) -> Self {
        Self::DefinitionUnreadable(message.into())
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEntryPoint => write!(f, "object has no UsedBy entry point"),
            Self::SignatureMismatch => write!(f, "UsedBy rejected the argument shape"),
            Self::StaleHandle => write!(f, "object handle is no longer valid"),
            Self::QueryFailed(message) => write!(f, "world query failed: {}", message),
            Self::DefinitionUnreadable(message) => {
                write!(f, "definition could not be read: {}", message)
            }
            Self::Fault(message) => write!(f, "host fault: {}", message),
        }
    }
}

impl std::error::Error for HostError {}

/// Failures writing settings back to disk.
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "settings io error: {}", err),
            Self::Serialize(err) => write!(f, "settings serialization error: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::ser::Error> for SettingsError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialize(value)
    }
}
