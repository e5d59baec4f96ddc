use std::fmt;

use thiserror::Error;

/// What a failed fetch was asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    List { limit: u32, offset: u32 },
    Id(u32),
    Name(String),
    Species(u32),
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchTarget::List { limit, offset } => {
                write!(f, "pokemon list (limit {}, offset {})", limit, offset)
            }
            FetchTarget::Id(id) => write!(f, "pokemon with id {}", id),
            FetchTarget::Name(name) => write!(f, "pokemon with name {}", name),
            FetchTarget::Species(id) => write!(f, "pokemon species with id {}", id),
        }
    }
}

#[derive(Error, Debug)]
pub enum DexError {
    #[error("Failed to fetch {target}: {reason}")]
    Fetch { target: FetchTarget, reason: String },

    #[error("Invalid location '{0}'")]
    Location(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DexError {
    pub fn fetch(target: FetchTarget, reason: impl Into<String>) -> Self {
        DexError::Fetch {
            target,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DexError>;
