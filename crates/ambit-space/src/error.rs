//! Error types for space construction.

use ambit_core::ConfigError;
use std::error::Error;
use std::fmt;

/// Errors arising from space construction.
///
/// Queries and placements never return this type; they fail soft with
/// `None`, `false` or an empty result.
#[derive(Clone, Debug, PartialEq)]
pub enum SpaceError {
    /// Construction parameters failed validation.
    Config(ConfigError),
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid space configuration: {e}"),
        }
    }
}

impl Error for SpaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SpaceError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
