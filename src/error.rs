/// Failures the game can surface.  All of them are fatal: the simulation
/// itself has no recoverable error paths.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GameError {
    /// A sprite asset could not be resolved.
    ResourceLoadFailure { name: String },

    /// The terminal surface could not be set up.
    PlatformInitFailure { reason: String },

    /// A configuration file exists but is unreadable or malformed.
    Config { path: PathBuf, reason: String },

    /// Terminal I/O failed mid-session.
    Io(std::io::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::ResourceLoadFailure { name } => {
                write!(f, "could not load resource '{name}'")
            }
            GameError::PlatformInitFailure { reason } => {
                write!(f, "platform init failed: {reason}")
            }
            GameError::Config { path, reason } => {
                write!(f, "bad config {}: {reason}", path.display())
            }
            GameError::Io(e) => write!(f, "terminal I/O error: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Io(e)
    }
}

impl GameError {
    pub fn platform(reason: impl fmt::Display) -> Self {
        GameError::PlatformInitFailure { reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
