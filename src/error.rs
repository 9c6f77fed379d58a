use std::fmt;
use std::io;

/// Errors raised while loading or validating a [`Config`](crate::Config).
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io(io::Error),

    /// Config file is not valid JSON for the config schema
    Parse(serde_json::Error),

    /// Values parsed fine but describe an unplayable field
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(error: io::Error) -> Self {
        ConfigError::Io(error)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error)
    }
}

/// Errors raised while decoding a bird sprite pixel-map.
#[derive(Debug)]
pub enum SpriteError {
    Io(io::Error),

    /// No pixel rows at all
    Empty,

    /// A row has a different width than the first one
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Character with no palette entry
    UnknownPixel { row: usize, col: usize, ch: char },
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpriteError::Io(e) => write!(f, "Failed to read sprite: {}", e),
            SpriteError::Empty => write!(f, "Sprite has no pixels"),
            SpriteError::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "Sprite row {} is {} pixels wide (expected {})",
                row, found, expected
            ),
            SpriteError::UnknownPixel { row, col, ch } => {
                write!(f, "Unknown sprite pixel {:?} at row {}, col {}", ch, row, col)
            }
        }
    }
}

impl std::error::Error for SpriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpriteError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SpriteError {
    fn from(error: io::Error) -> Self {
        SpriteError::Io(error)
    }
}
