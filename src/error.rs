use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Which raw geometry sequence a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texture coordinate",
            Attribute::Normal => "normal",
        })
    }
}

/// Coarse classification of an [`Error`], looking through nested material failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    IndexOutOfRange,
    ResourceUnavailable,
    InvalidState,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}:{line}: {message}: \"{text}\"", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        text: String,
        message: String,
    },
    /// `index` is 0-based.
    #[error("{attribute} index {index} out of range (0..{len})")]
    IndexOutOfRange {
        attribute: Attribute,
        index: usize,
        len: usize,
    },
    #[error("resource unavailable: {}: {reason}", .path.display())]
    ResourceUnavailable { path: PathBuf, reason: String },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("{}:{line}: the referenced material library cannot be loaded", .path.display())]
    Material {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<Error>,
    },
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse { .. } => ErrorKind::Parse,
            Error::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Error::ResourceUnavailable { .. } => ErrorKind::ResourceUnavailable,
            Error::InvalidState(_) => ErrorKind::InvalidState,
            Error::Material { source, .. } => source.kind(),
            Error::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::ResourceUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
