//! Error types for the documentation pipeline.

use std::path::PathBuf;

/// The front end could not produce a usable translation unit.
///
/// Fatal for the file it concerns: no partial entity tree is emitted.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("{}:{line}:{column}: syntax error", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("malformed cursor dump {}: {source}", path.display())]
    Dump {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {message}", path.display())]
    FrontEnd { path: PathBuf, message: String },
}

/// A cursor or comment reported a kind outside the enumerated set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownKind {
    #[error("unknown cursor kind code {0}")]
    Code(u32),

    #[error("unknown declaration kind `{0}`")]
    Name(String),
}
