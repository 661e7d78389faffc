use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no `tree` declaration found")]
    NoTree,

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
