//! Line-oriented text reading and writing
//!
//! [`LineReader`] splits input on `\n` (dropping a trailing `\r`) and refuses
//! lines above a byte limit. [`LineWriter`] buffers output and flushes after
//! every call.

mod reader;
mod writer;

pub use reader::{DEFAULT_MAX_LINE_BYTES, LineReader, read_file_lines};
pub use writer::{LineWriter, write_file_lines};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinesError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Line {line} exceeds the {limit} byte limit")]
    LineTooLong { line: usize, limit: usize },

    #[error("Line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },
}

pub type Result<T> = std::result::Result<T, LinesError>;
