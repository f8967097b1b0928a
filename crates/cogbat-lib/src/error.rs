use thiserror::Error;

/// Why a single log file could not be turned into task data.
///
/// All variants are recoverable at file granularity: the batch driver logs
/// them and moves on to the next file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("bad file name {name}: {reason}")]
    BadFileName { name: String, reason: String },

    #[error("unrecognized task name: {0} (expected task1 .. task6)")]
    TaskName(String),

    #[error("line {line} of unexpected format, expected a blank first column: {content}")]
    BadLine { line: usize, content: String },

    #[error("reading log rows: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub(crate) fn bad_file_name(name: &str, reason: impl Into<String>) -> Self {
        ParseError::BadFileName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
