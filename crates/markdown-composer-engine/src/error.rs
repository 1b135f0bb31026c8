use thiserror::Error;

/// Errors raised by [`LineComposer`](crate::LineComposer) operations.
///
/// Out-of-range indices are programming errors on the caller's side: check
/// [`line_count`](crate::LineComposer::line_count) before indexing.
#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("line index {index} out of range (line count {line_count})")]
    IndexOutOfRange { index: usize, line_count: usize },

    #[error("prefix length {prefix_len} invalid for line {line} of length {line_len}")]
    PrefixOutOfRange {
        line: usize,
        prefix_len: usize,
        line_len: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ComposerResult<T> = Result<T, ComposerError>;
