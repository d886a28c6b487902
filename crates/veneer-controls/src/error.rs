//! Error types surfaced by controls.

/// A text could not be turned into a value by a [`ParseableFormat`](crate::format::ParseableFormat).
///
/// Text fields never return this to their caller; they keep the raw input
/// for further editing and publish the error through the environment under
/// [`TextFieldParseError`](crate::text_field::TextFieldParseError).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input was empty but the format requires a value.
    #[error("a value is required")]
    Empty,
    /// The input did not match the expected shape.
    #[error("{input:?} is not a valid {expected}")]
    Invalid {
        /// The raw input that failed to parse.
        input: String,
        /// Short description of what the format accepts.
        expected: &'static str,
    },
    /// A format-specific failure.
    #[error("{0}")]
    Custom(String),
}

/// Errors from starting an async button run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The button was triggered outside a tokio runtime.
    #[error("async button triggered outside a tokio runtime")]
    NoRuntime,
}
