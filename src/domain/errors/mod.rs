// Domain errors - Error taxonomy for media operations

use thiserror::Error;

/// Message used when the input path has no usable extension
pub const INCORRECT_INPUT_PATH: &str = "Incorrect input path";
/// Message used when an explicit output path was rejected
pub const INCORRECT_OUTPUT_PATH: &str = "Incorrect output path";
/// Message used when the cache allocator could not provide an output path
pub const ERROR_OCCUR_WHILE_GENERATING_OUTPUT_FILE: &str =
    "An error occurred while generating the output file";

/// Which trim boundary overran the probed duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimBound {
    From,
    To,
}

impl TrimBound {
    /// Option name carrying this boundary
    pub fn option_name(&self) -> &'static str {
        match self {
            TrimBound::From => "from",
            TrimBound::To => "to",
        }
    }
}

/// Flat discriminant of [`MediaError`], handy for assertions and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputPath,
    Options,
    OutputPath,
    OutputAllocation,
    DurationBounds,
    Probe,
    Execution,
    Precondition,
    Config,
    Io,
}

/// Errors surfaced by every media operation
#[derive(Error, Debug)]
pub enum MediaError {
    /// Source path is empty or has no resolvable extension
    #[error("{}", INCORRECT_INPUT_PATH)]
    InputPath,

    /// Unrecognized, missing or mistyped option
    #[error("{message}")]
    Options { key: String, message: String },

    /// Explicit output path rejected
    #[error("{}", INCORRECT_OUTPUT_PATH)]
    OutputPath,

    /// Cache allocator failed, returned nothing, or allocation is disabled
    #[error("{}", ERROR_OCCUR_WHILE_GENERATING_OUTPUT_FILE)]
    OutputAllocation,

    /// `from` or `to` is past the end of the media
    #[error(
        "The option \"{}\" can not be greater than the total time of the media \
         ({requested_ms} ms > {duration_ms} ms)",
        .bound.option_name()
    )]
    DurationBounds {
        bound: TrimBound,
        requested_ms: u64,
        duration_ms: u64,
    },

    /// Metadata query failed
    #[error("Failed to probe media file: {0}")]
    Probe(String),

    /// Processing command failed or returned non-zero
    #[error("Command execution failed with return code {return_code}: {message}")]
    Execution { return_code: i32, message: String },

    /// Caller broke a call precondition
    #[error("{0}")]
    Precondition(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Build an options error for `key`
    pub fn options(key: impl Into<String>, message: impl Into<String>) -> Self {
        MediaError::Options {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Build an execution error for a failed dispatch
    pub fn execution(return_code: i32, message: impl Into<String>) -> Self {
        MediaError::Execution {
            return_code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::InputPath => ErrorKind::InputPath,
            MediaError::Options { .. } => ErrorKind::Options,
            MediaError::OutputPath => ErrorKind::OutputPath,
            MediaError::OutputAllocation => ErrorKind::OutputAllocation,
            MediaError::DurationBounds { .. } => ErrorKind::DurationBounds,
            MediaError::Probe(_) => ErrorKind::Probe,
            MediaError::Execution { .. } => ErrorKind::Execution,
            MediaError::Precondition(_) => ErrorKind::Precondition,
            MediaError::Config(_) => ErrorKind::Config,
            MediaError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type alias for media operations
pub type MediaResult<T> = std::result::Result<T, MediaError>;
