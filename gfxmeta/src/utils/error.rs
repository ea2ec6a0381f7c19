use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration file '{file}': {source}")]
    ConfigParseError {
        source: toml::de::Error,
        file: String,
    },

    #[error("Failed to parse compile options: {0}")]
    CompOptionsParseError(#[source] toml::de::Error),

    #[error(
        "All {max} simple-push slots available to this shader are in use; buffer {cb_idx} cannot be pushed"
    )]
    PushSlotsExhausted { cb_idx: u32, max: usize },

    #[error(
        "Simple-push range [{offset}, {end}) of buffer {cb_idx} overlaps slot {slot} already pushed from the same buffer"
    )]
    OverlappingPushSlot {
        cb_idx: u32,
        offset: u32,
        end: u64,
        slot: usize,
    },

    #[error("The sub-compiler is unavailable: {0}")]
    SubCompilerUnavailable(String),

    #[error("Compile options passed to the sub-compiler contain an interior NUL byte")]
    InvalidCompileOptions,

    #[error("The sub-compiler failed with status code {status}")]
    SubCompilerFailed { status: i32 },

    #[error("The sub-compiler reported success but returned no compile result")]
    MissingCompileResult,
}

pub type MetaResult<T> = Result<T, MetaError>;
