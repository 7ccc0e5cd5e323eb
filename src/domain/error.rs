//! Domain error types.

/// Failure modes of a quote source. Every variant is absorbed by the
/// resolver's fallback path and never surfaces past it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("no API credential configured")]
    Unconfigured,

    #[error("transport failure: {reason}")]
    Transport { reason: String },

    #[error("invalid quote response: {reason}")]
    InvalidResponse { reason: String },
}

/// Failure modes of the holding store. A storage failure aborts the
/// current sweep tick; the schedule itself continues.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Top-level error type for pricesweep.
#[derive(Debug, thiserror::Error)]
pub enum PricesweepError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid symbol: {reason}")]
    InvalidSymbol { reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PricesweepError> for std::process::ExitCode {
    fn from(err: &PricesweepError) -> Self {
        let code: u8 = match err {
            PricesweepError::Io(_) => 1,
            PricesweepError::ConfigParse { .. }
            | PricesweepError::ConfigMissing { .. }
            | PricesweepError::ConfigInvalid { .. } => 2,
            PricesweepError::Storage(_) => 3,
            PricesweepError::InvalidSymbol { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
