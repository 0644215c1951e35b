use thiserror::Error;

#[derive(Error, Debug)]
pub enum RfmError {
    #[error("No rows were supplied")]
    EmptyInput,

    #[error("None of the {rows_total} rows matched the selected segments and lookback window")]
    NoMatchingRecords { rows_total: usize },

    #[error("Invalid analysis parameters: {reason}")]
    ParameterValidation { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No stored report for analysis '{analysis_id}'")]
    SnapshotNotFound { analysis_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RfmError {
    /// True for the terminal validation failures a caller should surface
    /// to the user and allow resubmission for.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::NoMatchingRecords { .. } | Self::ParameterValidation { .. }
        )
    }
}

pub type RfmResult<T> = Result<T, RfmError>;
