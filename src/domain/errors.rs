use thiserror::Error;

/// Terminal "no result for this run" conditions of the session pipeline.
///
/// Neither variant is fatal: the presentation layer shows an explicit
/// no-data state and the user may trigger another run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Market data unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error("Insufficient data: need {needed} candle(s), got {available}")]
    InsufficientData { needed: usize, available: usize },
}

impl PipelineError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        PipelineError::DataUnavailable {
            reason: reason.into(),
        }
    }
}
