use crate::domain::trading::types::{RawPoint, VolatilityReading};
use async_trait::async_trait;

/// Tagged result of a data-source call.
///
/// Adapters never surface transport errors to the pipeline; they log the
/// cause and hand back `Unavailable` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Available(T),
    Unavailable(String),
}

impl<T> FetchOutcome<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        FetchOutcome::Unavailable(reason.into())
    }

    pub fn is_available(&self) -> bool {
        matches!(self, FetchOutcome::Available(_))
    }
}

impl<T> From<anyhow::Result<T>> for FetchOutcome<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => FetchOutcome::Available(value),
            Err(e) => FetchOutcome::Unavailable(format!("{:#}", e)),
        }
    }
}

#[async_trait]
pub trait IndexDataSource: Send + Sync {
    /// Intraday samples of the tracked index, ascending by timestamp.
    async fn fetch_spot_series(&self) -> FetchOutcome<Vec<RawPoint>>;

    /// Latest volatility index reading with the previous session close.
    async fn fetch_volatility(&self) -> FetchOutcome<VolatilityReading>;

    fn name(&self) -> &str;
}
