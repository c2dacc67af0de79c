// Market data processing
pub mod market_data;

// Signal generation
pub mod strategies;

// Fetch → scan orchestration
pub mod pipeline;
pub mod system;
