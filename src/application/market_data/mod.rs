pub mod candle_aggregator;
pub mod level_extractor;
