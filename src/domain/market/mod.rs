// Market clock and candle width
pub mod session;
pub mod timeframe;
