pub mod breakout;

pub use breakout::BreakoutScanner;
