pub mod core;
pub mod factory;
pub mod mock;
pub mod nse;
