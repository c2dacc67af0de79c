pub mod chart_panel;
pub mod metrics_card;
pub mod signal_table;
