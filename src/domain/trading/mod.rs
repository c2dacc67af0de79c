// Core value records of the session pipeline
pub mod types;
