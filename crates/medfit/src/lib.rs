//! Labeling, fit scoring and thinking-pattern diagnosis for a table of
//! medical-adjacent companies.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
