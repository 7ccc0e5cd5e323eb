//! Core domain types and the price refresh pipeline.

pub mod error;
pub mod estimator;
pub mod holding;
pub mod price;
pub mod refresh;
pub mod resolver;
pub mod settings;
pub mod symbol;
