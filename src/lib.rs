//! pricesweep — personal portfolio tracker with a resilient price sweep.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`]. The heart of the
//! crate is the refresh pipeline: a fixed-period sweep that fetches a live
//! quote per holding and, when the quote API fails, substitutes a locally
//! simulated price drifted from the last known value.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
