//! Port traits: the seams between the domain and the outside world.

pub mod config_port;
pub mod holding_store;
pub mod price_source;
