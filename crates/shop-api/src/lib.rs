//! HTTP surface for catalog search.

pub mod config;
pub mod server;
