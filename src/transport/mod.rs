//! Network-facing surfaces

pub mod http;
