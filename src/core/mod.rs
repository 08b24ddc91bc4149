//! Core station logic module

pub mod clock;
pub mod error;
pub mod station;
pub mod types;
