//! Station Panel
//!
//! Joins a Wi-Fi network in station mode and serves a one-page HTTP control
//! panel for the onboard LED. Also carries drivers for a BH1750 light sensor
//! and a 50 Hz hobby servo.

pub mod backend;
pub mod config;
pub mod core;
pub mod peripheral;
pub mod transport;

pub use crate::core::{
    error::{HttpError, LedError, SensorError, ServoError, WifiError},
    station::{ConnectOptions, StationController},
    types::{AccessPoint, NetInfo, SecurityKind, StationState},
};
