//! Error types for the station panel

use thiserror::Error;

/// Result type for Wi-Fi operations
pub type WifiResult<T> = Result<T, WifiError>;

/// Result type for HTTP request handling
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors related to the wireless station
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WifiError {
    /// The hardware scan call failed
    #[error("scan failed: {0}")]
    Scan(String),

    /// Target SSID missing from the last scan, or association timed out
    #[error("{0}")]
    Connect(String),

    /// The interface driver rejected a request
    #[error("wireless interface error: {0}")]
    Backend(String),
}

impl WifiError {
    pub fn is_scan(&self) -> bool {
        matches!(self, WifiError::Scan(_))
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, WifiError::Connect(_))
    }
}

/// Errors raised while serving a single HTTP request
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LED output error: {0}")]
    Led(#[from] LedError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors from the LED output pin
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedError {
    #[error("pin error: {0}")]
    Pin(String),
}

/// Errors from the ambient light sensor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    #[error("I2C bus error: {0}")]
    Bus(String),
}

/// Errors from the servo PWM channel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServoError {
    #[error("PWM error: {0}")]
    Pwm(String),
}
