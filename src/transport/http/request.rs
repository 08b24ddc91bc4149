//! Request-line parsing

use crate::core::error::{HttpError, HttpResult};

/// Path used when the request line carries no target
pub const DEFAULT_PATH: &str = "/";

/// Extract the request target from the first line of a raw request
///
/// The method is not validated. A line with fewer than two tokens maps to
/// [`DEFAULT_PATH`].
pub fn request_path(raw: &[u8]) -> HttpResult<String> {
    let first_line = match raw.windows(2).position(|w| w == b"\r\n") {
        Some(end) => &raw[..end],
        None => raw,
    };

    let target = first_line
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .nth(1);

    match target {
        Some(bytes) => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| HttpError::InvalidRequest(format!("path is not UTF-8: {}", e))),
        None => Ok(DEFAULT_PATH.to_string()),
    }
}

/// Fixed routes of the control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    LedOn,
    LedOff,
    Favicon,
    Page,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path {
            "/on" => Route::LedOn,
            "/off" => Route::LedOff,
            "/favicon.ico" => Route::Favicon,
            _ => Route::Page,
        }
    }
}
