//! Control panel page template

use std::path::Path;

use crate::core::error::HttpResult;

pub const IP_PLACEHOLDER: &str = "__IP__";
pub const LED_PLACEHOLDER: &str = "__LED__";

const BUILTIN_PAGE: &str = include_str!("../../../assets/index.html");

/// Page source with `__IP__` and `__LED__` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    source: String,
}

impl PageTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The page compiled into the binary
    pub fn builtin() -> Self {
        Self::new(BUILTIN_PAGE)
    }

    pub async fn load(path: impl AsRef<Path>) -> HttpResult<Self> {
        Ok(Self::new(tokio::fs::read_to_string(path).await?))
    }

    /// Substitute the placeholders verbatim, without escaping
    pub fn render(&self, ip: &str, led_on: bool) -> String {
        self.source
            .replace(IP_PLACEHOLDER, ip)
            .replace(LED_PLACEHOLDER, if led_on { "ON" } else { "OFF" })
    }
}
