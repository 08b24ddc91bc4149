//! Wireless interface trait definition

use trait_variant::make;

use crate::core::error::WifiResult;
use crate::core::types::{LinkStatus, NetInfo, PowerMode, RawScanEntry};

/// Abstraction over the station-mode wireless interface
///
/// The station controller is the only owner of an implementation; nothing
/// else in the program touches the radio directly.
#[make(Send)]
pub trait WlanBackend: Sync + 'static {
    /// Run a scan and return the raw entries in driver order
    async fn scan(&self) -> WifiResult<Vec<RawScanEntry>>;

    /// Issue an association request
    ///
    /// Returns as soon as the request is accepted; completion is observed
    /// through [`WlanBackend::is_connected`].
    async fn connect(&self, ssid: &str, password: &str) -> WifiResult<()>;

    /// Drop the current association
    async fn disconnect(&self) -> WifiResult<()>;

    /// Whether the link is up
    async fn is_connected(&self) -> WifiResult<bool>;

    /// Driver-specific link status
    async fn status(&self) -> WifiResult<LinkStatus>;

    /// Address configuration of the interface
    async fn ifconfig(&self) -> WifiResult<NetInfo>;

    /// Change radio power management
    async fn set_power_mode(&self, mode: PowerMode) -> WifiResult<()>;
}
