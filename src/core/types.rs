//! Domain types for the Wi-Fi station

use std::fmt;

use serde::{Deserialize, Serialize};

/// SSID reported for networks that do not broadcast a name
pub const HIDDEN_SSID: &str = "<hidden-ssid>";

/// Security scheme advertised by an access point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityKind {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
    Unknown(u8),
}

impl From<u8> for SecurityKind {
    fn from(code: u8) -> Self {
        match code {
            0 => SecurityKind::Open,
            1 => SecurityKind::Wep,
            2 => SecurityKind::WpaPsk,
            3 => SecurityKind::Wpa2Psk,
            4 => SecurityKind::WpaWpa2Psk,
            other => SecurityKind::Unknown(other),
        }
    }
}

impl From<SecurityKind> for u8 {
    fn from(kind: SecurityKind) -> Self {
        match kind {
            SecurityKind::Open => 0,
            SecurityKind::Wep => 1,
            SecurityKind::WpaPsk => 2,
            SecurityKind::Wpa2Psk => 3,
            SecurityKind::WpaWpa2Psk => 4,
            SecurityKind::Unknown(code) => code,
        }
    }
}

impl fmt::Display for SecurityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityKind::Open => write!(f, "OPEN"),
            SecurityKind::Wep => write!(f, "WEP"),
            SecurityKind::WpaPsk => write!(f, "WPA-PSK"),
            SecurityKind::Wpa2Psk => write!(f, "WPA2-PSK"),
            SecurityKind::WpaWpa2Psk => write!(f, "WPA/WPA2-PSK"),
            SecurityKind::Unknown(code) => write!(f, "UNKNOWN({})", code),
        }
    }
}

/// One entry as delivered by the radio's scan call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScanEntry {
    /// SSID bytes, not necessarily valid UTF-8
    pub ssid: Vec<u8>,
    pub bssid: String,
    pub channel: u16,
    pub rssi: i16,
    pub security: u8,
    pub hidden: bool,
}

/// A network discovered by a scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessPoint {
    pub ssid: String,
    pub channel: u16,
    /// Signal strength in dBm
    pub signal_strength: i16,
    pub security: SecurityKind,
}

impl From<RawScanEntry> for AccessPoint {
    fn from(raw: RawScanEntry) -> Self {
        let ssid = if raw.ssid.is_empty() {
            HIDDEN_SSID.to_string()
        } else {
            String::from_utf8_lossy(&raw.ssid).replace(char::REPLACEMENT_CHARACTER, "")
        };

        Self {
            ssid,
            channel: raw.channel,
            signal_strength: raw.rssi,
            security: SecurityKind::from(raw.security),
        }
    }
}

impl fmt::Display for AccessPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccessPoint(ssid={:?}, ch={}, rssi={}, sec={})",
            self.ssid, self.channel, self.signal_strength, self.security
        )
    }
}

/// Address configuration assigned after association (dotted quads)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetInfo {
    pub address: String,
    pub netmask: String,
    pub gateway: String,
    pub dns: String,
}

impl fmt::Display for NetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NetInfo(ip={}, gw={}, dns={})",
            self.address, self.gateway, self.dns
        )
    }
}

/// Link status reported by the radio while associating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub code: i32,
    pub name: String,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.name)
    }
}

/// Logical state of the station controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationState {
    NotConnected,
    Connecting,
    Connected { ssid: String, net_info: NetInfo },
}

/// Radio power management mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PowerMode {
    Performance,
    PowerSave,
}
