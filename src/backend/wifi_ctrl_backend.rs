//! wpa_supplicant station backend using wifi-ctrl

use std::{collections::HashMap, path::PathBuf};

use tokio::{process::Command, sync::Mutex};
use tracing::{debug, error, warn};
use wifi_ctrl::sta::{RequestClient, WifiSetup};

use crate::{
    backend::WlanBackend,
    core::{
        error::{WifiError, WifiResult},
        types::{LinkStatus, NetInfo, PowerMode, RawScanEntry},
    },
};

const CTRL_SOCKET_DIR: &str = "/var/run/wpa_supplicant";
const RESOLV_CONF: &str = "/etc/resolv.conf";
const UNASSIGNED: &str = "0.0.0.0";

/// Station backend talking to wpa_supplicant's control socket
///
/// Address data comes from the `ip` tool and power management from `iw`.
/// Only the network block added by the last `connect` is kept configured.
pub struct WifiCtrlBackend {
    interface: String,
    client: RequestClient,
    network_id: Mutex<Option<usize>>,
}

impl WifiCtrlBackend {
    pub async fn new(interface: String) -> WifiResult<Self> {
        let path = PathBuf::from(CTRL_SOCKET_DIR).join(&interface);
        Self::with_socket_path(interface, path).await
    }

    /// Backend using a control socket outside the default directory
    pub async fn with_socket_path(
        interface: String,
        socket_path: impl Into<PathBuf>,
    ) -> WifiResult<Self> {
        let mut setup = WifiSetup::new().map_err(|e| WifiError::Backend(e.to_string()))?;
        setup.set_socket_path(socket_path);

        let client = setup.get_request_client();
        let station = setup.complete();

        tokio::spawn(async move {
            if let Err(e) = station.run().await {
                error!("wpa_supplicant station runtime error: {}", e);
            }
        });

        Ok(Self {
            interface,
            client,
            network_id: Mutex::new(None),
        })
    }

    /// Clamp a scan signal level into the RSSI range
    fn signal_to_rssi(signal: isize) -> i16 {
        signal.clamp(i16::MIN as isize, i16::MAX as isize) as i16
    }

    /// Convert a frequency in MHz to a channel number (0 if unknown)
    fn frequency_to_channel(freq_str: &str) -> u16 {
        match freq_str.parse::<u16>().unwrap_or(0) {
            2484 => 14,
            f @ 2412..=2472 => (f - 2407) / 5,
            f @ 5160..=5885 => (f - 5000) / 5,
            _ => 0,
        }
    }

    /// Map wpa_supplicant scan flags to a security code
    fn flags_to_security(flags: &str) -> u8 {
        let wpa = flags.contains("WPA-PSK");
        let wpa2 = flags.contains("WPA2-PSK") || flags.contains("RSN-PSK");
        match (wpa, wpa2) {
            (true, true) => 4,
            (false, true) => 3,
            (true, false) => 2,
            _ if flags.contains("WEP") => 1,
            _ if flags.contains("WPA") || flags.contains("RSN") || flags.contains("SAE") => 5,
            _ => 0,
        }
    }

    /// Link status derived from `wpa_state`
    fn link_status(wpa_state: &str) -> LinkStatus {
        let code = match wpa_state {
            "INTERFACE_DISABLED" => -1,
            "DISCONNECTED" | "INACTIVE" => 0,
            "SCANNING" => 1,
            "AUTHENTICATING" | "ASSOCIATING" => 2,
            "ASSOCIATED" | "4WAY_HANDSHAKE" | "GROUP_HANDSHAKE" => 3,
            "COMPLETED" => 4,
            _ => -2,
        };
        LinkStatus {
            code,
            name: wpa_state.to_string(),
        }
    }

    /// Parse `ip -4 addr show` output into (address, netmask)
    fn parse_inet(output: &str) -> Option<(String, String)> {
        let cidr = output
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with("inet "))?
            .split_whitespace()
            .nth(1)?;

        let (address, prefix) = cidr.split_once('/').unwrap_or((cidr, "32"));
        let prefix = prefix.parse::<u32>().ok()?.min(32);
        let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);

        Some((
            address.to_string(),
            std::net::Ipv4Addr::from(mask).to_string(),
        ))
    }

    /// Parse `ip -4 route show default` output into the gateway address
    fn parse_default_gateway(output: &str) -> Option<String> {
        output.lines().find_map(|line| {
            let mut parts = line.split_whitespace();
            while let Some(word) = parts.next() {
                if word == "via" {
                    return parts.next().map(str::to_string);
                }
            }
            None
        })
    }

    /// First IPv4 nameserver from a resolv.conf
    fn parse_nameserver(contents: &str) -> Option<String> {
        contents.lines().find_map(|line| {
            let rest = line.trim().strip_prefix("nameserver")?;
            let server = rest.trim();
            server
                .parse::<std::net::Ipv4Addr>()
                .ok()
                .map(|_| server.to_string())
        })
    }

    async fn run(&self, program: &str, args: &[&str]) -> WifiResult<String> {
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| WifiError::Backend(format!("Failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            return Err(WifiError::Backend(format!(
                "{} {} failed: {}",
                program,
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn wpa_status(&self) -> WifiResult<HashMap<String, String>> {
        let status = self
            .client
            .get_status()
            .await
            .map_err(|e| WifiError::Backend(format!("Failed to get status: {}", e)))?;
        Ok(status.into_iter().collect())
    }

    async fn request(&self, command: String) -> WifiResult<()> {
        debug!("wpa_supplicant request: {}", command);
        self.client
            .send_custom(command.clone())
            .await
            .map(|_| ())
            .map_err(|e| WifiError::Backend(format!("{} failed: {}", command, e)))
    }
}

impl WlanBackend for WifiCtrlBackend {
    async fn scan(&self) -> WifiResult<Vec<RawScanEntry>> {
        debug!("Starting scan on interface: {}", self.interface);

        let results = self
            .client
            .get_scan()
            .await
            .map_err(|e| WifiError::Backend(e.to_string()))?;

        Ok(results
            .iter()
            .map(|res| RawScanEntry {
                ssid: res.name.as_bytes().to_vec(),
                bssid: res.mac.clone(),
                channel: Self::frequency_to_channel(&res.frequency),
                rssi: Self::signal_to_rssi(res.signal),
                security: Self::flags_to_security(&res.flags),
                hidden: res.name.is_empty(),
            })
            .collect())
    }

    async fn connect(&self, ssid: &str, password: &str) -> WifiResult<()> {
        let mut configured = self.network_id.lock().await;
        if let Some(stale) = configured.take() {
            if let Err(e) = self.client.remove_network(stale).await {
                warn!("Failed to remove network {}: {}", stale, e);
            }
        }

        let network_id = self
            .client
            .add_network()
            .await
            .map_err(|e| WifiError::Backend(format!("Failed to add network: {}", e)))?;
        *configured = Some(network_id);

        self.client
            .set_network_ssid(network_id, ssid.to_string())
            .await
            .map_err(|e| WifiError::Backend(format!("Failed to set SSID: {}", e)))?;

        if password.is_empty() {
            self.request(format!("SET_NETWORK {} key_mgmt NONE", network_id))
                .await?;
        } else {
            self.client
                .set_network_psk(network_id, password.to_string())
                .await
                .map_err(|e| WifiError::Backend(format!("Failed to set PSK: {}", e)))?;
        }

        self.client
            .select_network(network_id)
            .await
            .map_err(|e| WifiError::Backend(format!("Failed to select network: {}", e)))?;

        debug!("Association requested for '{}'", ssid);
        Ok(())
    }

    async fn disconnect(&self) -> WifiResult<()> {
        self.request("DISCONNECT".to_string()).await
    }

    async fn is_connected(&self) -> WifiResult<bool> {
        let status = self.wpa_status().await?;
        Ok(status.get("wpa_state").map(String::as_str) == Some("COMPLETED"))
    }

    async fn status(&self) -> WifiResult<LinkStatus> {
        let status = self.wpa_status().await?;
        let wpa_state = status
            .get("wpa_state")
            .map(String::as_str)
            .unwrap_or("UNKNOWN");
        Ok(Self::link_status(wpa_state))
    }

    async fn ifconfig(&self) -> WifiResult<NetInfo> {
        let addr = self
            .run("ip", &["-4", "addr", "show", "dev", &self.interface])
            .await?;
        let (address, netmask) = Self::parse_inet(&addr).ok_or_else(|| {
            WifiError::Backend(format!("No IPv4 address on {}", self.interface))
        })?;

        let routes = self
            .run("ip", &["-4", "route", "show", "default", "dev", &self.interface])
            .await?;
        let gateway =
            Self::parse_default_gateway(&routes).unwrap_or_else(|| UNASSIGNED.to_string());

        let dns = tokio::fs::read_to_string(RESOLV_CONF)
            .await
            .ok()
            .and_then(|contents| Self::parse_nameserver(&contents))
            .unwrap_or_else(|| UNASSIGNED.to_string());

        Ok(NetInfo {
            address,
            netmask,
            gateway,
            dns,
        })
    }

    async fn set_power_mode(&self, mode: PowerMode) -> WifiResult<()> {
        let setting = match mode {
            PowerMode::Performance => "off",
            PowerMode::PowerSave => "on",
        };
        self.run(
            "iw",
            &["dev", &self.interface, "set", "power_save", setting],
        )
        .await
        .map(|_| ())
    }
}
