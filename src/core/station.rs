//! Station controller: scan, connect and address bookkeeping

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    backend::WlanBackend,
    core::{
        clock::{Clock, TokioClock},
        error::{WifiError, WifiResult},
        types::{AccessPoint, NetInfo, PowerMode, StationState},
    },
};

/// Default association timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Interval between link status polls while associating
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Options for [`StationController::connect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    pub timeout: Duration,
    /// Require the SSID to be present in the last scan
    pub precheck: bool,
    /// Scan first when prechecking against an empty cache
    pub auto_scan: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CONNECT_TIMEOUT,
            precheck: false,
            auto_scan: true,
        }
    }
}

impl ConnectOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }
}

/// Owner of the wireless interface in station mode
///
/// Holds the last scan and the address configuration of the current
/// association. `net_info` is set exactly when the state is `Connected`.
pub struct StationController<B: WlanBackend, C: Clock = TokioClock> {
    backend: B,
    clock: C,
    state: StationState,
    last_scan: Vec<AccessPoint>,
}

impl<B: WlanBackend> StationController<B> {
    /// Create a controller driven by the tokio timer
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, TokioClock)
    }
}

impl<B: WlanBackend, C: Clock> StationController<B, C> {
    /// Create a controller with an explicit time source
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self {
            backend,
            clock,
            state: StationState::NotConnected,
            last_scan: Vec::new(),
        }
    }

    /// Apply a power management mode
    ///
    /// Failure does not affect the controller; the error is handed back so
    /// the caller can report it.
    pub async fn set_power_mode(&self, mode: PowerMode) -> Option<WifiError> {
        match self.backend.set_power_mode(mode).await {
            Ok(()) => {
                debug!(?mode, "Power mode applied");
                None
            }
            Err(e) => {
                warn!(?mode, "Failed to apply power mode: {}", e);
                Some(e)
            }
        }
    }

    pub fn state(&self) -> &StationState {
        &self.state
    }

    /// SSID of the current association
    pub fn ssid(&self) -> Option<&str> {
        match &self.state {
            StationState::Connected { ssid, .. } => Some(ssid),
            _ => None,
        }
    }

    /// Address configuration of the current association
    pub fn net_info(&self) -> Option<&NetInfo> {
        match &self.state {
            StationState::Connected { net_info, .. } => Some(net_info),
            _ => None,
        }
    }

    pub fn ip(&self) -> Option<&str> {
        self.net_info().map(|n| n.address.as_str())
    }

    pub fn gateway(&self) -> Option<&str> {
        self.net_info().map(|n| n.gateway.as_str())
    }

    /// Result of the most recent scan
    pub fn last_scan(&self) -> &[AccessPoint] {
        &self.last_scan
    }

    /// Whether the interface reports an established link
    pub async fn is_connected(&self) -> WifiResult<bool> {
        self.backend.is_connected().await
    }

    /// Scan for networks and replace the cached results
    ///
    /// With `sort_by_signal` the entries are ordered strongest first; entries
    /// with equal signal keep the driver's order.
    pub async fn scan(&mut self, sort_by_signal: bool) -> WifiResult<Vec<AccessPoint>> {
        let raw = self
            .backend
            .scan()
            .await
            .map_err(|e| WifiError::Scan(e.to_string()))?;

        let mut access_points: Vec<AccessPoint> = raw.into_iter().map(AccessPoint::from).collect();
        if sort_by_signal {
            access_points.sort_by(|a, b| b.signal_strength.cmp(&a.signal_strength));
        }

        debug!("Scan complete, found {} networks", access_points.len());
        self.last_scan = access_points.clone();
        Ok(access_points)
    }

    /// Look up an SSID in the last scan without scanning
    pub fn find(&self, ssid: &str) -> Option<&AccessPoint> {
        self.last_scan.iter().find(|ap| ap.ssid == ssid)
    }

    /// Associate with `ssid` and wait for the link to come up
    pub async fn connect(
        &mut self,
        ssid: &str,
        password: &str,
        options: ConnectOptions,
    ) -> WifiResult<NetInfo> {
        if options.precheck {
            if self.last_scan.is_empty() && options.auto_scan {
                self.scan(true).await?;
            }
            if self.find(ssid).is_none() {
                return Err(WifiError::Connect(format!(
                    "SSID not found in scan results: {}",
                    ssid
                )));
            }
        }

        if let Err(e) = self.backend.disconnect().await {
            debug!("Ignoring disconnect error before connect: {}", e);
        }
        self.state = StationState::Connecting;

        info!("Connecting to '{}'", ssid);
        if let Err(e) = self.backend.connect(ssid, password).await {
            self.state = StationState::NotConnected;
            return Err(e);
        }

        if let Err(e) = self.wait_for_link(ssid, options.timeout).await {
            self.state = StationState::NotConnected;
            return Err(e);
        }

        let net_info = match self.backend.ifconfig().await {
            Ok(net_info) => net_info,
            Err(e) => {
                self.state = StationState::NotConnected;
                return Err(e);
            }
        };

        info!("Connected to '{}': {}", ssid, net_info);
        self.state = StationState::Connected {
            ssid: ssid.to_string(),
            net_info: net_info.clone(),
        };
        Ok(net_info)
    }

    async fn wait_for_link(&self, ssid: &str, timeout: Duration) -> WifiResult<()> {
        let start = self.clock.now();

        while !self.link_up().await {
            if self.clock.now().duration_since(start) > timeout {
                let status = self
                    .backend
                    .status()
                    .await
                    .map(|s| s.to_string())
                    .unwrap_or_else(|e| format!("unknown ({})", e));
                return Err(WifiError::Connect(format!(
                    "connect timeout: ssid={}, status={}",
                    ssid, status
                )));
            }
            self.clock.sleep(POLL_INTERVAL).await;
        }

        Ok(())
    }

    /// A failed status query counts as no link yet
    async fn link_up(&self) -> bool {
        match self.backend.is_connected().await {
            Ok(connected) => connected,
            Err(e) => {
                debug!("Link status query failed: {}", e);
                false
            }
        }
    }

    /// Reuse the current association if it matches `ssid`, else connect
    pub async fn ensure_connected(
        &mut self,
        ssid: &str,
        password: &str,
        timeout: Duration,
    ) -> WifiResult<NetInfo> {
        if self.ssid() == Some(ssid) && self.link_up().await {
            if let Some(net_info) = self.net_info() {
                debug!("Already connected to '{}'", ssid);
                return Ok(net_info.clone());
            }
        }

        self.connect(ssid, password, ConnectOptions::with_timeout(timeout))
            .await
    }

    /// Tear down the association
    ///
    /// Controller state is always cleared. A failing teardown is not an
    /// error; it is returned for the caller to log.
    pub async fn disconnect(&mut self) -> Option<WifiError> {
        let result = self.backend.disconnect().await;
        self.state = StationState::NotConnected;

        match result {
            Ok(()) => {
                info!("Disconnected");
                None
            }
            Err(e) => {
                warn!("Disconnect failed: {}", e);
                Some(e)
            }
        }
    }
}
