//! Mock wireless interface for testing

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::WlanBackend;
use crate::core::error::{WifiError, WifiResult};
use crate::core::types::{LinkStatus, NetInfo, PowerMode, RawScanEntry};

/// Internal state for the mock backend
#[derive(Debug, Clone)]
struct MockState {
    scan_results: Vec<RawScanEntry>,
    should_fail_scan: bool,
    should_fail_disconnect: bool,
    should_fail_power_mode: bool,
    /// Number of `is_connected` polls answered `false` after a connect
    polls_until_connected: Option<usize>,
    remaining_polls: Option<usize>,
    /// Number of upcoming `is_connected` polls that fail outright
    failing_polls: usize,
    pending: bool,
    connected: bool,
    status_code: i32,
    net_info: NetInfo,
    connect_calls: Vec<String>,
    disconnect_calls: usize,
    power_mode: Option<PowerMode>,
}

/// Mock wireless interface for testing
///
/// Allows configuring behavior for tests without requiring actual hardware.
#[derive(Debug, Clone)]
pub struct MockWlanBackend {
    inner: Arc<Mutex<MockState>>,
}

impl MockWlanBackend {
    /// Create a new mock backend that associates on the first poll
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                scan_results: vec![],
                should_fail_scan: false,
                should_fail_disconnect: false,
                should_fail_power_mode: false,
                polls_until_connected: Some(0),
                remaining_polls: None,
                failing_polls: 0,
                pending: false,
                connected: false,
                status_code: 0,
                net_info: NetInfo {
                    address: "192.168.1.100".into(),
                    netmask: "255.255.255.0".into(),
                    gateway: "192.168.1.1".into(),
                    dns: "192.168.1.1".into(),
                },
                connect_calls: vec![],
                disconnect_calls: 0,
                power_mode: None,
            })),
        }
    }

    /// Configure mock to return specific entries on scan
    pub async fn set_scan_results(&self, entries: Vec<RawScanEntry>) {
        self.inner.lock().await.scan_results = entries;
    }

    /// Configure mock to fail scan operations
    pub async fn set_scan_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_scan = should_fail;
    }

    /// Configure mock to fail disconnect operations
    pub async fn set_disconnect_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_disconnect = should_fail;
    }

    /// Configure mock to fail power mode changes
    pub async fn set_power_mode_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_power_mode = should_fail;
    }

    /// Number of negative polls before the link comes up; `None` never connects
    pub async fn set_polls_until_connected(&self, polls: Option<usize>) {
        self.inner.lock().await.polls_until_connected = polls;
    }

    /// Fail the next `count` link status polls
    pub async fn set_failing_polls(&self, count: usize) {
        self.inner.lock().await.failing_polls = count;
    }

    /// Status code reported while not yet associated
    pub async fn set_status_code(&self, code: i32) {
        self.inner.lock().await.status_code = code;
    }

    /// Address configuration handed out on association
    pub async fn set_net_info(&self, net_info: NetInfo) {
        self.inner.lock().await.net_info = net_info;
    }

    /// Simulate the link dropping without the controller noticing
    pub async fn drop_link(&self) {
        self.inner.lock().await.connected = false;
    }

    /// SSIDs of every association request received
    pub async fn connect_calls(&self) -> Vec<String> {
        self.inner.lock().await.connect_calls.clone()
    }

    pub async fn disconnect_calls(&self) -> usize {
        self.inner.lock().await.disconnect_calls
    }

    pub async fn power_mode(&self) -> Option<PowerMode> {
        self.inner.lock().await.power_mode
    }
}

impl Default for MockWlanBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WlanBackend for MockWlanBackend {
    async fn scan(&self) -> WifiResult<Vec<RawScanEntry>> {
        let state = self.inner.lock().await;
        if state.should_fail_scan {
            Err(WifiError::Backend("Mock scan failure".into()))
        } else {
            Ok(state.scan_results.clone())
        }
    }

    async fn connect(&self, ssid: &str, _password: &str) -> WifiResult<()> {
        let mut state = self.inner.lock().await;
        state.connect_calls.push(ssid.to_string());
        state.connected = false;
        state.pending = true;
        state.remaining_polls = state.polls_until_connected;
        Ok(())
    }

    async fn disconnect(&self) -> WifiResult<()> {
        let mut state = self.inner.lock().await;
        state.disconnect_calls += 1;
        state.connected = false;
        state.pending = false;
        if state.should_fail_disconnect {
            Err(WifiError::Backend("Mock disconnect failure".into()))
        } else {
            Ok(())
        }
    }

    async fn is_connected(&self) -> WifiResult<bool> {
        let mut state = self.inner.lock().await;
        if state.failing_polls > 0 {
            state.failing_polls -= 1;
            return Err(WifiError::Backend("Mock status query failure".into()));
        }
        if state.connected || !state.pending {
            return Ok(state.connected);
        }
        match state.remaining_polls {
            Some(0) => {
                state.connected = true;
                state.pending = false;
                Ok(true)
            }
            Some(n) => {
                state.remaining_polls = Some(n - 1);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn status(&self) -> WifiResult<LinkStatus> {
        let state = self.inner.lock().await;
        Ok(if state.connected {
            LinkStatus {
                code: 3,
                name: "LINK_UP".into(),
            }
        } else {
            LinkStatus {
                code: state.status_code,
                name: "LINK_DOWN".into(),
            }
        })
    }

    async fn ifconfig(&self) -> WifiResult<NetInfo> {
        Ok(self.inner.lock().await.net_info.clone())
    }

    async fn set_power_mode(&self, mode: PowerMode) -> WifiResult<()> {
        let mut state = self.inner.lock().await;
        if state.should_fail_power_mode {
            Err(WifiError::Backend("Mock power mode failure".into()))
        } else {
            state.power_mode = Some(mode);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_scan() {
        let backend = MockWlanBackend::new();

        let results = backend.scan().await.unwrap();
        assert_eq!(results.len(), 0);

        backend
            .set_scan_results(vec![RawScanEntry {
                ssid: b"TestNetwork".to_vec(),
                bssid: "aa:bb:cc:dd:ee:ff".into(),
                channel: 6,
                rssi: -65,
                security: 3,
                hidden: false,
            }])
            .await;

        let results = backend.scan().await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].ssid, b"TestNetwork");
    }

    #[tokio::test]
    async fn test_mock_backend_scan_failure() {
        let backend = MockWlanBackend::new();
        backend.set_scan_failure(true).await;

        assert!(backend.scan().await.is_err());
    }

    #[tokio::test]
    async fn test_mock_backend_connects_after_polls() {
        let backend = MockWlanBackend::new();
        backend.set_polls_until_connected(Some(2)).await;

        backend.connect("MyNetwork", "secret").await.unwrap();

        assert!(!backend.is_connected().await.unwrap());
        assert!(!backend.is_connected().await.unwrap());
        assert!(backend.is_connected().await.unwrap());
        assert_eq!(backend.status().await.unwrap().code, 3);
    }

    #[tokio::test]
    async fn test_mock_backend_never_connects_without_request() {
        let backend = MockWlanBackend::new();
        assert!(!backend.is_connected().await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_backend_disconnect() {
        let backend = MockWlanBackend::new();
        backend.connect("MyNetwork", "secret").await.unwrap();
        assert!(backend.is_connected().await.unwrap());

        backend.disconnect().await.unwrap();

        assert!(!backend.is_connected().await.unwrap());
        assert_eq!(backend.disconnect_calls().await, 1);
    }
}
