//! Wireless interface abstraction layer

#[cfg(test)]
pub mod mock_backend;
pub mod wifi_backend;
pub mod wifi_ctrl_backend;

pub use wifi_backend::WlanBackend;
pub use wifi_ctrl_backend::WifiCtrlBackend;

#[cfg(test)]
pub use mock_backend::MockWlanBackend;
