//! Board peripherals: LED, light sensor and servo

pub mod bh1750;
pub mod led;
pub mod servo;
pub mod sysfs;

pub use bh1750::Bh1750;
pub use led::LedController;
pub use servo::{PwmChannel, Servo};
pub use sysfs::{SysfsLed, SysfsPwm};
