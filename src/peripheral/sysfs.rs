//! Linux sysfs implementations of the LED pin and PWM channel

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, StatefulOutputPin};
use tracing::warn;

use crate::{core::error::ServoError, peripheral::servo::PwmChannel};

const LEDS_ROOT: &str = "/sys/class/leds";
const PWM_ROOT: &str = "/sys/class/pwm";

/// LED exposed through `/sys/class/leds/<name>/brightness`
#[derive(Debug, Clone)]
pub struct SysfsLed {
    brightness: PathBuf,
}

impl SysfsLed {
    pub fn new(name: &str) -> Self {
        Self::at(Path::new(LEDS_ROOT).join(name))
    }

    /// LED rooted at an explicit class directory
    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self {
            brightness: dir.as_ref().join("brightness"),
        }
    }

    fn write(&self, value: &str) -> Result<(), ErrorKind> {
        fs::write(&self.brightness, value).map_err(|e| {
            warn!("Failed to write {}: {}", self.brightness.display(), e);
            ErrorKind::Other
        })
    }
}

impl ErrorType for SysfsLed {
    type Error = ErrorKind;
}

impl OutputPin for SysfsLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write("0")
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write("1")
    }
}

impl StatefulOutputPin for SysfsLed {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        let value = fs::read_to_string(&self.brightness).map_err(|_| ErrorKind::Other)?;
        Ok(value.trim().parse::<u32>().map_err(|_| ErrorKind::Other)? > 0)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|high| !high)
    }
}

/// PWM output exposed through `/sys/class/pwm/pwmchipN/pwmM`
///
/// The channel must already be exported.
#[derive(Debug, Clone)]
pub struct SysfsPwm {
    dir: PathBuf,
}

impl SysfsPwm {
    pub fn new(chip: u32, channel: u32) -> Self {
        Self::at(
            Path::new(PWM_ROOT)
                .join(format!("pwmchip{}", chip))
                .join(format!("pwm{}", channel)),
        )
    }

    pub fn at(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn write(&self, attribute: &str, value: u64) -> Result<(), ServoError> {
        let path = self.dir.join(attribute);
        fs::write(&path, value.to_string())
            .map_err(|e: io::Error| ServoError::Pwm(format!("{}: {}", path.display(), e)))
    }
}

impl PwmChannel for SysfsPwm {
    fn set_frequency(&mut self, hz: u32) -> Result<(), ServoError> {
        if hz == 0 {
            return Err(ServoError::Pwm("frequency must be non-zero".into()));
        }
        self.write("period", 1_000_000_000 / hz as u64)?;
        self.write("enable", 1)
    }

    fn set_duty_ns(&mut self, duty_ns: u32) -> Result<(), ServoError> {
        self.write("duty_cycle", duty_ns as u64)
    }

    fn deinit(&mut self) -> Result<(), ServoError> {
        self.write("enable", 0)
    }
}
