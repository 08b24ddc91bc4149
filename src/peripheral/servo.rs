//! Hobby servo driver (SG90 and compatible 50 Hz servos)

use tracing::debug;

use crate::core::error::ServoError;

pub const DEFAULT_MIN_PULSE_US: u32 = 500;
pub const DEFAULT_MAX_PULSE_US: u32 = 2400;
pub const DEFAULT_FREQUENCY_HZ: u32 = 50;

const MAX_ANGLE: f64 = 180.0;

/// PWM output that takes its duty as an absolute pulse width
pub trait PwmChannel {
    fn set_frequency(&mut self, hz: u32) -> Result<(), ServoError>;

    fn set_duty_ns(&mut self, duty_ns: u32) -> Result<(), ServoError>;

    /// Stop the output and release the channel
    fn deinit(&mut self) -> Result<(), ServoError>;
}

pub struct Servo<P: PwmChannel> {
    pwm: P,
    min_us: u32,
    max_us: u32,
}

impl<P: PwmChannel> Servo<P> {
    /// Servo with the default 500..2400 µs range at 50 Hz
    pub fn new(pwm: P) -> Result<Self, ServoError> {
        Self::with_range(pwm, DEFAULT_MIN_PULSE_US, DEFAULT_MAX_PULSE_US, DEFAULT_FREQUENCY_HZ)
    }

    pub fn with_range(
        mut pwm: P,
        min_us: u32,
        max_us: u32,
        frequency_hz: u32,
    ) -> Result<Self, ServoError> {
        pwm.set_frequency(frequency_hz)?;
        Ok(Self {
            pwm,
            min_us,
            max_us,
        })
    }

    /// Pulse width in µs for an angle, clamped to 0..=180 degrees
    pub fn pulse_width_us(&self, degrees: f64) -> f64 {
        let degrees = if degrees.is_nan() {
            0.0
        } else {
            degrees.clamp(0.0, MAX_ANGLE)
        };
        let (min, max) = (f64::from(self.min_us), f64::from(self.max_us));
        min + (max - min) * (degrees / MAX_ANGLE)
    }

    /// Move to `degrees`; the duty is the pulse width in ns, truncated
    pub fn write(&mut self, degrees: f64) -> Result<(), ServoError> {
        let duty_ns = (self.pulse_width_us(degrees) * 1000.0) as u32;
        debug!(degrees, duty_ns, "Servo move");
        self.pwm.set_duty_ns(duty_ns)
    }

    pub fn deinit(mut self) -> Result<P, ServoError> {
        self.pwm.deinit()?;
        Ok(self.pwm)
    }
}
