//! Onboard LED controller

use embedded_hal::digital::StatefulOutputPin;
use tracing::debug;

use crate::core::error::LedError;

/// Owns the LED output pin
///
/// The pin is driven low on construction so the panel starts in a known state.
pub struct LedController<P: StatefulOutputPin> {
    pin: P,
}

impl<P: StatefulOutputPin> LedController<P> {
    pub fn new(mut pin: P) -> Result<Self, LedError> {
        pin.set_low().map_err(led_error)?;
        Ok(Self { pin })
    }

    pub fn on(&mut self) -> Result<(), LedError> {
        debug!("LED on");
        self.pin.set_high().map_err(led_error)
    }

    pub fn off(&mut self) -> Result<(), LedError> {
        debug!("LED off");
        self.pin.set_low().map_err(led_error)
    }

    pub fn is_on(&mut self) -> Result<bool, LedError> {
        self.pin.is_set_high().map_err(led_error)
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

fn led_error<E: embedded_hal::digital::Error>(e: E) -> LedError {
    LedError::Pin(format!("{:?}", e.kind()))
}
