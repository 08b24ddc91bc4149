//! Route dispatch for the control panel

use embedded_hal::digital::StatefulOutputPin;
use tracing::{debug, warn};

use crate::{
    core::error::HttpResult,
    peripheral::LedController,
    transport::http::{
        request::{Route, request_path},
        response::Response,
        template::PageTemplate,
    },
};

/// Turns raw request bytes into a response, driving the LED on the way
pub struct RequestHandler<P: StatefulOutputPin> {
    led: LedController<P>,
    template: PageTemplate,
    ip: String,
}

impl<P: StatefulOutputPin> RequestHandler<P> {
    /// `ip` is the address shown on the page
    pub fn new(led: LedController<P>, template: PageTemplate, ip: impl Into<String>) -> Self {
        Self {
            led,
            template,
            ip: ip.into(),
        }
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn led_mut(&mut self) -> &mut LedController<P> {
        &mut self.led
    }

    /// Dispatch a request; errors become a 500 response
    pub fn handle(&mut self, raw: &[u8]) -> Response {
        self.try_handle(raw).unwrap_or_else(|e| {
            warn!("Request failed: {}", e);
            Response::internal_error()
        })
    }

    /// Dispatch a request, surfacing handling errors
    pub fn try_handle(&mut self, raw: &[u8]) -> HttpResult<Response> {
        let path = request_path(raw)?;
        let route = Route::from_path(&path);
        debug!(%path, ?route, "Dispatching request");

        Ok(match route {
            Route::LedOn => {
                self.led.on()?;
                Response::redirect("/")
            }
            Route::LedOff => {
                self.led.off()?;
                Response::redirect("/")
            }
            Route::Favicon => Response::no_content(),
            Route::Page => {
                let led_on = self.led.is_on()?;
                Response::html(self.template.render(&self.ip, led_on))
            }
        })
    }
}
