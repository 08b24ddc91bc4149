//! Plain HTTP control panel
//!
//! One connection is read, answered and closed before the next is accepted.

pub mod handler;
pub mod request;
pub mod response;
pub mod server;
pub mod template;

pub use {
    handler::RequestHandler,
    request::Route,
    response::Response,
    server::{ConnectionOutcome, HttpResponder, inherited_listener},
    template::PageTemplate,
};
