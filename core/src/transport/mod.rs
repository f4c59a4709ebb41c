//! The I/O boundary: execute one request, return one response.
//!
//! # Design
//! Everything above this trait works with `HttpRequest` / `HttpResponse`
//! values only. `LiveTransport` talks to the network; `MockTransport` replays
//! recorded responses. Transports pass status codes through untouched;
//! interpreting them is the fetch service's job.

mod live;
mod mock;

use std::sync::Arc;

pub use live::LiveTransport;
pub use mock::{MockTransport, Reply};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single HTTP request.
///
/// Implementations must be usable from several threads at once; the fetch
/// service shares one transport across concurrent operations.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
