//! The I/O seam between `RestClient` and an actual HTTP library.

use crate::error::RestError;
use crate::http::{HttpRequest, HttpResponse};

/// Sends one plain-data request and returns the raw response.
///
/// Any response, whatever its status, is `Ok`; only failures to obtain a
/// response are reported, as `RestError::Transport`.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError>;
}

impl<F> HttpTransport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, RestError> + Send + Sync,
{
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
        self(request)
    }
}
