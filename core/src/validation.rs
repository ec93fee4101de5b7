//! Validation of request parameters and response objects.

use validator::Validate;

use crate::error::RestError;
use crate::request::ServiceMarker;

/// Checks values exchanged with a service. Failures are reported as a
/// structured `RestError::Validation`, never as a boolean.
pub trait ValidationExecutor: Send + Sync {
    fn validate_request<R>(&self, service: &ServiceMarker, request: &R) -> Result<(), RestError>
    where
        R: Validate + ?Sized;

    fn validate_response<R>(&self, service: &ServiceMarker, response: &R) -> Result<(), RestError>
    where
        R: Validate + ?Sized;
}

/// Runs the `validator` derive rules declared on the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatorExecutor;

impl ValidatorExecutor {
    fn run<R: Validate + ?Sized>(service: &ServiceMarker, value: &R, direction: &str) -> Result<(), RestError> {
        value.validate().map_err(|errors| {
            tracing::debug!(service = %service, direction, errors = %errors, "validation failed");
            RestError::Validation {
                service: service.name(),
                errors,
            }
        })
    }
}

impl ValidationExecutor for ValidatorExecutor {
    fn validate_request<R>(&self, service: &ServiceMarker, request: &R) -> Result<(), RestError>
    where
        R: Validate + ?Sized,
    {
        Self::run(service, request, "request")
    }

    fn validate_response<R>(&self, service: &ServiceMarker, response: &R) -> Result<(), RestError>
    where
        R: Validate + ?Sized,
    {
        Self::run(service, response, "response")
    }
}
