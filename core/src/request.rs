//! Immutable request descriptors and their builder.
//!
//! # Design
//! A `RequestDescriptor` says *what* to call (service, method, path, headers,
//! query parameters, cookies, body) and leaves *how* to the executor. It is
//! immutable; every accessor hands out shared references into storage the
//! builder no longer owns, so built descriptors can be shared across threads.
//!
//! `RequestBuilder` is a plain mutable builder confined to one thread.
//! `build` copies the current state, so it can be called repeatedly and later
//! mutations never reach descriptors built earlier.
//!
//! The setters differ on purpose:
//! - `set_header` replaces the entry and keeps the name even when no value
//!   survives (present-with-no-values);
//! - `set_query_parameter` replaces the entry but removes the name when no
//!   value survives;
//! - `add_query_param` appends to the entry, rejects missing values and
//!   skips values the entry already holds.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::RestError;
use crate::http::{ContentType, HttpMethod};
use crate::param::{collect_all, collect_present, ParamValue};
use crate::type_token::TypeDescriptor;

/// Identifies the endpoint group a request belongs to. Executors resolve the
/// base URL and transport settings from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceMarker(TypeDescriptor);

impl ServiceMarker {
    pub fn of<S: 'static>() -> Self {
        ServiceMarker(TypeDescriptor::of::<S>())
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        self.0
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl fmt::Display for ServiceMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One REST call described as an immutable value.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    service: ServiceMarker,
    method: HttpMethod,
    content_type: ContentType,
    path: String,
    headers: HashMap<String, Vec<String>>,
    query_parameters: HashMap<String, Vec<String>>,
    cookies: HashMap<String, Option<String>>,
    body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    pub fn builder<S: 'static>(method: HttpMethod, content_type: ContentType) -> RequestBuilder {
        RequestBuilder::new(ServiceMarker::of::<S>(), method, content_type)
    }

    pub fn service(&self) -> ServiceMarker {
        self.service
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Used for the request body and for reading the response.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Header names map to their values in insertion order. An empty list
    /// means the header was set without any value.
    pub fn headers(&self) -> &HashMap<String, Vec<String>> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers.get(name).map(Vec::as_slice)
    }

    pub fn query_parameters(&self) -> &HashMap<String, Vec<String>> {
        &self.query_parameters
    }

    pub fn query_parameter(&self, name: &str) -> Option<&[String]> {
        self.query_parameters.get(name).map(Vec::as_slice)
    }

    /// A `None` value is a cookie that was set without a value.
    pub fn cookies(&self) -> &HashMap<String, Option<String>> {
        &self.cookies
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// Mutable builder for `RequestDescriptor`. Not meant to be shared between
/// threads while it is being filled.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    service: ServiceMarker,
    method: HttpMethod,
    content_type: ContentType,
    path: String,
    headers: HashMap<String, Vec<String>>,
    query_parameters: HashMap<String, Vec<String>>,
    cookies: HashMap<String, Option<String>>,
    body: Option<serde_json::Value>,
}

impl RequestBuilder {
    pub fn new(service: ServiceMarker, method: HttpMethod, content_type: ContentType) -> Self {
        RequestBuilder {
            service,
            method,
            content_type,
            path: "/".to_string(),
            headers: HashMap::new(),
            query_parameters: HashMap::new(),
            cookies: HashMap::new(),
            body: None,
        }
    }

    /// Builder for callers that assemble the mandatory parts at runtime.
    /// Fails if any part is missing, naming all three.
    pub fn try_new(
        service: Option<ServiceMarker>,
        method: Option<HttpMethod>,
        content_type: Option<ContentType>,
    ) -> Result<Self, RestError> {
        match (service, method, content_type) {
            (Some(service), Some(method), Some(content_type)) => {
                Ok(RequestBuilder::new(service, method, content_type))
            }
            _ => Err(RestError::usage(
                "parameters 'service', 'method' and 'content_type' must not be missing",
            )),
        }
    }

    /// Last call wins.
    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = path.into();
        self
    }

    /// Replace all values of a header. Missing values are dropped; if none
    /// remain the header is still recorded, with no values.
    pub fn set_header<I>(&mut self, name: &str, values: I) -> Result<&mut Self, RestError>
    where
        I: IntoIterator,
        I::Item: ParamValue,
    {
        require_name(name, "header_name")?;
        self.headers.insert(name.to_string(), collect_present(values));
        Ok(self)
    }

    /// Replace all values of a query parameter. Missing values are dropped;
    /// if none remain the parameter is removed.
    pub fn set_query_parameter<I>(&mut self, name: &str, values: I) -> Result<&mut Self, RestError>
    where
        I: IntoIterator,
        I::Item: ParamValue,
    {
        require_name(name, "query_param_name")?;
        let values = collect_present(values);
        if values.is_empty() {
            self.query_parameters.remove(name);
        } else {
            self.query_parameters.insert(name.to_string(), values);
        }
        Ok(self)
    }

    /// Append values to a query parameter, creating it on first use. Every
    /// value must be present; values already held by the parameter are
    /// skipped. Nothing is written if the call fails.
    pub fn add_query_param<I>(&mut self, name: &str, values: I) -> Result<&mut Self, RestError>
    where
        I: IntoIterator,
        I::Item: ParamValue,
    {
        let values = collect_all(values).filter(|_| !name.is_empty()).ok_or_else(|| {
            RestError::usage("parameters 'query_param_name' and 'query_param_values' must not be missing")
        })?;
        let entry = self.query_parameters.entry(name.to_string()).or_default();
        for value in values {
            if !entry.contains(&value) {
                entry.push(value);
            }
        }
        Ok(self)
    }

    /// Last call per name wins. A `None` value is recorded as such.
    pub fn set_cookie<V: ParamValue>(&mut self, name: &str, value: V) -> Result<&mut Self, RestError> {
        require_name(name, "cookie_name")?;
        self.cookies.insert(name.to_string(), value.to_param_text());
        Ok(self)
    }

    pub fn set_body(&mut self, body: impl Into<Option<serde_json::Value>>) -> &mut Self {
        self.body = body.into();
        self
    }

    /// Convert any serializable value into the request body.
    pub fn serialize_body<B: Serialize + ?Sized>(&mut self, body: &B) -> Result<&mut Self, RestError> {
        let value =
            serde_json::to_value(body).map_err(|e| RestError::Serialization(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Snapshot the current state into an independent descriptor.
    pub fn build(&self) -> RequestDescriptor {
        RequestDescriptor {
            service: self.service,
            method: self.method,
            content_type: self.content_type,
            path: self.path.clone(),
            headers: self.headers.clone(),
            query_parameters: self.query_parameters.clone(),
            cookies: self.cookies.clone(),
            body: self.body.clone(),
        }
    }
}

fn require_name(name: &str, parameter: &str) -> Result<(), RestError> {
    if name.is_empty() {
        Err(RestError::usage(format!("parameter '{parameter}' must not be empty")))
    } else {
        Ok(())
    }
}
