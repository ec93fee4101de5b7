//! Reference `RequestExecutor` built on a pluggable transport.
//!
//! # Design
//! `RestClient` holds a `ServiceRegistry` and an `HttpTransport` and carries
//! no other state between calls. Each execution is split into
//! `build_request`, which turns a descriptor into a plain-data `HttpRequest`,
//! and one of the `parse_*` methods, which consume the `HttpResponse`. The
//! transport does the round trip in between, so both halves stay
//! deterministic and can also be driven by callers that do their own I/O.
//!
//! Only JSON bodies are encoded and decoded; XML requests are reported as
//! serialization failures and XML responses as deserialization failures.

use serde::de::DeserializeOwned;

use crate::config::ServiceRegistry;
use crate::error::{Problem, RestError};
use crate::executor::{RequestExecutor, ResultCollection};
use crate::http::{ContentType, HttpRequest, HttpResponse};
use crate::object_type::ObjectType;
use crate::request::RequestDescriptor;
use crate::transport::HttpTransport;

#[derive(Debug, Clone)]
pub struct RestClient<T> {
    services: ServiceRegistry,
    transport: T,
}

impl<T: HttpTransport> RestClient<T> {
    pub fn new(services: ServiceRegistry, transport: T) -> Self {
        RestClient { services, transport }
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Resolve the service and encode the descriptor as an HTTP request.
    pub fn build_request(&self, request: &RequestDescriptor) -> Result<HttpRequest, RestError> {
        let config = self.services.resolve(&request.service())?;
        let content_type = request.content_type();

        let mut url = config.base_url().to_string();
        if !request.path().starts_with('/') {
            url.push('/');
        }
        url.push_str(request.path());
        let query = encode_query(request);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        let body = request
            .body()
            .map(|value| encode_body(value, content_type))
            .transpose()?;

        let mut headers = Vec::new();
        if !has_header(request, "accept") {
            headers.push(("accept".to_string(), content_type.mime_type().to_string()));
        }
        if body.is_some() && !has_header(request, "content-type") {
            headers.push(("content-type".to_string(), content_type.mime_type().to_string()));
        }
        for (name, value) in &config.headers {
            if !has_header(request, name) {
                headers.push((name.clone(), value.clone()));
            }
        }
        let mut names: Vec<&String> = request.headers().keys().collect();
        names.sort();
        for name in names {
            let values = &request.headers()[name];
            if values.is_empty() {
                headers.push((name.clone(), String::new()));
            }
            for value in values {
                headers.push((name.clone(), value.clone()));
            }
        }
        if let Some(cookie) = encode_cookies(request)? {
            headers.push(("cookie".to_string(), cookie));
        }

        Ok(HttpRequest {
            method: request.method(),
            url,
            headers,
            body,
        })
    }

    pub fn parse_no_result(&self, response: HttpResponse, success_status: u16) -> Result<(), RestError> {
        check_status(&response, success_status)
    }

    pub fn parse_single<R>(
        &self,
        response: HttpResponse,
        success_status: u16,
        content_type: ContentType,
        object_type: &ObjectType,
    ) -> Result<R, RestError>
    where
        R: DeserializeOwned + 'static,
    {
        object_type.check_target::<R>()?;
        check_status(&response, success_status)?;
        decode_body(&response.body, content_type)
    }

    pub fn parse_collection<C, E>(
        &self,
        response: HttpResponse,
        success_status: u16,
        content_type: ContentType,
        element_type: &ObjectType,
    ) -> Result<C, RestError>
    where
        C: ResultCollection<E>,
        E: DeserializeOwned + 'static,
    {
        element_type.check_target::<E>()?;
        check_status(&response, success_status)?;
        let elements: Vec<E> = decode_body(&response.body, content_type)?;
        Ok(elements.into_iter().collect())
    }

    fn exchange(&self, request: &RequestDescriptor) -> Result<HttpResponse, RestError> {
        let http_request = self.build_request(request)?;
        tracing::debug!(
            service = %request.service(),
            method = %http_request.method,
            url = %http_request.url,
            "sending request"
        );
        let response = self.transport.send(http_request).inspect_err(|error| {
            tracing::debug!(service = %request.service(), err = %error, "request error");
        })?;
        tracing::debug!(service = %request.service(), status = response.status, "response received");
        Ok(response)
    }
}

impl<T: HttpTransport> RequestExecutor for RestClient<T> {
    fn execute_no_result(
        &self,
        request: &RequestDescriptor,
        success_status: u16,
    ) -> Result<(), RestError> {
        let response = self.exchange(request)?;
        self.parse_no_result(response, success_status)
    }

    fn execute_single_result<R>(
        &self,
        request: &RequestDescriptor,
        success_status: u16,
        object_type: &ObjectType,
    ) -> Result<R, RestError>
    where
        R: DeserializeOwned + 'static,
    {
        object_type.check_target::<R>()?;
        let response = self.exchange(request)?;
        self.parse_single(response, success_status, request.content_type(), object_type)
    }

    fn execute_collection_result<C, E>(
        &self,
        request: &RequestDescriptor,
        success_status: u16,
        element_type: &ObjectType,
    ) -> Result<C, RestError>
    where
        C: ResultCollection<E>,
        E: DeserializeOwned + 'static,
    {
        element_type.check_target::<E>()?;
        let response = self.exchange(request)?;
        tracing::trace!(kind = ?C::KIND, element = %element_type, "collecting result");
        self.parse_collection::<C, E>(response, success_status, request.content_type(), element_type)
    }
}

/// Query string with keys in sorted order and values in stored order.
fn encode_query(request: &RequestDescriptor) -> String {
    let mut names: Vec<&String> = request.query_parameters().keys().collect();
    names.sort();
    let mut pairs = Vec::new();
    for name in names {
        for value in &request.query_parameters()[name] {
            pairs.push(format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            ));
        }
    }
    pairs.join("&")
}

/// Whether the descriptor sets `name` itself, ignoring case.
fn has_header(request: &RequestDescriptor, name: &str) -> bool {
    request.headers().keys().any(|own| own.eq_ignore_ascii_case(name))
}

/// One `cookie` header value. Values are percent-encoded; names must be
/// cookie tokens.
fn encode_cookies(request: &RequestDescriptor) -> Result<Option<String>, RestError> {
    if request.cookies().is_empty() {
        return Ok(None);
    }
    let mut cookies: Vec<(&String, &Option<String>)> = request.cookies().iter().collect();
    cookies.sort_by(|a, b| a.0.cmp(b.0));
    let mut pairs = Vec::with_capacity(cookies.len());
    for (name, value) in cookies {
        let forbidden = |c: &char| matches!(c, ';' | ',' | '=' | '"') || c.is_whitespace() || c.is_control();
        if let Some(bad) = name.chars().find(forbidden) {
            return Err(RestError::usage(format!(
                "cookie name '{name}' contains the forbidden character {bad:?}"
            )));
        }
        let value = value.as_deref().unwrap_or_default();
        pairs.push(format!("{name}={}", urlencoding::encode(value)));
    }
    Ok(Some(pairs.join("; ")))
}

fn encode_body(value: &serde_json::Value, content_type: ContentType) -> Result<String, RestError> {
    match content_type {
        ContentType::Json => {
            serde_json::to_string(value).map_err(|e| RestError::Serialization(e.to_string()))
        }
        ContentType::Xml => Err(RestError::Serialization(format!(
            "request bodies of type {content_type} are not supported"
        ))),
    }
}

fn decode_body<R: DeserializeOwned>(body: &str, content_type: ContentType) -> Result<R, RestError> {
    let target = std::any::type_name::<R>();
    // A JSON null carries no result either.
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(RestError::deserialization(target, "response body is empty"));
    }
    match content_type {
        ContentType::Json => {
            serde_json::from_str(body).map_err(|e| RestError::deserialization(target, e))
        }
        ContentType::Xml => Err(RestError::deserialization(
            target,
            format!("response bodies of type {content_type} are not supported"),
        )),
    }
}

/// Map any status other than the expected one to `UnsuccessfulResponse`.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), RestError> {
    if response.status == expected {
        return Ok(());
    }
    tracing::warn!(status = response.status, expected, "unexpected response status");
    Err(RestError::UnsuccessfulResponse {
        status: response.status,
        expected,
        problem: Problem::from_body(&response.body),
        body: response.body.clone(),
    })
}
