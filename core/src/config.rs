//! Per-service transport configuration.
//!
//! `ServiceConfig` holds what an executor needs to reach one service: the
//! base URL and headers sent with every call. It deserializes from JSON so it
//! can live in a configuration file. `ServiceRegistry` maps service markers to
//! their configuration.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RestError;
use crate::request::ServiceMarker;

/// The base URL never ends with `/`, however the config was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(deserialize_with = "trimmed_base_url")]
    base_url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn trimmed_base_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim_end_matches('/').to_string())
}

impl ServiceConfig {
    pub fn new(base_url: &str) -> Self {
        ServiceConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: BTreeMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RestError> {
        serde_json::from_str(raw)
            .map_err(|e| RestError::usage(format!("invalid service configuration: {e}")))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<ServiceMarker, ServiceConfig>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        ServiceRegistry::default()
    }

    pub fn register<S: 'static>(&mut self, config: ServiceConfig) -> &mut Self {
        self.services.insert(ServiceMarker::of::<S>(), config);
        self
    }

    pub fn with<S: 'static>(mut self, config: ServiceConfig) -> Self {
        self.register::<S>(config);
        self
    }

    pub fn resolve(&self, service: &ServiceMarker) -> Result<&ServiceConfig, RestError> {
        self.services
            .get(service)
            .ok_or_else(|| RestError::usage(format!("no configuration registered for service `{service}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Pets {}
    enum Orders {}

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(ServiceConfig::new("http://localhost:3000//").base_url(), "http://localhost:3000");
    }

    #[test]
    fn config_loads_from_json() {
        let config = ServiceConfig::from_json_str(
            r#"{"base_url":"https://pets.example/api/","headers":{"x-api-version":"2"}}"#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "https://pets.example/api");
        assert_eq!(config.headers["x-api-version"], "2");

        let minimal = ServiceConfig::from_json_str(r#"{"base_url":"http://a"}"#).unwrap();
        assert!(minimal.headers.is_empty());
    }

    #[test]
    fn nested_config_is_trimmed_too() {
        #[derive(Deserialize)]
        struct AppConfig {
            pets: ServiceConfig,
        }
        let app: AppConfig =
            serde_json::from_str(r#"{"pets":{"base_url":"http://pets.local/v1/"}}"#).unwrap();
        assert_eq!(app.pets.base_url(), "http://pets.local/v1");
    }

    #[test]
    fn invalid_json_is_a_usage_error() {
        let err = ServiceConfig::from_json_str(r#"{"headers":{}}"#).unwrap_err();
        assert!(matches!(err, RestError::Usage(_)));
    }

    #[test]
    fn registry_resolves_by_marker() {
        let registry = ServiceRegistry::new()
            .with::<Pets>(ServiceConfig::new("http://pets").with_header("x-tenant", "a"));
        let config = registry.resolve(&ServiceMarker::of::<Pets>()).unwrap();
        assert_eq!(config.base_url(), "http://pets");

        let err = registry.resolve(&ServiceMarker::of::<Orders>()).unwrap_err();
        assert!(err.to_string().contains("Orders"));
    }
}
