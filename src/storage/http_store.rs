//! HTTP config store client
//!
//! Talks to the config API served next to the graph editor. Writes are
//! form-encoded; reads return JSON objects.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::error::{SealError, SealResult};
use crate::models::TypeInfo;

use super::{parse_type_map, ConfigMap, ConfigStore, RawTypeMap, TypeMap};

/// Endpoint returning every value
pub const GET_ALL_PATH: &str = "/api/rei/config/get_all";
/// Endpoint returning every entry's type metadata
pub const GET_TYPES_PATH: &str = "/api/rei/config/get_types";
/// Endpoint creating or replacing an entry
pub const UPDATE_PATH: &str = "/api/rei/config/update";
/// Endpoint removing an entry
pub const DELETE_PATH: &str = "/api/rei/config/delete";

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Blocking HTTP client for the config API
pub struct HttpConfigStore {
    client: Client,
    base_url: String,
}

impl HttpConfigStore {
    /// Create a client for the server at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> SealResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SealError::Config("Config server URL is empty".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SealError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into a store error
    fn check(response: Response) -> SealResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        Err(SealError::Store {
            status: Some(status.as_u16()),
            message,
        })
    }
}

impl ConfigStore for HttpConfigStore {
    fn get_all(&self) -> SealResult<ConfigMap> {
        tracing::debug!(url = %self.url(GET_ALL_PATH), "fetching config values");
        let response = Self::check(self.client.get(self.url(GET_ALL_PATH)).send()?)?;
        Ok(response.json()?)
    }

    fn get_types(&self) -> SealResult<TypeMap> {
        tracing::debug!(url = %self.url(GET_TYPES_PATH), "fetching config types");
        let response = Self::check(self.client.get(self.url(GET_TYPES_PATH)).send()?)?;
        let raw: RawTypeMap = response.json()?;
        Ok(parse_type_map(raw))
    }

    fn save(&self, key: &str, value: &str, type_info: TypeInfo) -> SealResult<()> {
        let encrypted = if type_info.encrypted { "true" } else { "false" };
        let form = [
            ("key", key),
            ("value", value),
            ("type", type_info.config_type.wire_name()),
            ("encrypted", encrypted),
        ];

        tracing::debug!(key, config_type = type_info.config_type.wire_name(), "posting config update");
        Self::check(self.client.post(self.url(UPDATE_PATH)).form(&form).send()?)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> SealResult<()> {
        tracing::debug!(key, "posting config delete");
        Self::check(
            self.client
                .post(self.url(DELETE_PATH))
                .form(&[("key", key)])
                .send()?,
        )?;
        Ok(())
    }
}
