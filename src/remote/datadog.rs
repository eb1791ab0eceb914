//! Datadog HTTP API client.
//!
//! Talks to the v1 monitor and dashboard endpoints. The client owns a
//! current-thread tokio runtime and blocks on each request, so callers see
//! plain synchronous calls.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::RemoteGateway;
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::model::{collection_from_value, object::type_name, ConfigCollection, ConfigObject, ObjectKind};

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Datadog API client.
pub struct DatadogClient {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    /// Where `credentials` were loaded from, reported on 403.
    credentials_file: Option<PathBuf>,
}

impl DatadogClient {
    /// Create a client for `host` (e.g. `https://api.datadoghq.com`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `host` isn't a usable base URL, or an
    /// error if the runtime or HTTP client can't be built.
    pub fn new(host: &str, credentials: Credentials) -> Result<Self> {
        Self::with_builder(host, credentials, reqwest::Client::builder())
    }

    fn with_builder(
        host: &str,
        credentials: Credentials,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self> {
        let base_url = Url::parse(host)
            .map_err(|e| Error::Config(format!("Invalid API host '{host}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid API host '{host}'")));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let client = builder
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("doghouse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            runtime,
            client,
            base_url,
            credentials,
            credentials_file: None,
        })
    }

    /// Record the credential file the keys came from, so a rejected key pair
    /// points at the right file.
    #[must_use]
    pub fn with_credentials_file(mut self, path: PathBuf) -> Self {
        self.credentials_file = Some(path);
        self
    }

    /// `{host}/api/v1/{api_path}[/{id}]`, with the id percent-encoded.
    fn endpoint(&self, kind: ObjectKind, id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::Config(format!("Invalid API host '{}'", self.base_url)))?;
            segments
                .pop_if_empty()
                .extend(["api", "v1", kind.info().api_path]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Send one request and decode the JSON body.
    fn call(&self, method: Method, url: Url, body: Option<&ConfigObject>) -> Result<Value> {
        debug!(%method, %url, "Datadog request");

        let mut request = self
            .client
            .request(method, url)
            .header("DD-API-KEY", &self.credentials.api_key)
            .header("DD-APPLICATION-KEY", &self.credentials.app_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        self.runtime.block_on(async move {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            decode_response(status, &text)
        })
        .map_err(|e| match e {
            Error::Forbidden { credentials: None } => Error::Forbidden {
                credentials: self.credentials_file.clone(),
            },
            other => other,
        })
    }
}

/// Map an HTTP status and body to a JSON value or a typed error.
fn decode_response(status: StatusCode, body: &str) -> Result<Value> {
    if status == StatusCode::FORBIDDEN {
        return Err(Error::Forbidden { credentials: None });
    }

    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .and_then(error_messages)
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    trimmed.to_string()
                }
            });
        return Err(Error::Remote {
            status: status.as_u16(),
            message,
        });
    }

    let value = match parsed {
        Some(value) => value,
        None => serde_json::from_str(body)?,
    };

    // Some endpoints report failures in the body of a 2xx response.
    if let Some(message) = error_messages(&value) {
        return Err(Error::Remote {
            status: status.as_u16(),
            message,
        });
    }

    Ok(value)
}

/// Join a non-empty `errors` array from a response body.
fn error_messages(value: &Value) -> Option<String> {
    let errors = value.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }

    Some(
        errors
            .iter()
            .map(|e| e.as_str().map_or_else(|| e.to_string(), ToString::to_string))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

fn expect_object(kind: ObjectKind, value: Value) -> Result<ConfigObject> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Other(format!(
            "Unexpected {kind} response: expected an object, found {}",
            type_name(&other)
        ))),
    }
}

impl RemoteGateway for DatadogClient {
    fn list(&self, kind: ObjectKind) -> Result<ConfigCollection> {
        let mut value = self.call(Method::GET, self.endpoint(kind, None)?, None)?;

        if let Some(envelope) = kind.info().list_envelope {
            value = value
                .get_mut(envelope)
                .map(Value::take)
                .ok_or_else(|| {
                    Error::Other(format!("Unexpected {kind} list response: missing '{envelope}'"))
                })?;
        }

        collection_from_value(value)
            .map_err(|m| Error::Other(format!("Unexpected {kind} list response: {m}")))
    }

    fn get(&self, kind: ObjectKind, id: &str) -> Result<ConfigObject> {
        let value = self.call(Method::GET, self.endpoint(kind, Some(id))?, None)?;
        expect_object(kind, value)
    }

    fn update(&self, kind: ObjectKind, id: &str, fields: &ConfigObject) -> Result<ConfigObject> {
        let value = self.call(Method::PUT, self.endpoint(kind, Some(id))?, Some(fields))?;
        expect_object(kind, value)
    }
}
