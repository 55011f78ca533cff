//! Transport Abstraction
//!
//! Every outbound call is described by an immutable `RequestDescriptor` that is built in
//! one step and moved into `Transport::execute`. Nothing about a request lives on a shared
//! handle, so two callers can never rewrite each other's url or parameters mid-flight.

use crate::config::HttpConfig;
use crate::error::{ListError, TransportFailure};
use crate::query::RequestParams;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Immutable description of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub params: RequestParams,
}

impl RequestDescriptor {
    pub fn get(url: impl Into<String>, params: RequestParams) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            params,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Same method and parameters, sent to another url (used for server-issued page tokens).
    pub fn redirect(&self, url: impl Into<String>) -> Self {
        Self {
            method: self.method,
            url: url.into(),
            params: self.params.clone(),
        }
    }

    /// Look up the first value of a parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Request executor
///
/// Success yields the parsed response payload; failure carries the server payload as-is.
/// Timeouts are the transport's concern and surface as ordinary failures.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: RequestDescriptor) -> Result<Value, TransportFailure>;
}

fn map_http_error(error: reqwest::Error) -> TransportFailure {
    let status = error.status().map(|s| s.as_u16());
    let reason = if error.is_timeout() {
        format!("Request timeout: {}", error)
    } else if error.is_connect() {
        format!("Connection error: {}", error)
    } else {
        format!("HTTP error: {}", error)
    };
    TransportFailure::new(status, Value::Null, reason)
}

// Empty bodies (e.g. 204 on delete) become null; non-JSON bodies are kept as a string.
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(http: &HttpConfig) -> Result<Self, ListError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .build()
            .map_err(|e| {
                ListError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    pub fn build_request(
        &self,
        request: &RequestDescriptor,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &request.url)
            .header("Accept", "application/json");
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        builder.build()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: RequestDescriptor) -> Result<Value, TransportFailure> {
        let built = self.build_request(&request).map_err(map_http_error)?;
        debug!(method = request.method.as_str(), url = %built.url(), "Sending request");

        let response = self.client.execute(built).await.map_err(map_http_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_http_error)?;
        let payload = parse_body(&body);

        if !status.is_success() {
            return Err(TransportFailure::new(
                Some(status.as_u16()),
                payload,
                format!("Request failed with status {}", status),
            ));
        }
        Ok(payload)
    }
}
