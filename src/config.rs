//! Configuration System
//!
//! Deployment configuration for a list view: where the collection lives, how responses are
//! shaped, which view features are turned off, and how long the quiescence window is.
//! Layered loading (defaults, global file, workspace files, environment) lives in
//! `ConfigLoader`.

use crate::error::ListError;
use crate::logging::LoggingConfig;
use crate::query::Scope;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Collection endpoint, e.g. `https://host/api/items`
    #[serde(default)]
    pub endpoint: String,

    /// Quiescence window for query changes (milliseconds)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub page_size: PageSizeConfig,

    #[serde(default)]
    pub customization: Customization,

    /// Response shape of this deployment
    #[serde(default)]
    pub api: ApiConfig,

    /// Optional parent-entity constraint applied to every query
    #[serde(default)]
    pub scope: Option<Scope>,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            debounce_ms: default_debounce_ms(),
            page_size: PageSizeConfig::default(),
            customization: Customization::default(),
            api: ApiConfig::default(),
            scope: None,
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSizeConfig {
    #[serde(default = "default_page_size")]
    pub initial: u32,
}

fn default_page_size() -> u32 {
    50
}

impl Default for PageSizeConfig {
    fn default() -> Self {
        Self {
            initial: default_page_size(),
        }
    }
}

/// View feature switches. `disable_pagination`, `disable_delete`, `disable_insert` and
/// `hide_checkbox_selection` (which refuses selection) change controller behavior.
/// `hide_count_summary`, `hide_page_report`, `hide_empty_insert_button` and `disable_edit`
/// are only read by the view layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Customization {
    pub hide_count_summary: bool,
    pub hide_page_report: bool,
    pub hide_checkbox_selection: bool,
    pub hide_empty_insert_button: bool,
    pub disable_insert: bool,
    pub disable_edit: bool,
    pub disable_delete: bool,
    pub disable_pagination: bool,
}

/// JSON-pointer locations of the interesting parts of a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Array of records in a list response
    pub elements_path: String,
    /// Object holding `next_page_url`, `prev_page_url` and `current_page`
    pub pagination_path: String,
    /// Total number of matching records
    pub total_count_path: String,
    /// Array of identifiers in an all-ids response
    pub ids_path: String,
    /// Human-readable message in an error response
    pub message_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            elements_path: "/data/data".to_string(),
            pagination_path: "/data".to_string(),
            total_count_path: "/data/total".to_string(),
            ids_path: "/data".to_string(),
            message_path: "/message".to_string(),
        }
    }
}

impl ApiConfig {
    fn pointers(&self) -> [(&'static str, &str); 5] {
        [
            ("elements_path", &self.elements_path),
            ("pagination_path", &self.pagination_path),
            ("total_count_path", &self.total_count_path),
            ("ids_path", &self.ids_path),
            ("message_path", &self.message_path),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 60,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Endpoint(String),
    PageSize(String),
    Api(String, String),
    Scope(String),
    Http(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Endpoint(msg) => write!(f, "Endpoint: {}", msg),
            ValidationError::PageSize(msg) => write!(f, "Page size: {}", msg),
            ValidationError::Api(field, msg) => write!(f, "API '{}': {}", field, msg),
            ValidationError::Scope(msg) => write!(f, "Scope: {}", msg),
            ValidationError::Http(msg) => write!(f, "HTTP: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ListConfig {
    /// Minimal configuration for an endpoint, everything else defaulted.
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Endpoint without a trailing slash, ready for path suffixes.
    pub fn base_endpoint(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.endpoint.trim().is_empty() {
            errors.push(ValidationError::Endpoint("cannot be empty".to_string()));
        } else if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://"))
        {
            errors.push(ValidationError::Endpoint(format!(
                "'{}' must be an absolute http(s) URL",
                self.endpoint
            )));
        }

        if self.page_size.initial == 0 {
            errors.push(ValidationError::PageSize(
                "initial page size must be greater than zero".to_string(),
            ));
        }

        for (field, pointer) in self.api.pointers() {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                errors.push(ValidationError::Api(
                    field.to_string(),
                    format!("'{}' is not a JSON pointer (must start with '/')", pointer),
                ));
            }
        }
        if self.api.elements_path.is_empty() {
            errors.push(ValidationError::Api(
                "elements_path".to_string(),
                "required to locate list elements".to_string(),
            ));
        }

        if let Some(scope) = &self.scope {
            if scope.belongs_to.is_empty() != scope.relation_id.is_empty() {
                errors.push(ValidationError::Scope(
                    "belongs_to and relation_id must be set together".to_string(),
                ));
            }
        }

        if self.http.request_timeout_secs == 0 {
            errors.push(ValidationError::Http(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// `validate` folded into a single configuration error.
    pub fn ensure_valid(&self) -> Result<(), ListError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ListError::Configuration(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}
