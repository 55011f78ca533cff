//! Item deletion: `DELETE {endpoint}/{id}` with success/error reporting.

use crate::adapter::ResponseAdapter;
use crate::error::{ErrorNotice, ListError};
use crate::transport::{RequestDescriptor, Transport};
use crate::types::ItemId;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_DELETE_MESSAGE: &str = "Error on delete";

pub struct ItemDeleter {
    endpoint: String,
    adapter: Arc<dyn ResponseAdapter>,
}

impl ItemDeleter {
    pub fn new(endpoint: impl Into<String>, adapter: Arc<dyn ResponseAdapter>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            adapter,
        }
    }

    /// The id is appended as one percent-encoded path segment.
    pub fn request(&self, id: &ItemId) -> Result<RequestDescriptor, ListError> {
        let mut url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            ListError::Configuration(format!("Invalid endpoint {}: {}", self.endpoint, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ListError::Configuration(format!("Endpoint {} cannot take a path", self.endpoint))
            })?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(RequestDescriptor::delete(url.to_string()))
    }

    /// Notice for a failed delete; the message defaults to "Error on delete".
    pub fn notice(&self, payload: Value) -> ErrorNotice {
        let message = self
            .adapter
            .message(&payload)
            .unwrap_or_else(|| DEFAULT_DELETE_MESSAGE.to_string());
        ErrorNotice::new(payload, Some(message))
    }

    /// Run the delete. The error side carries the notice to show.
    pub async fn delete(
        &self,
        transport: &dyn Transport,
        id: &ItemId,
    ) -> Result<(), (ListError, ErrorNotice)> {
        let request = self
            .request(id)
            .map_err(|err| (err, self.notice(Value::Null)))?;
        match transport.execute(request).await {
            Ok(_) => {
                info!(id = %id, "Item deleted");
                Ok(())
            }
            Err(failure) => {
                warn!(id = %id, error = %failure, "Item delete failed");
                let notice = self.notice(failure.payload.clone());
                Err((ListError::Transport(failure), notice))
            }
        }
    }
}
