//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ListError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &ListError) -> String {
    match e {
        ListError::Transport(failure) => match failure.status {
            Some(status) => format!("Request failed ({}): {}", status, failure.reason),
            None => format!("Request failed: {}", failure.reason),
        },
        ListError::NotReady => "No transport available".to_string(),
        other => other.to_string(),
    }
}

/// Process exit code for a failed command.
pub fn exit_code(e: &ListError) -> i32 {
    match e {
        ListError::Configuration(_) | ListError::InvalidArgument(_) => 2,
        _ => 1,
    }
}
