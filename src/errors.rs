use axum::http::StatusCode;
use thiserror::Error;

/// Failure of a single call to the HR API.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    #[error("{}", .detail.as_deref().unwrap_or("request failed"))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Decode(String),
}

impl RequestError {
    pub fn status(status: StatusCode, body: &[u8]) -> Self {
        Self::Status {
            status,
            detail: detail_from_body(body),
        }
    }

    /// The `detail` the server sent, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message shown to the user: server detail, then the transport-level
    /// message, then `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        if let Some(detail) = self.detail().filter(|detail| !detail.trim().is_empty()) {
            return detail.to_string();
        }

        let transport = match self {
            Self::Status { status, .. } => {
                format!("Request failed with status code {}", status.as_u16())
            }
            Self::Transport(message) | Self::Decode(message) => message.clone(),
        };

        if transport.trim().is_empty() {
            fallback.to_string()
        } else {
            transport
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

fn detail_from_body(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(detail) => Some(detail.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if messages.is_empty() {
                Some(serde_json::Value::Array(items.clone()).to_string())
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

/// Controller operations, each with the message used when a failure carries
/// nothing better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchEmployees,
    FetchAttendance,
    AddEmployee,
    DeleteEmployee,
    MarkAttendance,
    FetchEmployeeAttendance,
}

impl Operation {
    pub fn fallback(self) -> &'static str {
        match self {
            Self::FetchEmployees => "Failed to fetch employees",
            Self::FetchAttendance => "Failed to fetch attendance records",
            Self::AddEmployee => "Failed to add employee",
            Self::DeleteEmployee => "Failed to delete employee",
            Self::MarkAttendance => "Failed to mark attendance",
            Self::FetchEmployeeAttendance => "Failed to fetch employee attendance",
        }
    }
}

/// A failed controller operation with its resolved display message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    pub operation: Operation,
    pub message: String,
}

impl OperationError {
    pub fn new(operation: Operation, err: &RequestError) -> Self {
        Self {
            operation,
            message: err.message_or(operation.fallback()),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
