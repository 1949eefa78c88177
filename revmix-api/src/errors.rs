use reqwest::{Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{}", .detail.as_deref().unwrap_or("Unauthorized"))]
    Unauthorized { detail: Option<String> },
    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Option<String> },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Request is invalid: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl ApiError {
    /// The explanation the backend gave for refusing the request, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns the HTTP status if the backend answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED.as_u16()),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the backend could not be reached at all
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Turns an unsuccessful response into an error, keeping the backend's detail.
    pub(crate) async fn from_response(response: Response) -> Self {
        let status = response.status();
        let detail = response
            .text()
            .await
            .ok()
            .and_then(|body| extract_detail(&body));

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized { detail },
            _ => Self::Status {
                status: status.as_u16(),
                detail,
            },
        }
    }
}

/// Reads the `detail` of an error body, which is either a message or a list of validation failures
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(items) => {
            let messages: Vec<_> = items
                .iter()
                .filter_map(|item| item.get("msg")?.as_str())
                .collect();

            (!messages.is_empty()).then(|| messages.join(", "))
        }
        _ => None,
    }
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Request failed with status {}", status),
    }
}

#[cfg(test)]
mod test {
    use super::{extract_detail, ApiError};

    #[test]
    fn details_are_read_from_error_bodies() {
        assert_eq!(
            extract_detail(r#"{"detail":"Room is full"}"#).as_deref(),
            Some("Room is full")
        );
        assert_eq!(
            extract_detail(r#"{"detail":[{"msg":"field required"},{"msg":"bad value"}]}"#)
                .as_deref(),
            Some("field required, bad value")
        );
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"message":"nope"}"#), None);
    }

    #[test]
    fn messages_fall_back_to_the_status() {
        let error = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(error.to_string(), "Request failed with status 500");

        let error = ApiError::Unauthorized {
            detail: Some("Invalid credentials".into()),
        };
        assert_eq!(error.to_string(), "Invalid credentials");
        assert_eq!(error.status(), Some(401));
    }
}
