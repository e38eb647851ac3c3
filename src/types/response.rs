use serde::Serialize;

/// Standard API response wrapper for operations that return no record,
/// e.g. `{"success": true}` after a delete.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    /// Bare success acknowledgement
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}
