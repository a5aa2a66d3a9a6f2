use serde::Serialize;

/// Response envelope shared by every endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope with no `data` field.
    pub fn message_only(message: impl Into<String>) -> Self {
        ApiResponse {
            status: "success",
            message: message.into(),
            data: None,
        }
    }
}
