use serde::{Deserialize, Serialize};

/// Envelope for every JSON response.
///
/// The payload's fields sit next to `success`, so a generation reply reads
/// `{"success": true, "result": "..."}` and a failure `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerationDto {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryDto {
    pub id: i64,
    pub user_preferences: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryListDto {
    pub entries: Vec<HistoryEntryDto>,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime: u64,
}
