use serde::Deserialize;

/// Subset of the Message resource returned by `POST .../Messages.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl MessageResponse {
    pub fn is_failed(&self) -> bool {
        matches!(self.status.as_str(), "failed" | "undelivered")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}
