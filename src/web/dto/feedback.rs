use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const VALID_REPORT_TYPES: [&str; 3] = ["bug", "content", "feature"];
pub const REPORT_MESSAGE_MAX_CHARS: usize = 5000;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ReportBody {
    #[serde(rename = "type")]
    pub report_type: String,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportReply {
    pub message: String,
    pub report_id: Uuid,
}
