use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::ProgressEntity;

pub const VALID_STATUSES: [&str; 2] = ["in_progress", "completed"];

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressBody {
    pub lesson_id: Uuid,
    pub status: String,
    /// Accepted loosely: integers, floats and garbage all coerce, see
    /// [`coerce_percent`].
    #[schema(value_type = Option<i32>)]
    pub percent: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressReply {
    pub message: String,
    pub progress_id: String,
    pub status: String,
    pub percent: i32,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BookmarkBody {
    pub bookmarked: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkReply {
    pub message: String,
    pub lesson_id: Uuid,
    pub bookmarked: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRow {
    id: String,
    lesson_id: Uuid,
    status: String,
    percent: i32,
    bookmarked: bool,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProgressEntity> for ProgressRow {
    fn from(p: ProgressEntity) -> Self {
        Self {
            id: p.id().to_owned(),
            lesson_id: p.lesson_id(),
            status: p.status().to_owned(),
            percent: p.percent(),
            bookmarked: p.bookmarked(),
            updated_at: p.updated_at(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed: i64,
    pub in_progress: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserProgressReply {
    pub data: Vec<ProgressRow>,
    pub summary: ProgressSummary,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverviewReply {
    pub total_modules: i64,
    pub total_lessons: i64,
    pub total_questions: i64,
    pub user_completed: i64,
    pub user_in_progress: i64,
    pub user_bookmarks: i64,
    pub streak_days: i64,
}

/// Clamp a client-supplied completion percent into `0..=100`. Anything
/// non-numeric (missing, strings, objects) lands at 0 rather than failing
/// the request.
pub fn coerce_percent(value: Option<&serde_json::Value>) -> i32 {
    let raw = match value {
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        None => 0,
    };
    raw.clamp(0, 100) as i32
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn percent_clamps_into_range() {
        assert_eq!(coerce_percent(Some(&json!(150))), 100);
        assert_eq!(coerce_percent(Some(&json!(-5))), 0);
        assert_eq!(coerce_percent(Some(&json!(42))), 42);
    }

    #[test]
    fn non_numeric_percent_defaults_to_zero() {
        assert_eq!(coerce_percent(None), 0);
        assert_eq!(coerce_percent(Some(&json!("half"))), 0);
        assert_eq!(coerce_percent(Some(&json!(null))), 0);
        assert_eq!(coerce_percent(Some(&json!({"pct": 50}))), 0);
    }

    #[test]
    fn float_percent_truncates() {
        assert_eq!(coerce_percent(Some(&json!(66.9))), 66);
    }
}
