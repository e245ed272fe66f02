use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::UserEntity;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SigninBody {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    id: Uuid,
    username: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<&UserEntity> for UserProfile {
    fn from(user: &UserEntity) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_owned(),
            email: user.email().to_owned(),
            role: user.role_str().to_owned(),
            created_at: user.created_at(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenReply {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeProgress {
    pub total_lessons: i64,
    pub completed: i64,
    pub in_progress: i64,
    pub percent_complete: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MeReply {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub progress: MeProgress,
}

/// Completed-lessons share of the published catalog, rounded to the nearest
/// whole percent. Zero published lessons reads as zero percent.
pub fn percent_complete(completed: i64, total_lessons: i64) -> i64 {
    if total_lessons <= 0 {
        return 0;
    }
    ((completed as f64 / total_lessons as f64) * 100.0).round() as i64
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn percent_complete_rounds_to_nearest() {
        assert_eq!(percent_complete(4, 10), 40);
        assert_eq!(percent_complete(1, 3), 33);
        assert_eq!(percent_complete(2, 3), 67);
    }

    #[test]
    fn empty_catalog_is_zero_percent() {
        assert_eq!(percent_complete(0, 0), 0);
        assert_eq!(percent_complete(5, 0), 0);
    }
}
