use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Deterministic progress row key. Keying by user+lesson makes every save an
/// upsert, so there is exactly one progress row per (user, lesson) pair.
pub fn progress_key(user_id: Uuid, lesson_id: Uuid) -> String {
    format!("{user_id}_{lesson_id}")
}

/// Per-user-per-lesson status/completion/bookmark record.
///
/// The two upsert paths each touch their own field group (status+percent vs
/// bookmarked), so concurrent saves race per field group, never per row: a
/// bookmark toggle can not clobber a status save and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ProgressEntity {
    id: String,
    user_id: Uuid,
    lesson_id: Uuid,
    status: String,
    percent: i32,
    bookmarked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ResourceTyped for ProgressEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Progress
    }
}

impl ProgressEntity {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn percent(&self) -> i32 {
        self.percent
    }

    pub fn bookmarked(&self) -> bool {
        self.bookmarked
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub async fn upsert_status(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        lesson_id: Uuid,
        status: &str,
        percent: i32,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO progress (id, user_id, lesson_id, status, percent)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
                SET status = EXCLUDED.status,
                    percent = EXCLUDED.percent,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(progress_key(actor.user_id(), lesson_id))
        .bind(actor.user_id())
        .bind(lesson_id)
        .bind(status)
        .bind(percent)
        .fetch_one(mm.executor())
        .await?;
        Ok(row)
    }

    pub async fn upsert_bookmark(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        lesson_id: Uuid,
        bookmarked: bool,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO progress (id, user_id, lesson_id, bookmarked)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
                SET bookmarked = EXCLUDED.bookmarked,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(progress_key(actor.user_id(), lesson_id))
        .bind(actor.user_id())
        .bind(lesson_id)
        .bind(bookmarked)
        .fetch_one(mm.executor())
        .await?;
        Ok(row)
    }

    pub async fn all_for_user(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            "SELECT * FROM progress WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(actor.user_id())
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }

    pub async fn count_for_user_by_status(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        status: &str,
    ) -> DatabaseResult<i64> {
        let count =
            sqlx::query_scalar("SELECT COUNT(*) FROM progress WHERE user_id = $1 AND status = $2")
                .bind(actor.user_id())
                .bind(status)
                .fetch_one(mm.executor())
                .await?;
        Ok(count)
    }

    pub async fn count_bookmarked_for_user(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
    ) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM progress WHERE user_id = $1 AND bookmarked = true",
        )
        .bind(actor.user_id())
        .fetch_one(mm.executor())
        .await?;
        Ok(count)
    }

    pub async fn count_completed_for_lesson(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        lesson_id: Uuid,
    ) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM progress WHERE lesson_id = $1 AND status = 'completed'",
        )
        .bind(lesson_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(count)
    }

    pub async fn count_bookmarked_for_lesson(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        lesson_id: Uuid,
    ) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM progress WHERE lesson_id = $1 AND bookmarked = true",
        )
        .bind(lesson_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn progress_key_is_deterministic() {
        let user = Uuid::new_v4();
        let lesson = Uuid::new_v4();
        assert_eq!(progress_key(user, lesson), progress_key(user, lesson));
        assert_eq!(progress_key(user, lesson), format!("{user}_{lesson}"));
    }
}
