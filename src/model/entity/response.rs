use crate::core::engagement::ResponseSample;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

/// One learner submission attempt and its grading outcome. Append-only:
/// there is deliberately no update or delete path, every attempt gets its
/// own row and retries are always safe.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ResponseEntity {
    id: Uuid,
    user_id: Uuid,
    lesson_id: Uuid,
    question_id: Uuid,
    answer: String,
    result: String,
    score: f64,
    time_ms: Option<i64>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ResponseCreate {
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub result: String,
    pub score: f64,
    pub time_ms: Option<i64>,
}

impl ResourceTyped for ResponseEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Response
    }
}

impl ResponseEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ResponseCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query(
            r#"
            INSERT INTO responses (id, user_id, lesson_id, question_id, answer, result, score, time_ms)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.lesson_id)
        .bind(data.question_id)
        .bind(&data.answer)
        .bind(&data.result)
        .bind(data.score)
        .bind(data.time_ms)
        .fetch_one(mm.executor())
        .await?;

        Ok(ResponseEntity {
            id: row.try_get("id")?,
            user_id: data.user_id,
            lesson_id: data.lesson_id,
            question_id: data.question_id,
            answer: data.answer,
            result: data.result,
            score: data.score,
            time_ms: data.time_ms,
            created_at: row.try_get("created_at")?,
        })
    }

    /// Response rows for one lesson reduced to the (user, score) pairs the
    /// engagement rollup folds over. One filtered read per lesson.
    pub async fn samples_for_lesson(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        lesson_id: Uuid,
    ) -> DatabaseResult<Vec<ResponseSample>> {
        let rows: Vec<(Uuid, f64)> =
            sqlx::query_as("SELECT user_id, score FROM responses WHERE lesson_id = $1")
                .bind(lesson_id)
                .fetch_all(mm.executor())
                .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, score)| ResponseSample { user_id, score })
            .collect())
    }
}
