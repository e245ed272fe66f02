use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Choice {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Question {
    id: Uuid,
    lesson_id: Uuid,
    question_type: String,
    prompt: String,
    #[schema(value_type = Vec<Choice>)]
    choices: Json<Vec<Choice>>,
    answer_key: Vec<String>,
    explanation: String,
    points: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct QuestionCreate {
    pub lesson_id: Uuid,
    pub question_type: String,
    pub prompt: String,
    pub choices: Vec<Choice>,
    pub answer_key: Vec<String>,
    pub explanation: String,
    pub points: Option<i32>,
}

impl ResourceTyped for Question {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Question
    }
}

impl Question {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn question_type(&self) -> &str {
        &self.question_type
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices.0
    }

    pub fn answer_key(&self) -> &[String] {
        &self.answer_key
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn points(&self) -> i32 {
        self.points
    }
}

/// Write-time referential check for mcq answer keys: every key entry must
/// name an existing choice id. The comparison is case-insensitive because
/// grading itself is case-insensitive.
pub fn answer_key_references_choices(choices: &[Choice], answer_key: &[String]) -> bool {
    answer_key.iter().all(|key| {
        let key = key.trim().to_uppercase();
        choices.iter().any(|c| c.id.trim().to_uppercase() == key)
    })
}

#[async_trait]
impl CrudRepository<Question, QuestionCreate, uuid::Uuid> for Question {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: QuestionCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query(
            r#"
            INSERT INTO questions (id, lesson_id, question_type, prompt, choices, answer_key, explanation, points)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.lesson_id)
        .bind(&data.question_type)
        .bind(&data.prompt)
        .bind(Json(&data.choices))
        .bind(&data.answer_key)
        .bind(&data.explanation)
        .bind(data.points.unwrap_or(1))
        .fetch_one(mm.executor())
        .await?;

        Ok(Question {
            id: row.try_get("id")?,
            lesson_id: data.lesson_id,
            question_type: data.question_type,
            prompt: data.prompt,
            choices: Json(data.choices),
            answer_key: data.answer_key,
            explanation: data.explanation,
            points: data.points.unwrap_or(1),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: QuestionCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE questions
            SET lesson_id = $1, question_type = $2, prompt = $3, choices = $4,
                answer_key = $5, explanation = $6, points = $7, updated_at = now()
            WHERE id = $8
            "#,
        )
        .bind(data.lesson_id)
        .bind(&data.question_type)
        .bind(&data.prompt)
        .bind(Json(&data.choices))
        .bind(&data.answer_key)
        .bind(&data.explanation)
        .bind(data.points.unwrap_or(1))
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.lesson_id = data.lesson_id;
        self.question_type = data.question_type;
        self.prompt = data.prompt;
        self.choices = Json(data.choices);
        self.answer_key = data.answer_key;
        self.explanation = data.explanation;
        self.points = data.points.unwrap_or(1);
        self.updated_at = Utc::now();
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: uuid::Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM questions WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM questions ORDER BY created_at ASC LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

// Utils

impl Question {
    /// Batched insert for the import console, single transaction.
    pub async fn create_many(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        items: Vec<QuestionCreate>,
    ) -> DatabaseResult<Vec<Uuid>> {
        let mut tx = mm.executor().begin().await?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = Uuid::new_v4();
            sqlx::query(
                r#"
                INSERT INTO questions (id, lesson_id, question_type, prompt, choices, answer_key, explanation, points)
                VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
                "#,
            )
            .bind(id)
            .bind(item.lesson_id)
            .bind(&item.question_type)
            .bind(&item.prompt)
            .bind(Json(&item.choices))
            .bind(&item.answer_key)
            .bind(&item.explanation)
            .bind(item.points.unwrap_or(1))
            .execute(&mut *tx)
            .await?;
            ids.push(id);
        }
        tx.commit().await?;
        Ok(ids)
    }

    pub async fn find_all_by_lesson(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        lesson_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            "SELECT * FROM questions WHERE lesson_id = $1 ORDER BY created_at ASC",
        )
        .bind(lesson_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn choices(ids: &[&str]) -> Vec<Choice> {
        ids.iter()
            .map(|id| Choice {
                id: id.to_string(),
                text: format!("option {id}"),
            })
            .collect()
    }

    #[test]
    fn answer_key_check_is_case_insensitive() {
        let cs = choices(&["A", "B", "C"]);
        assert!(answer_key_references_choices(&cs, &["b".to_string()]));
        assert!(answer_key_references_choices(&cs, &[" C ".to_string()]));
    }

    #[test]
    fn answer_key_check_rejects_dangling_references() {
        let cs = choices(&["A", "B"]);
        assert!(!answer_key_references_choices(&cs, &["D".to_string()]));
        assert!(!answer_key_references_choices(
            &cs,
            &["A".to_string(), "D".to_string()]
        ));
    }

    #[test]
    fn empty_key_trivially_passes_the_reference_check() {
        // emptiness is handled separately by the evaluator fallback
        assert!(answer_key_references_choices(&choices(&["A"]), &[]));
    }
}
