use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lesson {
    id: Uuid,
    module_id: Option<Uuid>,
    title: String,
    description: String,
    content: String,
    level: String,
    tags: Vec<String>,
    published: bool,
    order_index: i32,
    topic: String,
    duration: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LessonCreate {
    pub module_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub content: String,
    pub level: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub order_index: Option<i32>,
    pub topic: String,
    pub duration: String,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Option<Uuid> {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn published(&self) -> bool {
        self.published
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, uuid::Uuid> for Lesson {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query(
            r#"
            INSERT INTO lessons (id, module_id, title, description, content, level, tags, published, order_index, topic, duration)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.module_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.content)
        .bind(&data.level)
        .bind(&data.tags)
        .bind(data.published)
        .bind(data.order_index.unwrap_or(0))
        .bind(&data.topic)
        .bind(&data.duration)
        .fetch_one(mm.executor())
        .await?;

        Ok(Lesson {
            id: row.try_get("id")?,
            module_id: data.module_id,
            title: data.title,
            description: data.description,
            content: data.content,
            level: data.level,
            tags: data.tags,
            published: data.published,
            order_index: data.order_index.unwrap_or(0),
            topic: data.topic,
            duration: data.duration,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE lessons
            SET module_id = $1, title = $2, description = $3, content = $4, level = $5,
                tags = $6, published = $7, order_index = $8, topic = $9, duration = $10,
                updated_at = now()
            WHERE id = $11
            "#,
        )
        .bind(data.module_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.content)
        .bind(&data.level)
        .bind(&data.tags)
        .bind(data.published)
        .bind(data.order_index.unwrap_or(0))
        .bind(&data.topic)
        .bind(&data.duration)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.module_id = data.module_id;
        self.title = data.title;
        self.description = data.description;
        self.content = data.content;
        self.level = data.level;
        self.tags = data.tags;
        self.published = data.published;
        self.order_index = data.order_index.unwrap_or(0);
        self.topic = data.topic;
        self.duration = data.duration;
        self.updated_at = Utc::now();
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        // questions cascade at the schema level
        sqlx::query("DELETE FROM lessons WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
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
            sqlx::query_as("SELECT * FROM lessons ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

// Utils

/// Lightweight lesson reference for the roadmap: id and title only, no
/// content payload.
#[derive(Debug, Clone, Serialize, FromRow, utoipa::ToSchema)]
pub struct RoadmapLessonRow {
    pub id: Uuid,
    pub title: String,
}

impl Lesson {
    pub async fn list_filtered(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        level: Option<&str>,
        tag: Option<&str>,
        query: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT * FROM lessons
            WHERE ($1::text IS NULL OR level = $1)
              AND ($2::text IS NULL OR $2 = ANY(tags))
              AND ($3::text IS NULL OR title ILIKE '%' || $3 || '%' OR description ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(level)
        .bind(tag)
        .bind(query)
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }

    pub async fn count_filtered(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        level: Option<&str>,
        tag: Option<&str>,
        query: Option<&str>,
    ) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM lessons
            WHERE ($1::text IS NULL OR level = $1)
              AND ($2::text IS NULL OR $2 = ANY(tags))
              AND ($3::text IS NULL OR title ILIKE '%' || $3 || '%' OR description ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(level)
        .bind(tag)
        .bind(query)
        .fetch_one(mm.executor())
        .await?;
        Ok(count)
    }

    pub async fn all_by_module(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        module_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            "SELECT * FROM lessons WHERE module_id = $1 ORDER BY order_index ASC LIMIT $2 OFFSET $3",
        )
        .bind(module_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }

    pub async fn count_by_module(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        module_id: Uuid,
    ) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE module_id = $1")
            .bind(module_id)
            .fetch_one(mm.executor())
            .await?;
        Ok(count)
    }

    pub async fn count_published(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE published = true")
            .fetch_one(mm.executor())
            .await?;
        Ok(count)
    }

    pub async fn published_refs_by_module(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        module_id: Uuid,
    ) -> DatabaseResult<Vec<RoadmapLessonRow>> {
        let rows = sqlx::query_as(
            "SELECT id, title FROM lessons WHERE module_id = $1 AND published = true ORDER BY created_at ASC",
        )
        .bind(module_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }

    /// Lessons ordered by creation time for the engagement report; the
    /// caller picks the direction.
    pub async fn all_by_creation(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        newest_first: bool,
    ) -> DatabaseResult<Vec<Self>> {
        let sql = if newest_first {
            "SELECT * FROM lessons ORDER BY created_at DESC"
        } else {
            "SELECT * FROM lessons ORDER BY created_at ASC"
        };
        let rows = sqlx::query_as(sql).fetch_all(mm.executor()).await?;
        Ok(rows)
    }

    pub async fn set_published(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
        published: bool,
    ) -> DatabaseResult<()> {
        sqlx::query("UPDATE lessons SET published = $1, updated_at = now() WHERE id = $2")
            .bind(published)
            .bind(id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    /// Batched insert for the import console, single transaction.
    pub async fn create_many(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        items: Vec<LessonCreate>,
    ) -> DatabaseResult<Vec<Uuid>> {
        let mut tx = mm.executor().begin().await?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = Uuid::new_v4();
            sqlx::query(
                r#"
                INSERT INTO lessons (id, module_id, title, description, content, level, tags, published, order_index, topic, duration)
                VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
                "#,
            )
            .bind(id)
            .bind(item.module_id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.content)
            .bind(&item.level)
            .bind(&item.tags)
            .bind(item.published)
            .bind(item.order_index.unwrap_or(0))
            .bind(&item.topic)
            .bind(&item.duration)
            .execute(&mut *tx)
            .await?;
            ids.push(id);
        }
        tx.commit().await?;
        Ok(ids)
    }

    pub async fn search(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        query: &str,
        limit: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT * FROM lessons
            WHERE title ILIKE '%' || $1 || '%'
               OR description ILIKE '%' || $1 || '%'
               OR EXISTS (SELECT 1 FROM unnest(tags) tag WHERE tag ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(limit)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }
}
