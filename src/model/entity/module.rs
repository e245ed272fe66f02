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
pub struct Module {
    id: Uuid,
    title: String,
    description: String,
    level: String,
    tags: Vec<String>,
    order_index: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ModuleCreate {
    pub title: String,
    pub description: String,
    pub level: String,
    pub tags: Vec<String>,
    pub order_index: Option<i32>,
}

impl ResourceTyped for Module {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Module
    }
}

impl Module {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[async_trait]
impl CrudRepository<Module, ModuleCreate, uuid::Uuid> for Module {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ModuleCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query(
            "INSERT INTO modules (id, title, description, level, tags, order_index) VALUES ($1,$2,$3,$4,$5,$6) RETURNING id, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.level)
        .bind(&data.tags)
        .bind(data.order_index.unwrap_or(0))
        .fetch_one(mm.executor())
        .await?;

        Ok(Module {
            id: row.try_get("id")?,
            title: data.title,
            description: data.description,
            level: data.level,
            tags: data.tags,
            order_index: data.order_index.unwrap_or(0),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ModuleCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            "UPDATE modules SET title = $1, description = $2, level = $3, tags = $4, order_index = $5, updated_at = now() WHERE id = $6",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.level)
        .bind(&data.tags)
        .bind(data.order_index.unwrap_or(0))
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.title = data.title;
        self.description = data.description;
        self.level = data.level;
        self.tags = data.tags;
        self.order_index = data.order_index.unwrap_or(0);
        self.updated_at = Utc::now();
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM modules WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM modules WHERE id = $1")
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
            sqlx::query_as("SELECT * FROM modules ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(mm.executor())
                .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM modules")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

// Utils

impl Module {
    /// Catalog listing with optional level and free-text filters, newest
    /// first. Text search is a plain ILIKE over title and description.
    pub async fn list_filtered(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        level: Option<&str>,
        query: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT * FROM modules
            WHERE ($1::text IS NULL OR level = $1)
              AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%' OR description ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(level)
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
        query: Option<&str>,
    ) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM modules
            WHERE ($1::text IS NULL OR level = $1)
              AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%' OR description ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(level)
        .bind(query)
        .fetch_one(mm.executor())
        .await?;
        Ok(count)
    }

    /// All modules in creation order. Level ordering for the roadmap is done
    /// in Rust so the "unknown level sorts last" rule lives in one place.
    pub async fn all_by_creation(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as("SELECT * FROM modules ORDER BY created_at ASC")
            .fetch_all(mm.executor())
            .await?;
        Ok(rows)
    }

    /// Batched insert for the import console. All rows land in one
    /// transaction, a bad row aborts the whole batch.
    pub async fn create_many(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        items: Vec<ModuleCreate>,
    ) -> DatabaseResult<Vec<Uuid>> {
        let mut tx = mm.executor().begin().await?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO modules (id, title, description, level, tags, order_index) VALUES ($1,$2,$3,$4,$5,$6)",
            )
            .bind(id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.level)
            .bind(&item.tags)
            .bind(item.order_index.unwrap_or(0))
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
            SELECT * FROM modules
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
