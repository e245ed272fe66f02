use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct ReportEntity {
    id: Uuid,
    user_id: Uuid,
    email: String,
    report_type: String,
    message: String,
    #[schema(value_type = Object)]
    context: serde_json::Value,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReportCreate {
    pub user_id: Uuid,
    pub email: String,
    pub report_type: String,
    pub message: String,
    pub context: serde_json::Value,
}

impl ResourceTyped for ReportEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Report
    }
}

impl ReportEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ReportCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query(
            r#"
            INSERT INTO reports (id, user_id, email, report_type, message, context)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING id, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.email)
        .bind(&data.report_type)
        .bind(&data.message)
        .bind(&data.context)
        .fetch_one(mm.executor())
        .await?;

        Ok(ReportEntity {
            id: row.try_get("id")?,
            user_id: data.user_id,
            email: data.email,
            report_type: data.report_type,
            message: data.message,
            context: data.context,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
