use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::Module;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    id: Uuid,
    title: String,
    description: String,
    level: String,
    tags: Vec<String>,
    order_index: i32,
    lesson_count: i64,
}

impl ModuleSummary {
    pub fn new(module: Module, lesson_count: i64) -> Self {
        Self {
            id: module.id(),
            title: module.title().to_owned(),
            description: module.description().to_owned(),
            level: module.level().to_owned(),
            tags: module.tags().to_vec(),
            order_index: module.order_index(),
            lesson_count,
        }
    }
}
