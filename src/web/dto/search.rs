use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::{Lesson, Module};

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    id: Uuid,
    #[serde(rename = "type")]
    kind: &'static str,
    title: String,
    description: String,
    level: String,
    tags: Vec<String>,
}

impl SearchItem {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl From<Module> for SearchItem {
    fn from(module: Module) -> Self {
        Self {
            id: module.id(),
            kind: "module",
            title: module.title().to_owned(),
            description: module.description().to_owned(),
            level: module.level().to_owned(),
            tags: module.tags().to_vec(),
        }
    }
}

// Lesson hits drop the body, search results stay lightweight.
impl From<Lesson> for SearchItem {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id(),
            kind: "lesson",
            title: lesson.title().to_owned(),
            description: lesson.description().to_owned(),
            level: lesson.level().to_owned(),
            tags: lesson.tags().to_vec(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPagination {
    pub limit: i64,
    pub has_more: bool,
    pub next_cursor: Option<Uuid>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchReply {
    pub data: Vec<SearchItem>,
    pub pagination: SearchPagination,
}
