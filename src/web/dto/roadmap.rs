use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::{Module, RoadmapLessonRow};

/// Roadmap node: a module, its published lessons (id + title only) and,
/// for authenticated callers, the progress overlay with the unlock state.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapModule {
    id: Uuid,
    title: String,
    description: String,
    level: String,
    tags: Vec<String>,
    lessons: Vec<RoadmapLessonRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    percent: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locked: Option<bool>,
}

impl RoadmapModule {
    pub fn new(module: &Module, lessons: Vec<RoadmapLessonRow>) -> Self {
        Self {
            id: module.id(),
            title: module.title().to_owned(),
            description: module.description().to_owned(),
            level: module.level().to_owned(),
            tags: module.tags().to_vec(),
            lessons,
            percent: None,
            locked: None,
        }
    }

    pub fn with_overlay(mut self, percent: i32, locked: bool) -> Self {
        self.percent = Some(percent);
        self.locked = Some(locked);
        self
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RoadmapReply {
    pub modules: Vec<RoadmapModule>,
}
