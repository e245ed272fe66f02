use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::engagement::EngagementSummary;
use crate::model::entity::{
    Choice, Lesson, LessonCreate, Module, ModuleCreate, Question, QuestionCreate,
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckReply {
    pub is_admin: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreatedReply {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MutatedReply {
    pub message: String,
    pub id: Uuid,
}

// Module console payloads

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ModuleBody {
    pub title: String,
    pub description: String,
    pub level: String,
    pub tags: Option<Vec<String>>,
    pub order_index: Option<i32>,
}

impl ModuleBody {
    pub fn into_create(self) -> ModuleCreate {
        ModuleCreate {
            title: self.title,
            description: self.description,
            level: self.level.to_lowercase(),
            tags: self.tags.unwrap_or_default(),
            order_index: self.order_index,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ModuleUpdateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
    pub tags: Option<Vec<String>>,
    pub order_index: Option<i32>,
}

impl ModuleUpdateBody {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.level.is_none()
            && self.tags.is_none()
            && self.order_index.is_none()
    }

    /// Fold the provided fields over the stored module into a full payload.
    pub fn merged_with(self, module: &Module) -> ModuleCreate {
        ModuleCreate {
            title: self.title.unwrap_or_else(|| module.title().to_owned()),
            description: self
                .description
                .unwrap_or_else(|| module.description().to_owned()),
            level: self
                .level
                .map(|l| l.to_lowercase())
                .unwrap_or_else(|| module.level().to_owned()),
            tags: self.tags.unwrap_or_else(|| module.tags().to_vec()),
            order_index: Some(self.order_index.unwrap_or_else(|| module.order_index())),
        }
    }
}

// Lesson console payloads

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonBody {
    pub module_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub level: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub order: Option<i32>,
    pub topic: Option<String>,
    pub duration: Option<String>,
}

impl LessonBody {
    pub fn into_create(self) -> LessonCreate {
        LessonCreate {
            module_id: self.module_id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            content: self.content,
            level: self
                .level
                .map(|l| l.to_lowercase())
                .unwrap_or_else(|| "beginner".to_string()),
            tags: self.tags.unwrap_or_default(),
            published: self.published.unwrap_or(false),
            order_index: self.order,
            topic: self.topic.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonUpdateBody {
    pub module_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub level: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub order: Option<i32>,
    pub topic: Option<String>,
    pub duration: Option<String>,
}

impl LessonUpdateBody {
    pub fn is_empty(&self) -> bool {
        self.module_id.is_none()
            && self.title.is_none()
            && self.content.is_none()
            && self.description.is_none()
            && self.level.is_none()
            && self.tags.is_none()
            && self.published.is_none()
            && self.order.is_none()
            && self.topic.is_none()
            && self.duration.is_none()
    }

    pub fn merged_with(self, lesson: &Lesson) -> LessonCreate {
        LessonCreate {
            module_id: self.module_id.or(lesson.module_id()),
            title: self.title.unwrap_or_else(|| lesson.title().to_owned()),
            description: self
                .description
                .unwrap_or_else(|| lesson.description().to_owned()),
            content: self.content.unwrap_or_else(|| lesson.content().to_owned()),
            level: self
                .level
                .map(|l| l.to_lowercase())
                .unwrap_or_else(|| lesson.level().to_owned()),
            tags: self.tags.unwrap_or_else(|| lesson.tags().to_vec()),
            published: self.published.unwrap_or_else(|| lesson.published()),
            order_index: Some(self.order.unwrap_or_else(|| lesson.order_index())),
            topic: self.topic.unwrap_or_else(|| lesson.topic().to_owned()),
            duration: self
                .duration
                .unwrap_or_else(|| lesson.duration().to_owned()),
        }
    }
}

// Question console payloads

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBody {
    #[serde(rename = "type")]
    pub question_type: String,
    pub prompt: String,
    pub choices: Option<Vec<Choice>>,
    pub answer_key: Option<Vec<String>>,
    pub explanation: Option<String>,
    pub points: Option<i32>,
}

impl QuestionBody {
    pub fn into_create(self, lesson_id: Uuid) -> QuestionCreate {
        QuestionCreate {
            lesson_id,
            question_type: self.question_type,
            prompt: self.prompt,
            choices: self.choices.unwrap_or_default(),
            answer_key: self.answer_key.unwrap_or_default(),
            explanation: self.explanation.unwrap_or_default(),
            points: self.points,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdateBody {
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub prompt: Option<String>,
    pub choices: Option<Vec<Choice>>,
    pub answer_key: Option<Vec<String>>,
    pub explanation: Option<String>,
    pub points: Option<i32>,
}

impl QuestionUpdateBody {
    pub fn is_empty(&self) -> bool {
        self.question_type.is_none()
            && self.prompt.is_none()
            && self.choices.is_none()
            && self.answer_key.is_none()
            && self.explanation.is_none()
            && self.points.is_none()
    }

    pub fn merged_with(self, question: &Question) -> QuestionCreate {
        QuestionCreate {
            lesson_id: question.lesson_id(),
            question_type: self
                .question_type
                .unwrap_or_else(|| question.question_type().to_owned()),
            prompt: self.prompt.unwrap_or_else(|| question.prompt().to_owned()),
            choices: self.choices.unwrap_or_else(|| question.choices().to_vec()),
            answer_key: self
                .answer_key
                .unwrap_or_else(|| question.answer_key().to_vec()),
            explanation: self
                .explanation
                .unwrap_or_else(|| question.explanation().to_owned()),
            points: Some(self.points.unwrap_or_else(|| question.points())),
        }
    }
}

/// Bulk-import question document. Unlike the per-lesson create route, the
/// target lesson travels inside the document.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionImportBody {
    pub lesson_id: Uuid,
    #[serde(flatten)]
    pub question: QuestionBody,
}

// Bulk import / publish / analytics

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BulkImportBody {
    pub collection: String,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportReply {
    pub message: String,
    pub imported_count: usize,
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishLessonBody {
    pub lesson_id: Uuid,
    pub published: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishLessonReply {
    pub message: String,
    pub lesson_id: Uuid,
    pub published: bool,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct EngagementQuery {
    /// `asc` or `desc` by lesson creation time; defaults to `desc`.
    pub order: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EngagementReply {
    pub data: Vec<EngagementSummary>,
}
