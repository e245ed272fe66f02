use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::Lesson;
use crate::web::dto::questions::LearnerQuestion;

/// Catalog listing row: everything about a lesson except its body.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    id: Uuid,
    module_id: Option<Uuid>,
    title: String,
    description: String,
    level: String,
    tags: Vec<String>,
    published: bool,
    order_index: i32,
    topic: String,
    duration: String,
}

impl From<Lesson> for LessonSummary {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id(),
            module_id: lesson.module_id(),
            title: lesson.title().to_owned(),
            description: lesson.description().to_owned(),
            level: lesson.level().to_owned(),
            tags: lesson.tags().to_vec(),
            published: lesson.published(),
            order_index: lesson.order_index(),
            topic: lesson.topic().to_owned(),
            duration: lesson.duration().to_owned(),
        }
    }
}

/// Full lesson payload with its questions, answer keys stripped.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetail {
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
    questions: Vec<LearnerQuestion>,
}

impl LessonDetail {
    pub fn new(lesson: Lesson, questions: Vec<LearnerQuestion>) -> Self {
        Self {
            id: lesson.id(),
            module_id: lesson.module_id(),
            title: lesson.title().to_owned(),
            description: lesson.description().to_owned(),
            content: lesson.content().to_owned(),
            level: lesson.level().to_owned(),
            tags: lesson.tags().to_vec(),
            published: lesson.published(),
            order_index: lesson.order_index(),
            topic: lesson.topic().to_owned(),
            duration: lesson.duration().to_owned(),
            questions,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn lesson() -> Lesson {
        serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "module_id": null,
            "title": "Role prompting",
            "description": "Assigning the model a persona",
            "content": "Long body text",
            "level": "beginner",
            "tags": ["prompting"],
            "published": true,
            "order_index": 1,
            "topic": "basics",
            "duration": "10 min",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
        }))
        .expect("valid lesson json")
    }

    #[test]
    fn summary_omits_the_lesson_body() {
        let value = serde_json::to_value(LessonSummary::from(lesson())).expect("serializes");
        let obj = value.as_object().expect("object");

        assert!(obj.get("content").is_none());
        assert_eq!(obj["title"], "Role prompting");
        assert_eq!(obj["moduleId"], serde_json::Value::Null);
    }

    #[test]
    fn detail_keeps_the_body_and_questions() {
        let value =
            serde_json::to_value(LessonDetail::new(lesson(), vec![])).expect("serializes");
        let obj = value.as_object().expect("object");

        assert_eq!(obj["content"], "Long body text");
        assert!(obj["questions"].as_array().expect("array").is_empty());
    }
}
