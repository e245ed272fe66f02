use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::{Choice, Question};

/// Learner-facing projection of a question. The answer key and the canned
/// explanation never leave the server through this type, they are only
/// revealed by the grading endpoint after a submission.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearnerQuestion {
    id: Uuid,
    #[serde(rename = "type")]
    question_type: String,
    prompt: String,
    choices: Vec<Choice>,
    points: i32,
}

impl From<Question> for LearnerQuestion {
    fn from(question: Question) -> Self {
        Self {
            id: question.id(),
            question_type: question.question_type().to_owned(),
            prompt: question.prompt().to_owned(),
            choices: question.choices().to_vec(),
            points: question.points(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn question() -> Question {
        serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "lesson_id": Uuid::new_v4(),
            "question_type": "mcq",
            "prompt": "Which option?",
            "choices": [{"id": "A", "text": "first"}, {"id": "B", "text": "second"}],
            "answer_key": ["A"],
            "explanation": "A is right because it is first.",
            "points": 2,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z",
        }))
        .expect("valid question json")
    }

    #[test]
    fn learner_projection_never_leaks_the_answer_key() {
        let projected = LearnerQuestion::from(question());
        let value = serde_json::to_value(&projected).expect("serializes");
        let obj = value.as_object().expect("object");

        assert!(obj.get("answerKey").is_none());
        assert!(obj.get("answer_key").is_none());
        assert!(obj.get("explanation").is_none());
        assert_eq!(obj["type"], "mcq");
        assert_eq!(obj["points"], 2);
    }
}
