use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::evaluator::Verdict;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseBody {
    pub lesson_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub time_ms: Option<i64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseReply {
    pub result: Verdict,
    pub score: f64,
    pub explanation: String,
    pub response_id: Uuid,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LlmFeedbackBody {
    pub lesson_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub mode: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LlmFeedbackReply {
    pub feedback: String,
    pub suggested_improvements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackMode {
    Hint,
    Rubric,
    Improve,
}

impl FeedbackMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "hint" => Some(Self::Hint),
            "rubric" => Some(Self::Rubric),
            "improve" => Some(Self::Improve),
            _ => None,
        }
    }

    /// Canned feedback per mode. A stand-in for a real model call that keeps
    /// the endpoint contract stable until one is wired up.
    pub fn render(self, question_prompt: &str, answer: &str) -> LlmFeedbackReply {
        match self {
            Self::Hint => LlmFeedbackReply {
                feedback: format!(
                    "Hint: Re-read the lesson material carefully. Think about what \
                     \"{question_prompt}\" is really asking. Focus on the key concepts mentioned."
                ),
                suggested_improvements: vec![
                    "Review the lesson content".to_string(),
                    "Consider each option carefully".to_string(),
                ],
            },
            Self::Rubric => LlmFeedbackReply {
                feedback: format!(
                    "Rubric evaluation for your answer \"{answer}\":\n\
                     - Relevance: Does your answer address the question?\n\
                     - Completeness: Did you consider all aspects?\n\
                     - Accuracy: Is the information factually correct?"
                ),
                suggested_improvements: vec![
                    "Ensure your answer addresses all parts of the question".to_string(),
                    "Provide specific examples where possible".to_string(),
                    "Check factual accuracy".to_string(),
                ],
            },
            Self::Improve => LlmFeedbackReply {
                feedback: "To improve your answer, consider:\n\
                           1. Being more specific in your response.\n\
                           2. Referencing concepts from the lesson material.\n\
                           3. Structuring your answer more clearly."
                    .to_string(),
                suggested_improvements: vec![
                    "Add more specific details".to_string(),
                    "Reference lesson concepts explicitly".to_string(),
                    "Improve answer structure".to_string(),
                ],
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_the_three_known_modes_parse() {
        assert_eq!(FeedbackMode::parse("hint"), Some(FeedbackMode::Hint));
        assert_eq!(FeedbackMode::parse("rubric"), Some(FeedbackMode::Rubric));
        assert_eq!(FeedbackMode::parse("improve"), Some(FeedbackMode::Improve));
        assert_eq!(FeedbackMode::parse("Hint"), None);
        assert_eq!(FeedbackMode::parse("explain"), None);
    }

    #[test]
    fn hint_embeds_the_question_prompt() {
        let reply = FeedbackMode::Hint.render("What is few-shot prompting?", "");
        assert!(reply.feedback.contains("What is few-shot prompting?"));
        assert_eq!(reply.suggested_improvements.len(), 2);
    }

    #[test]
    fn rubric_embeds_the_learner_answer() {
        let reply = FeedbackMode::Rubric.render("prompt", "my answer");
        assert!(reply.feedback.contains("my answer"));
    }
}
