//! Answer grading.
//!
//! Grades a raw learner answer against a question's answer key. Multiple
//! choice is exact-match only; short/code answers get half credit when the
//! normalized answer and a key entry contain each other. The containment rule
//! is symmetric and intentionally lenient: a very short key (e.g. "a") will
//! match almost any answer. That is a known scoring weakness carried over
//! from the product's free-text grading policy, not something to tighten
//! here.

use serde::{Deserialize, Serialize};

pub static NO_ANSWER_KEY_EXPLANATION: &str = "No answer key found for this question.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Mcq,
    Short,
    Code,
    Unknown,
}

impl From<&str> for QuestionKind {
    fn from(value: &str) -> Self {
        match value {
            "mcq" => Self::Mcq,
            "short" => Self::Short,
            "code" => Self::Code,
            _ => Self::Unknown,
        }
    }
}

impl QuestionKind {
    pub fn is_valid(raw: &str) -> bool {
        !matches!(QuestionKind::from(raw), QuestionKind::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Partial,
    Incorrect,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Partial => "partial",
            Self::Incorrect => "incorrect",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub score: f64,
    pub explanation: String,
}

impl Evaluation {
    fn no_answer_key() -> Self {
        Self {
            verdict: Verdict::Incorrect,
            score: 0.0,
            explanation: NO_ANSWER_KEY_EXPLANATION.to_string(),
        }
    }
}

/// Grade `answer` against `answer_key` for a question of `kind`.
///
/// An empty key list or an unrecognized type is a defined fallback
/// (incorrect, score 0, fixed explanation) rather than an error. On the
/// graded path the question's static `explanation` is always returned,
/// regardless of the verdict.
pub fn evaluate(kind: QuestionKind, answer: &str, answer_key: &[String], explanation: &str) -> Evaluation {
    if answer_key.is_empty() {
        return Evaluation::no_answer_key();
    }

    let (verdict, score) = match kind {
        QuestionKind::Mcq => {
            let given = answer.trim().to_uppercase();
            let hit = answer_key.iter().any(|k| k.trim().to_uppercase() == given);
            if hit {
                (Verdict::Correct, 1.0)
            } else {
                (Verdict::Incorrect, 0.0)
            }
        }
        QuestionKind::Short | QuestionKind::Code => {
            let given = answer.trim().to_lowercase();
            let keys: Vec<String> = answer_key.iter().map(|k| k.trim().to_lowercase()).collect();

            if keys.iter().any(|k| *k == given) {
                (Verdict::Correct, 1.0)
            } else if keys.iter().any(|k| given.contains(k.as_str()) || k.contains(given.as_str())) {
                (Verdict::Partial, 0.5)
            } else {
                (Verdict::Incorrect, 0.0)
            }
        }
        QuestionKind::Unknown => return Evaluation::no_answer_key(),
    };

    Evaluation {
        verdict,
        score,
        explanation: explanation.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn mcq_matches_ignoring_case_and_whitespace() {
        let ev = evaluate(QuestionKind::Mcq, "  b ", &keys(&["B"]), "because B");
        assert_eq!(ev.verdict, Verdict::Correct);
        assert_eq!(ev.score, 1.0);
        assert_eq!(ev.explanation, "because B");
    }

    #[test]
    fn mcq_has_no_partial_credit() {
        let ev = evaluate(QuestionKind::Mcq, "AB", &keys(&["A"]), "");
        assert_eq!(ev.verdict, Verdict::Incorrect);
        assert_eq!(ev.score, 0.0);
    }

    #[test]
    fn short_exact_match_is_correct() {
        let ev = evaluate(QuestionKind::Short, " Chain Of Thought ", &keys(&["chain of thought"]), "x");
        assert_eq!(ev.verdict, Verdict::Correct);
        assert_eq!(ev.score, 1.0);
    }

    #[test]
    fn short_substring_gets_partial_credit_both_directions() {
        // answer contained in key
        let ev = evaluate(QuestionKind::Short, "chain", &keys(&["chain of thought"]), "x");
        assert_eq!(ev.verdict, Verdict::Partial);
        assert_eq!(ev.score, 0.5);

        // key contained in answer
        let ev = evaluate(QuestionKind::Code, "use chain of thought always", &keys(&["chain of thought"]), "x");
        assert_eq!(ev.verdict, Verdict::Partial);
    }

    #[test]
    fn short_disjoint_answer_is_incorrect() {
        let ev = evaluate(QuestionKind::Short, "zebra", &keys(&["chain of thought"]), "x");
        assert_eq!(ev.verdict, Verdict::Incorrect);
        assert_eq!(ev.score, 0.0);
    }

    #[test]
    fn empty_answer_never_matches_nonempty_keys() {
        let ev = evaluate(QuestionKind::Mcq, "", &keys(&["B"]), "x");
        assert_eq!(ev.verdict, Verdict::Incorrect);

        // empty string is a substring of everything, so free text degrades to
        // partial. This is the documented leniency of the containment rule.
        let ev = evaluate(QuestionKind::Short, "", &keys(&["chain"]), "x");
        assert_eq!(ev.verdict, Verdict::Partial);
    }

    #[test]
    fn missing_answer_key_is_a_defined_fallback() {
        for kind in [QuestionKind::Mcq, QuestionKind::Short, QuestionKind::Code, QuestionKind::Unknown] {
            let ev = evaluate(kind, "anything", &[], "real explanation");
            assert_eq!(ev.verdict, Verdict::Incorrect);
            assert_eq!(ev.score, 0.0);
            assert_eq!(ev.explanation, NO_ANSWER_KEY_EXPLANATION);
        }
    }

    #[test]
    fn unknown_type_falls_back_even_with_keys() {
        let ev = evaluate(QuestionKind::Unknown, "B", &keys(&["B"]), "real");
        assert_eq!(ev.verdict, Verdict::Incorrect);
        assert_eq!(ev.explanation, NO_ANSWER_KEY_EXPLANATION);
    }

    #[test]
    fn verdict_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Verdict::Correct).unwrap(), "\"correct\"");
        assert_eq!(Verdict::Partial.as_str(), "partial");
    }
}
