//! Roadmap ordering and unlock gating.
//!
//! Modules are presented beginner → intermediate → advanced, ties broken by
//! creation order. A module is locked while the previous one sits below 50%
//! lesson completion; exactly 50 unlocks. The lock is never stored, it is
//! recomputed from per-module completion counts on every read.

use serde::{Deserialize, Serialize};

pub static UNLOCK_THRESHOLD_PCT: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Unknown levels sort last, matching the catalog's display rule.
    pub fn rank(raw: &str) -> u8 {
        match Self::parse(raw) {
            Some(Self::Beginner) => 0,
            Some(Self::Intermediate) => 1,
            Some(Self::Advanced) => 2,
            None => u8::MAX,
        }
    }
}

/// Per-module lesson completion, already aggregated by the caller.
#[derive(Debug, Clone, Copy)]
pub struct ModuleCompletion {
    pub completed: i64,
    pub total: i64,
}

impl ModuleCompletion {
    /// Rounded completion percentage. A module with no lessons reports 0;
    /// it is itself unlocked but contributes no progress toward unlocking
    /// the next module.
    pub fn percent(&self) -> i32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as i32
    }
}

/// Compute the locked flag for each module in presentation order.
/// The first module is always unlocked.
pub fn compute_locks(completions: &[ModuleCompletion]) -> Vec<bool> {
    let mut locks = Vec::with_capacity(completions.len());
    for (i, _) in completions.iter().enumerate() {
        let locked = if i == 0 {
            false
        } else {
            completions[i - 1].percent() < UNLOCK_THRESHOLD_PCT
        };
        locks.push(locked);
    }
    locks
}

#[cfg(test)]
mod test {
    use super::*;

    fn c(completed: i64, total: i64) -> ModuleCompletion {
        ModuleCompletion { completed, total }
    }

    #[test]
    fn level_ordering() {
        assert!(Level::Beginner < Level::Intermediate);
        assert!(Level::Intermediate < Level::Advanced);
        assert_eq!(Level::rank("Advanced"), 2);
        assert_eq!(Level::rank("mystery"), u8::MAX);
    }

    #[test]
    fn first_module_is_always_unlocked() {
        assert_eq!(compute_locks(&[c(0, 5)]), vec![false]);
    }

    #[test]
    fn exactly_fifty_percent_unlocks_the_next_module() {
        // A: 1 of 2 completed = 50% -> B unlocks at the boundary.
        let locks = compute_locks(&[c(1, 2), c(0, 3)]);
        assert_eq!(locks, vec![false, false]);
    }

    #[test]
    fn below_fifty_percent_keeps_the_next_module_locked() {
        let locks = compute_locks(&[c(1, 3), c(0, 3)]);
        assert_eq!(locks, vec![false, true]);
    }

    #[test]
    fn empty_module_gates_its_successor() {
        // Zero lessons report 0%, so the next module stays locked.
        let locks = compute_locks(&[c(0, 0), c(0, 2)]);
        assert_eq!(locks, vec![false, true]);
        assert_eq!(c(0, 0).percent(), 0);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(c(1, 3).percent(), 33);
        assert_eq!(c(2, 3).percent(), 67);
        assert_eq!(c(2, 2).percent(), 100);
    }
}
