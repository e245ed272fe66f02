//! Pure evaluation and aggregation logic. Nothing in here touches axum or
//! the database, so every rule is unit-testable with plain values.

pub mod engagement;
pub mod evaluator;
pub mod roadmap;
