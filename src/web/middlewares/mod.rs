mod auth;
pub use auth::{extract_context_fn, require_admin_fn};
