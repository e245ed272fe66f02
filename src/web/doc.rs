use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct BearerAuthModifier;

impl Modify for BearerAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT for the current user"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::account::auth_signup_handler,
        crate::web::routes::account::auth_signin_handler,
        crate::web::routes::account::auth_me_handler,
        crate::web::routes::catalog::modules_list_handler,
        crate::web::routes::catalog::module_get_handler,
        crate::web::routes::catalog::module_lessons_handler,
        crate::web::routes::catalog::lessons_list_handler,
        crate::web::routes::catalog::lesson_get_handler,
        crate::web::routes::search::search_handler,
        crate::web::routes::roadmap::roadmap_handler,
        crate::web::routes::practice::submit_response_handler,
        crate::web::routes::practice::llm_feedback_handler,
        crate::web::routes::progress::save_progress_handler,
        crate::web::routes::progress::user_progress_handler,
        crate::web::routes::progress::stats_overview_handler,
        crate::web::routes::progress::bookmark_handler,
        crate::web::routes::feedback::report_handler,
        crate::web::routes::admin::admin_check_handler,
        crate::web::routes::admin::module_create_handler,
        crate::web::routes::admin::module_update_handler,
        crate::web::routes::admin::module_delete_handler,
        crate::web::routes::admin::lesson_create_handler,
        crate::web::routes::admin::lesson_update_handler,
        crate::web::routes::admin::lesson_delete_handler,
        crate::web::routes::admin::question_create_handler,
        crate::web::routes::admin::question_update_handler,
        crate::web::routes::admin::question_delete_handler,
        crate::web::routes::admin::bulk_import_handler,
        crate::web::routes::admin::publish_lesson_handler,
        crate::web::routes::admin::engagement_handler,
    ),
    modifiers(&BearerAuthModifier),
)]
pub struct ApiDoc;
