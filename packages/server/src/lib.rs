pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "School Registry API",
        version = "1.0.0",
        description = "Faculties, students and student avatars"
    ),
    paths(
        handlers::faculty::create_faculty,
        handlers::faculty::update_faculty,
        handlers::faculty::delete_faculty,
        handlers::faculty::get_faculty,
        handlers::faculty::list_faculties,
        handlers::faculty::filter_faculties_by_color,
        handlers::faculty::faculties_by_color_or_name,
        handlers::faculty::faculty_by_student,
        handlers::faculty::longest_faculty_name,
        handlers::student::create_student,
        handlers::student::update_student,
        handlers::student::delete_student,
        handlers::student::get_student,
        handlers::student::list_students,
        handlers::student::filter_students_by_age,
        handlers::student::students_by_age_between,
        handlers::student::students_by_faculty,
        handlers::student::count_students,
        handlers::student::average_age,
        handlers::student::average_age_computed,
        handlers::student::last_five_students,
        handlers::student::names_starting_with,
        handlers::avatar::upload_avatar,
        handlers::avatar::get_avatar,
        handlers::avatar::download_avatar_from_db,
        handlers::avatar::download_avatar_from_file,
        handlers::avatar::list_avatars,
    ),
    tags(
        (name = "Faculties", description = "Faculty CRUD and lookups"),
        (name = "Students", description = "Student CRUD and filters"),
        (name = "Student Statistics", description = "Aggregates over all students"),
        (name = "Avatars", description = "Student avatar upload and download"),
    ),
)]
pub struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let api = ApiDoc::openapi();
    let cors = cors_layer(&state.config.server.cors);

    let router = routes::api_routes(&state.config)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// `None` when no origins are configured.
fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if config.allow_origins.is_empty() {
        return None;
    }

    let origin = if config.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allow_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(Duration::from_secs(config.max_age)),
    )
}
