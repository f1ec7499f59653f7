use axum::{
    Router,
    routing::{get, post},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .nest("/faculty", faculty_routes())
        .nest("/student", student_routes())
        .nest("/avatar", avatar_routes(config))
}

fn faculty_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::faculty::list_faculties).post(handlers::faculty::create_faculty),
        )
        .route("/filtered", get(handlers::faculty::filter_faculties_by_color))
        .route(
            "/by-color-or-name",
            get(handlers::faculty::faculties_by_color_or_name),
        )
        .route("/by-student", get(handlers::faculty::faculty_by_student))
        .route("/longest-name", get(handlers::faculty::longest_faculty_name))
        .route(
            "/{id}",
            get(handlers::faculty::get_faculty)
                .put(handlers::faculty::update_faculty)
                .delete(handlers::faculty::delete_faculty),
        )
}

fn student_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::student::list_students).post(handlers::student::create_student),
        )
        .route("/filtered", get(handlers::student::filter_students_by_age))
        .route("/age-between", get(handlers::student::students_by_age_between))
        .route("/by-faculty", get(handlers::student::students_by_faculty))
        .route("/count", get(handlers::student::count_students))
        .route("/average-age", get(handlers::student::average_age))
        .route(
            "/average-age-computed",
            get(handlers::student::average_age_computed),
        )
        .route("/last-five", get(handlers::student::last_five_students))
        .route(
            "/names-starting-with",
            get(handlers::student::names_starting_with),
        )
        .route(
            "/{id}",
            get(handlers::student::get_student)
                .put(handlers::student::update_student)
                .delete(handlers::student::delete_student),
        )
}

fn avatar_routes(config: &AppConfig) -> Router<AppState> {
    let upload = post(handlers::avatar::upload_avatar).layer(
        handlers::avatar::avatar_upload_body_limit(config.storage.max_avatar_size),
    );

    Router::new()
        .route("/", get(handlers::avatar::list_avatars))
        .route("/{id}", get(handlers::avatar::get_avatar).merge(upload))
        .route("/{id}/from-db", get(handlers::avatar::download_avatar_from_db))
        .route(
            "/{id}/from-file",
            get(handlers::avatar::download_avatar_from_file),
        )
}
