// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, attempts, auth, catalog, manage, presence, profile, test},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, faculty_middleware, optional_auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, catalog, tests, attempts, manage, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, run registry).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let catalog_routes = Router::new()
        .route("/categories", get(catalog::list_categories))
        .route("/categories/{id}/topics", get(catalog::list_category_topics))
        .route("/topics/{id}", get(catalog::get_topic));

    let presence_routes = Router::new()
        .route(
            "/heartbeat",
            post(presence::heartbeat).layer(middleware::from_fn_with_state(
                state.clone(),
                optional_auth_middleware,
            )),
        )
        .route("/stats", get(presence::stats));

    // Everything below requires a resolved identity; an unauthenticated
    // request is turned away before any run state is touched.
    let profile_routes = Router::new()
        .route("/me", get(profile::get_me).put(profile::update_me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let test_routes = Router::new()
        .route("/start", post(test::start_test))
        .route("/runs/{id}", get(test::run_state))
        .route("/runs/{id}/answer", post(test::answer_question))
        .route("/runs/{id}/next", post(test::next_question))
        .route("/runs/{id}/submit", post(test::submit_run))
        .route("/runs/{id}/result", get(test::run_result))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let attempt_routes = Router::new()
        .route("/", get(attempts::list_my_attempts))
        .route("/stats", get(attempts::my_stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Content management: faculty and admin.
    let manage_routes = Router::new()
        .route("/topics", post(manage::create_topic))
        .route(
            "/topics/{id}",
            put(manage::update_topic).delete(manage::delete_topic),
        )
        .route("/topics/{id}/questions", get(manage::list_topic_questions))
        .route("/questions", post(manage::create_question))
        .route(
            "/questions/{id}",
            put(manage::update_question).delete(manage::delete_question),
        )
        // Double middleware protection: Auth first, then role check
        .layer(middleware::from_fn(faculty_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/categories", post(admin::create_category))
        .route(
            "/categories/{id}",
            put(admin::update_category).delete(admin::delete_category),
        )
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", catalog_routes)
        .nest("/api/presence", presence_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/tests", test_routes)
        .nest("/api/attempts", attempt_routes)
        .nest("/api/manage", manage_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
