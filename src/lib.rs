// region:    --- Imports
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use state::AppState;
use tower_http::cors::{Any, CorsLayer};

// endregion: --- Imports

// region:    --- Modules
pub mod admin;
pub mod auction;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod query;
pub mod session;
pub mod state;
pub mod store;

// endregion: --- Modules

// region:    --- Router

/// 전체 라우터. 알려진 경로의 다른 메서드는 405, 모르는 경로는 404.
pub fn app(state: AppState) -> Router {
    use handlers::*;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_index).fallback(method_not_allowed))
        .route(
            "/login",
            get(handle_login_form)
                .post(handle_login)
                .fallback(method_not_allowed),
        )
        .route("/logout", get(handle_logout).fallback(method_not_allowed))
        .route(
            "/register",
            get(handle_register_form)
                .post(handle_register)
                .fallback(method_not_allowed),
        )
        .route(
            "/categories",
            get(handle_categories).fallback(method_not_allowed),
        )
        .route(
            "/categories/:id",
            get(handle_category).fallback(method_not_allowed),
        )
        .route(
            "/watchlist",
            get(handle_watchlist).fallback(method_not_allowed),
        )
        .route(
            "/create",
            get(handle_create_form)
                .post(handle_create)
                .fallback(method_not_allowed),
        )
        .route(
            "/listing/:id",
            get(handle_listing).fallback(method_not_allowed),
        )
        .route(
            "/listing/:id/close",
            post(handle_close).fallback(method_not_allowed),
        )
        .route(
            "/listing/:id/bid",
            post(handle_bid).fallback(method_not_allowed),
        )
        .route(
            "/listing/:id/comment",
            post(handle_comment).fallback(method_not_allowed),
        )
        .route(
            "/listing/:id/watchlist/add",
            post(handle_watchlist_add).fallback(method_not_allowed),
        )
        .route(
            "/listing/:id/watchlist/remove",
            post(handle_watchlist_remove).fallback(method_not_allowed),
        )
        .route(
            "/admin/inspect",
            get(admin::handle_inspect).fallback(method_not_allowed),
        )
        .route(
            "/admin/categories",
            post(admin::handle_create_category).fallback(method_not_allowed),
        )
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

// endregion: --- Router
