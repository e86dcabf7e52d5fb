use axum::{middleware, routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::app_state::AppState;
use crate::middleware::tracing::observability_middleware;
use crate::modules::admin::routes::admin_routes;
use crate::modules::public::handlers::health_check;
use crate::modules::public::routes::public_routes;

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.env.app.static_dir.clone();
    let index_file = format!("{}/index.html", static_dir);

    let api = public_routes(state.clone()).nest("/admin", admin_routes(state.clone()));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        // the front-end is a static site; unknown paths fall back to
        // index.html so client-side routes resolve
        .fallback_service(ServeDir::new(&static_dir).not_found_service(ServeFile::new(index_file)))
        .layer(middleware::from_fn(observability_middleware))
        .with_state(state)
}
