// Route definitions

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

mod api;

// Assembles the JSON API. All handlers expect AppState via the State
// extractor; the state is provided here so main.rs can serve the router
// as-is.
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/chat", post(api::chat))
        .route("/search", post(api::search_vehicles))
        .route("/recommend", get(api::recommend))
        .route("/makers", get(api::get_makers))
        .route("/models/:maker", get(api::get_models))
        .route("/selling-points", post(api::selling_points))
        .route("/favorites", get(api::list_favorites))
        .route("/favorites", post(api::toggle_favorite))
        .route("/notifications", post(api::toggle_notification))
        .route("/history", get(api::get_history))
        .with_state(app_state);

    Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
}
