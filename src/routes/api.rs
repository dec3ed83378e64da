// Handlers for backend API endpoints. Thin adapters: deserialize, call the
// core modules, serialize. Session flags (favorites, notifications) are
// merged onto outgoing vehicles here, never inside the core.

use axum::{
    extract::{Json as JsonExtract, Path, Query, State},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{ConversationTurn, QueryCriteria, Vehicle},
    resolver, sample, search,
    session::HistoryEntry,
    AppState,
};

// Result caps for the UI surfaces: search pages show up to 20, the
// recommendation feed up to 10.
const SEARCH_RESULT_LIMIT: usize = 20;
const RECOMMEND_LIMIT: usize = 10;

// --- Request / Response Structs ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    message: String,
    vehicles: Vec<Vehicle>,
}

#[derive(Deserialize)]
pub struct RecommendQuery {
    count: Option<usize>,
}

#[derive(Deserialize)]
pub struct VehicleNameRequest {
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteResponse {
    name: String,
    is_favorite: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationResponse {
    name: String,
    price_drop_notification: bool,
}

#[derive(Serialize)]
struct SellingPointsResponse {
    points: Vec<String>,
}

// Stamps session-owned flags onto vehicles leaving the API.
fn apply_session_flags(state: &AppState, vehicles: &mut [Vehicle]) {
    let session = state.session.lock().expect("session lock poisoned");
    for vehicle in vehicles.iter_mut() {
        vehicle.is_favorite = session.is_favorite(&vehicle.name);
        if vehicle.is_favorite {
            vehicle.price_drop_notification = Some(session.has_notification(&vehicle.name));
        }
    }
}

// --- API Handlers ---

pub async fn chat(
    State(app_state): State<AppState>,
    JsonExtract(request): JsonExtract<ChatRequest>,
) -> impl IntoResponse {
    tracing::info!("[HANDLER] /api/chat - Request received.");

    {
        let mut session = app_state.session.lock().expect("session lock poisoned");
        session.record_search(&request.message);
    }

    let mut resolution = resolver::resolve(
        &request.message,
        &request.history,
        app_state.catalog.records(),
        app_state.gemini.as_ref(),
    )
    .await;
    apply_session_flags(&app_state, &mut resolution.vehicles);

    Json(resolution)
}

pub async fn search_vehicles(
    State(app_state): State<AppState>,
    JsonExtract(criteria): JsonExtract<QueryCriteria>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("[HANDLER] /api/search - Criteria: {:?}", criteria);

    if criteria.is_empty() {
        return Err(AppError::NoCriteriaSupplied);
    }

    let mut vehicles = search::search(app_state.catalog.records(), &criteria);
    vehicles.truncate(SEARCH_RESULT_LIMIT);
    apply_session_flags(&app_state, &mut vehicles);

    // Zero matches is a valid empty result, not an error.
    let message = if vehicles.is_empty() {
        "条件に合う車両が見つかりませんでした。条件を変えてお試しください。".to_string()
    } else {
        format!("条件に合う車両を{}台見つけました。", vehicles.len())
    };

    Ok(Json(SearchResponse { message, vehicles }))
}

pub async fn recommend(
    State(app_state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> impl IntoResponse {
    let count = query.count.unwrap_or(RECOMMEND_LIMIT).min(RECOMMEND_LIMIT);
    tracing::info!("[HANDLER] /api/recommend - Sampling {} vehicles.", count);

    let mut vehicles = sample::sample(app_state.catalog.records(), count);
    apply_session_flags(&app_state, &mut vehicles);
    Json(vehicles)
}

pub async fn get_makers(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.catalog.makers())
}

pub async fn get_models(
    State(app_state): State<AppState>,
    Path(maker): Path<String>,
) -> impl IntoResponse {
    tracing::info!("[HANDLER] /api/models/:maker - Request for maker: {}", maker);
    Json(app_state.catalog.models_for_maker(&maker))
}

pub async fn selling_points(
    State(app_state): State<AppState>,
    JsonExtract(vehicle): JsonExtract<Vehicle>,
) -> impl IntoResponse {
    tracing::info!("[HANDLER] /api/selling-points - Vehicle: {}", vehicle.name);
    let points = app_state.gemini.selling_points(&vehicle).await;
    Json(SellingPointsResponse { points })
}

pub async fn toggle_favorite(
    State(app_state): State<AppState>,
    JsonExtract(request): JsonExtract<VehicleNameRequest>,
) -> impl IntoResponse {
    let mut session = app_state.session.lock().expect("session lock poisoned");
    let is_favorite = session.toggle_favorite(&request.name);
    tracing::info!(
        "[HANDLER] /api/favorites - '{}' favorite: {}",
        request.name,
        is_favorite
    );
    Json(FavoriteResponse {
        name: request.name,
        is_favorite,
    })
}

pub async fn list_favorites(State(app_state): State<AppState>) -> impl IntoResponse {
    // Favorites are stored as names; resolve them back to vehicles through
    // the catalog. A name with no catalog record (e.g. a backend-suggested
    // vehicle) is kept as favorite state but cannot be listed here.
    let favorite_names: Vec<String> = {
        let session = app_state.session.lock().expect("session lock poisoned");
        session.favorites().to_vec()
    };

    let mut vehicles: Vec<Vehicle> = app_state
        .catalog
        .records()
        .iter()
        .map(crate::normalize::normalize)
        .filter(|v| favorite_names.contains(&v.name))
        .collect();
    apply_session_flags(&app_state, &mut vehicles);
    Json(vehicles)
}

pub async fn toggle_notification(
    State(app_state): State<AppState>,
    JsonExtract(request): JsonExtract<VehicleNameRequest>,
) -> AppResult<impl IntoResponse> {
    let mut session = app_state.session.lock().expect("session lock poisoned");
    match session.toggle_notification(&request.name) {
        Some(enabled) => Ok(Json(NotificationResponse {
            name: request.name,
            price_drop_notification: enabled,
        })),
        None => Err(AppError::NotFound(format!(
            "'{}' はお気に入りに登録されていません。",
            request.name
        ))),
    }
}

pub async fn get_history(State(app_state): State<AppState>) -> impl IntoResponse {
    let session = app_state.session.lock().expect("session lock poisoned");
    let entries: Vec<HistoryEntry> = session.history().to_vec();
    Json(entries)
}
