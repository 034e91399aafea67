use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::rental_controller::RentalController;
use crate::dto::rental_dto::{
    ApiResponse, AvailabilityQuery, AvailabilityResponse, CreateRentalRequest, QuoteQuery,
    QuoteResponse, RentalCardResponse, RentalDetailResponse, RentalResponse, RentalSearchQuery,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rental_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rentals))
        .route("/", post(create_rental))
        .route("/:id", get(get_rental))
        .route("/:id/availability", get(check_availability))
        .route("/:id/quote", get(quote_rental))
}

// TODO: Extraer user_id del JWT token cuando implementemos middleware de auth
// Por ahora usamos un user_id hardcoded de ejemplo
async fn get_user_id_from_jwt() -> Uuid {
    // Placeholder - en producción esto vendría del JWT
    Uuid::parse_str("00000000-0000-0000-0000-000000000000").unwrap()
}

async fn list_rentals(
    State(state): State<AppState>,
    Query(query): Query<RentalSearchQuery>,
) -> Result<Json<Vec<RentalCardResponse>>, AppError> {
    let controller = RentalController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn create_rental(
    State(state): State<AppState>,
    Json(request): Json<CreateRentalRequest>,
) -> Result<Json<ApiResponse<RentalResponse>>, AppError> {
    let owner_user_id = get_user_id_from_jwt().await; // TODO: Extraer del JWT
    let controller = RentalController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.create(owner_user_id, request).await?;
    Ok(Json(response))
}

async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RentalDetailResponse>, AppError> {
    let controller = RentalController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let controller = RentalController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.check_availability(id, query).await?;
    Ok(Json(response))
}

async fn quote_rental(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, AppError> {
    let controller = RentalController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.quote(id, query).await?;
    Ok(Json(response))
}
