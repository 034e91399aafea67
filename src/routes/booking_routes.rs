use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    AttachContractRequest, BookingCreatedResponse, BookingListResponse, BookingResponse,
    CreateBookingRequest, UpdateBookingStatusRequest,
};
use crate::dto::rental_dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/mine", get(my_bookings))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/status", put(update_booking_status))
        .route("/:id/contract", put(attach_contract))
}

// TODO: Extraer user_id del JWT token cuando implementemos middleware de auth
// Por ahora usamos un user_id hardcoded de ejemplo
async fn get_user_id_from_jwt() -> Uuid {
    // Placeholder - en producción esto vendría del JWT
    Uuid::parse_str("00000000-0000-0000-0000-000000000000").unwrap()
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingCreatedResponse>>, AppError> {
    let user_id = get_user_id_from_jwt().await; // TODO: Extraer del JWT
    let controller = BookingController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.create(user_id, request).await?;
    Ok(Json(response))
}

async fn my_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingListResponse>>, AppError> {
    let user_id = get_user_id_from_jwt().await; // TODO: Extraer del JWT
    let controller = BookingController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.mine(user_id).await?;
    Ok(Json(response))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let user_id = get_user_id_from_jwt().await; // TODO: Extraer del JWT
    let controller = BookingController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.cancel(id, user_id).await?;
    Ok(Json(response))
}

async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}

async fn attach_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachContractRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.rental_locks.clone());
    let response = controller.attach_contract(id, request).await?;
    Ok(Json(response))
}
