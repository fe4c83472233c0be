use aerobook_core::model::Passenger;
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::Deserialize;

use crate::error::{parse_date, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CreatePassengerRequest {
    passport: String,
    full_name: String,
    birth_date: String,
    country: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/passengers", post(create_passenger))
}

async fn create_passenger(
    State(state): State<AppState>,
    Json(req): Json<CreatePassengerRequest>,
) -> Result<Json<Passenger>, AppError> {
    let birth_date = parse_date(&req.birth_date)?;
    let passenger = state
        .engine
        .create_passenger(&req.passport, &req.full_name, birth_date, &req.country)
        .await?;
    Ok(Json(passenger))
}
