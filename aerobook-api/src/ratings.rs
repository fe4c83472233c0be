use aerobook_core::model::Rating;
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct RateFlightRequest {
    passenger_id: i64,
    flight_number: String,
    score: i16,
    comment: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/ratings", post(rate_flight))
}

async fn rate_flight(
    State(state): State<AppState>,
    Json(req): Json<RateFlightRequest>,
) -> Result<Json<Rating>, AppError> {
    let rating = state
        .engine
        .rate(req.passenger_id, &req.flight_number, req.score, req.comment)
        .await?;
    Ok(Json(rating))
}
