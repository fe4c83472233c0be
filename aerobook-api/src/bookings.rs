use aerobook_core::model::Booking;
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::Deserialize;

use crate::error::{parse_date, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct BookFlightRequest {
    passport: String,
    origin: String,
    destination: String,
    flight_number: String,
    departure: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings", post(book_flight))
}

async fn book_flight(
    State(state): State<AppState>,
    Json(req): Json<BookFlightRequest>,
) -> Result<Json<Booking>, AppError> {
    let departure = parse_date(&req.departure)?;
    let booking = state
        .engine
        .book(
            &req.passport,
            &req.origin,
            &req.destination,
            &req.flight_number,
            departure,
        )
        .await?;
    Ok(Json(booking))
}
