use aerobook_core::reports::{DurationListing, FlightInfo, SeatAvailability};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{parse_date, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct RouteQuery {
    origin: String,
    destination: String,
}

#[derive(Debug, Deserialize)]
struct DurationQuery {
    origin: String,
    destination: String,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights", get(list_flights))
        .route("/v1/flights/duration", get(flights_by_duration))
        .route("/v1/flights/{flight_number}/seats", get(seats_available))
}

async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<Vec<FlightInfo>>, AppError> {
    let listing = state
        .engine
        .flights_between(&query.origin, &query.destination)
        .await?;
    Ok(Json(listing))
}

async fn flights_by_duration(
    State(state): State<AppState>,
    Query(query): Query<DurationQuery>,
) -> Result<Json<DurationListing>, AppError> {
    let listing = state
        .engine
        .flights_by_duration(&query.origin, &query.destination, query.limit)
        .await?;
    Ok(Json(listing))
}

async fn seats_available(
    State(state): State<AppState>,
    Path(flight_number): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<SeatAvailability>, AppError> {
    let date = parse_date(&query.date)?;
    let seats = state.engine.seats_available(&flight_number, date).await?;
    Ok(Json(seats))
}
