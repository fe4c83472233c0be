use aerobook_core::reports::{AvailabilityRow, DestinationCount, RouteScore};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{parse_date, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct TopKQuery {
    k: usize,
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/reports/popular-destinations",
            get(popular_destinations),
        )
        .route("/v1/reports/highest-rated", get(highest_rated_routes))
        .route("/v1/reports/availability", get(availability_report))
}

async fn popular_destinations(
    State(state): State<AppState>,
    Query(query): Query<TopKQuery>,
) -> Result<Json<Vec<DestinationCount>>, AppError> {
    let rows = state.engine.popular_destinations(query.k).await?;
    Ok(Json(rows))
}

async fn highest_rated_routes(
    State(state): State<AppState>,
    Query(query): Query<TopKQuery>,
) -> Result<Json<Vec<RouteScore>>, AppError> {
    let rows = state.engine.highest_rated_routes(query.k).await?;
    Ok(Json(rows))
}

async fn availability_report(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<AvailabilityRow>>, AppError> {
    let date = parse_date(&query.date)?;
    let rows = state.engine.availability_report(date).await?;
    Ok(Json(rows))
}
