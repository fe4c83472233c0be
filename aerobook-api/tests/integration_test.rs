use std::sync::Arc;

use aerobook_api::{app, AppState};
use aerobook_booking::{EngineSettings, ReservationEngine};
use aerobook_core::model::{Airline, Flight};
use aerobook_store::MemoryStore;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn flight(
    number: &str,
    origin: &str,
    destination: &str,
    duration_minutes: i32,
    seats: i32,
) -> Flight {
    Flight {
        flight_number: number.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        airline_id: 1,
        duration_minutes,
        seats,
        plane: "A320".to_string(),
    }
}

async fn test_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    store
        .seed_airline(Airline {
            id: 1,
            name: "Aerline".to_string(),
            country: "USA".to_string(),
        })
        .await;
    store.seed_flight(flight("AE100", "SFO", "NYC", 300, 3)).await;
    store.seed_flight(flight("AE101", "SFO", "NYC", 280, 100)).await;
    store.seed_flight(flight("BL200", "SFO", "LAX", 95, 150)).await;

    let engine = ReservationEngine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        EngineSettings::default(),
    );
    app(AppState {
        engine: Arc::new(engine),
    })
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn create_passenger_body(passport: &str, name: &str) -> Value {
    json!({
        "passport": passport,
        "full_name": name,
        "birth_date": "1990-04-14",
        "country": "UK",
    })
}

fn book_body(passport: &str, flight_number: &str) -> Value {
    json!({
        "passport": passport,
        "origin": "SFO",
        "destination": "NYC",
        "flight_number": flight_number,
        "departure": "2026-09-01",
    })
}

#[tokio::test]
async fn test_booking_and_rating_flow() {
    let app = test_app().await;

    let (status, passenger) = send(
        &app,
        "POST",
        "/v1/passengers",
        Some(create_passenger_body("P000000001", "Ada Lovelace")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(passenger["id"], 1);

    let (status, booking) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(book_body("P000000001", "AE100")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reference = booking["reference"].as_str().unwrap();
    assert_eq!(reference.len(), 10);

    let (status, seats) = send(
        &app,
        "GET",
        "/v1/flights/AE100/seats?date=2026-09-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seats["available"], 2);

    let (status, rating) = send(
        &app,
        "POST",
        "/v1/ratings",
        Some(json!({
            "passenger_id": 1,
            "flight_number": "AE100",
            "score": 4,
            "comment": "smooth",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rating["score"], 4);

    // One rating per (passenger, flight).
    let (status, _) = send(
        &app,
        "POST",
        "/v1/ratings",
        Some(json!({
            "passenger_id": 1,
            "flight_number": "AE100",
            "score": 5,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, rated) = send(&app, "GET", "/v1/reports/highest-rated?k=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rated[0]["flight_number"], "AE100");
    assert_eq!(rated[0]["airline"], "Aerline");
}

#[tokio::test]
async fn test_validation_and_not_found() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/v1/passengers",
        Some(create_passenger_body("TOO-SHORT", "Ada Lovelace")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/v1/passengers",
        Some(json!({
            "passport": "P000000001",
            "full_name": "Ada Lovelace",
            "birth_date": "1990-02-30",
            "country": "UK",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown passenger books: 404.
    let (status, _) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(book_body("Q999999999", "AE100")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/v1/reports/popular-destinations?k=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "GET",
        "/v1/reports/availability?date=2026-09-99",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_capacity_exhaustion_maps_to_conflict() {
    let app = test_app().await;

    send(
        &app,
        "POST",
        "/v1/passengers",
        Some(create_passenger_body("P000000001", "Ada Lovelace")),
    )
    .await;

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            "POST",
            "/v1/bookings",
            Some(book_body("P000000001", "AE100")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = send(
        &app,
        "POST",
        "/v1/bookings",
        Some(book_body("P000000001", "AE100")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("no seats left"));

    // The full flight drops out of the availability report.
    let (status, report) = send(
        &app,
        "GET",
        "/v1/reports/availability?date=2026-09-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = report.as_array().unwrap();
    assert!(rows
        .iter()
        .all(|row| row["flight_number"] != "AE100" && row["available"].as_i64().unwrap() > 0));
}

#[tokio::test]
async fn test_flight_listings() {
    let app = test_app().await;

    let (status, listing) = send(
        &app,
        "GET",
        "/v1/flights?origin=SFO&destination=NYC",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 2);

    let (status, by_duration) = send(
        &app,
        "GET",
        "/v1/flights/duration?origin=SFO&destination=NYC&limit=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_duration["truncated"], true);
    assert_eq!(by_duration["flights"][0]["flight_number"], "AE101");

    let (status, popular) = send(&app, "GET", "/v1/reports/popular-destinations?k=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(popular[0]["destination"], "NYC");
    assert_eq!(popular[0]["flights"], 2);
}
