use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the popular-destinations report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationCount {
    pub destination: String,
    pub flights: i64,
}

/// One row of the highest-rated-routes report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteScore {
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub plane: String,
    pub avg_score: f64,
    pub ratings: i64,
}

/// A flight joined with its airline name, as listed by the catalog reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightInfo {
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub plane: String,
    pub duration_minutes: i32,
}

/// Duration-ordered listing. `truncated` signals that more rows exist than
/// the requested limit; fewer rows than the limit is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationListing {
    pub flights: Vec<FlightInfo>,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub booked: i64,
    pub capacity: i32,
    pub available: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatAvailability {
    pub flight_number: String,
    pub departure: NaiveDate,
    pub available: i64,
}
