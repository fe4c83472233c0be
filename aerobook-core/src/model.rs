use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BookingReference, PassportNumber};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: i64,
    pub passport: PassportNumber,
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub country: String,
}

/// Read-only catalog row; the core never writes airlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airline {
    pub id: i64,
    pub name: String,
    pub country: String,
}

/// Read-only catalog row. `seats` is the capacity the ledger enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub airline_id: i64,
    pub duration_minutes: i32,
    pub seats: i32,
    pub plane: String,
}

/// A committed seat on a (flight, departure date). Created once, never
/// mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub reference: BookingReference,
    pub departure: NaiveDate,
    pub flight_number: String,
    pub passenger_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub passenger_id: i64,
    pub flight_number: String,
    pub score: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Inclusive score range for ratings.
pub const SCORE_MIN: i16 = 0;
pub const SCORE_MAX: i16 = 5;

pub fn validate_score(score: i16) -> Result<(), crate::CoreError> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(crate::CoreError::Validation(format!(
            "score must be between {} and {}, got {}",
            SCORE_MIN, SCORE_MAX, score
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(5).is_ok());
        assert!(validate_score(-1).is_err());
        assert!(validate_score(6).is_err());
    }

    #[test]
    fn test_flight_deserialization() {
        let json = r#"
            {
                "flight_number": "AB1234",
                "origin": "JFK",
                "destination": "LHR",
                "airline_id": 3,
                "duration_minutes": 420,
                "seats": 180,
                "plane": "Boeing 777"
            }
        "#;
        let flight: Flight = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(flight.flight_number, "AB1234");
        assert_eq!(flight.seats, 180);
    }
}
