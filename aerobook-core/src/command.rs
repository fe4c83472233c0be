use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Booking, Passenger, Rating};
use crate::reports::{
    AvailabilityRow, DestinationCount, DurationListing, FlightInfo, RouteScore, SeatAvailability,
};

/// The typed command surface the core accepts. Raw client input (passport,
/// score) is carried as-is and validated by the engine before any store
/// access; dates arrive already parsed as calendar dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    CreatePassenger {
        passport: String,
        full_name: String,
        birth_date: NaiveDate,
        country: String,
    },
    BookFlight {
        passport: String,
        origin: String,
        destination: String,
        flight_number: String,
        departure: NaiveDate,
    },
    RateFlight {
        passenger_id: i64,
        flight_number: String,
        score: i16,
        comment: Option<String>,
    },
    ListPopularDestinations {
        k: usize,
    },
    ListHighestRatedRoutes {
        k: usize,
    },
    ListFlightsByDuration {
        origin: String,
        destination: String,
        limit: usize,
    },
    AvailabilityReport {
        date: NaiveDate,
    },
    ListFlights {
        origin: String,
        destination: String,
    },
    SeatsAvailable {
        flight_number: String,
        departure: NaiveDate,
    },
}

/// Typed result channel, one variant per command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PassengerCreated(Passenger),
    Booked(Booking),
    Rated(Rating),
    PopularDestinations(Vec<DestinationCount>),
    HighestRatedRoutes(Vec<RouteScore>),
    FlightsByDuration(DurationListing),
    Availability(Vec<AvailabilityRow>),
    Flights(Vec<FlightInfo>),
    SeatsAvailable(SeatAvailability),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_deserialization() {
        let json = r#"
            {
                "book_flight": {
                    "passport": "P123456789",
                    "origin": "JFK",
                    "destination": "LHR",
                    "flight_number": "AB1234",
                    "departure": "2026-09-01"
                }
            }
        "#;
        let cmd: Command = serde_json::from_str(json).expect("Failed to deserialize");
        match cmd {
            Command::BookFlight {
                flight_number,
                departure,
                ..
            } => {
                assert_eq!(flight_number, "AB1234");
                assert_eq!(
                    departure,
                    NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
