use std::sync::Arc;

use aerobook_catalog::CatalogReader;
use aerobook_core::model::{validate_score, Rating};
use aerobook_core::store::{BookingStore, RatingStore, StoreError};
use aerobook_core::{CoreError, CoreResult};
use chrono::Utc;
use tracing::info;

use crate::idgen;
use crate::passengers::PassengerRegistry;

const ID_RETRIES: u32 = 3;

/// Records post-flight ratings: one per (passenger, flight), and only after
/// that passenger actually booked the flight.
#[derive(Clone)]
pub struct RatingService {
    catalog: CatalogReader,
    passengers: PassengerRegistry,
    bookings: Arc<dyn BookingStore>,
    ratings: Arc<dyn RatingStore>,
}

impl RatingService {
    pub fn new(
        catalog: CatalogReader,
        passengers: PassengerRegistry,
        bookings: Arc<dyn BookingStore>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        Self {
            catalog,
            passengers,
            bookings,
            ratings,
        }
    }

    pub async fn rate(
        &self,
        passenger_id: i64,
        flight_number: &str,
        score: i16,
        comment: Option<String>,
    ) -> CoreResult<Rating> {
        // 1. Range check before any store access.
        validate_score(score)?;

        // 2. Both referenced rows must exist.
        let passenger = self.passengers.by_id(passenger_id).await?;
        let flight = self.catalog.flight(flight_number).await?;

        // 3. Rating requires prior travel.
        if !self
            .bookings
            .has_booking_for(passenger.id, &flight.flight_number)
            .await?
        {
            return Err(CoreError::NotFlown {
                passenger_id: passenger.id,
                flight_number: flight.flight_number,
            });
        }

        // 4. Friendly pre-check; the store's pair constraint is the
        //    race-safe backstop.
        if self
            .ratings
            .has_rating_for(passenger.id, &flight.flight_number)
            .await?
        {
            return Err(CoreError::AlreadyRated {
                passenger_id: passenger.id,
                flight_number: flight.flight_number,
            });
        }

        // 5. Allocate an id and persist; losing an id race re-reads the
        //    max, losing the pair race surfaces AlreadyRated.
        for _ in 0..ID_RETRIES {
            let id = idgen::next_rating_id(self.ratings.as_ref()).await?;
            let rating = Rating {
                id,
                passenger_id: passenger.id,
                flight_number: flight.flight_number.clone(),
                score,
                comment: comment.clone(),
                created_at: Utc::now(),
            };
            match self.ratings.insert_rating_unique(&rating).await {
                Ok(()) => {
                    info!(
                        rating_id = id,
                        passenger_id = passenger.id,
                        flight_number = %flight.flight_number,
                        score,
                        "rating recorded"
                    );
                    return Ok(rating);
                }
                Err(StoreError::DuplicateId(_)) => continue,
                Err(StoreError::DuplicateRating { .. }) => {
                    return Err(CoreError::AlreadyRated {
                        passenger_id: passenger.id,
                        flight_number: flight.flight_number,
                    })
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(CoreError::Busy("could not allocate a rating id".to_string()))
    }
}
