use std::sync::Arc;

use aerobook_core::ids::PassportNumber;
use aerobook_core::model::Passenger;
use aerobook_core::store::{PassengerStore, StoreError};
use aerobook_core::{CoreError, CoreResult};
use chrono::NaiveDate;
use tracing::info;

use crate::idgen;

/// How often an id allocation is re-read after losing to a concurrent
/// insert before giving up with `Busy`.
const ID_RETRIES: u32 = 3;

#[derive(Clone)]
pub struct PassengerRegistry {
    store: Arc<dyn PassengerStore>,
}

impl PassengerRegistry {
    pub fn new(store: Arc<dyn PassengerStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        passport: &str,
        full_name: &str,
        birth_date: NaiveDate,
        country: &str,
    ) -> CoreResult<Passenger> {
        // Reject malformed input before any store access.
        let passport = PassportNumber::parse(passport)?;
        if full_name.trim().is_empty() {
            return Err(CoreError::Validation("full name must not be empty".into()));
        }
        if country.trim().is_empty() {
            return Err(CoreError::Validation("country must not be empty".into()));
        }

        for _ in 0..ID_RETRIES {
            let id = idgen::next_passenger_id(self.store.as_ref()).await?;
            let passenger = Passenger {
                id,
                passport: passport.clone(),
                full_name: full_name.trim().to_string(),
                birth_date,
                country: country.trim().to_string(),
            };
            match self.store.insert_passenger(&passenger).await {
                Ok(()) => {
                    info!(passenger_id = id, "passenger registered");
                    return Ok(passenger);
                }
                // A concurrent registration took this id; re-read the max.
                Err(StoreError::DuplicateId(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(CoreError::Busy(
            "could not allocate a passenger id".to_string(),
        ))
    }

    pub async fn by_passport(&self, passport: &str) -> CoreResult<Passenger> {
        self.store
            .passenger_by_passport(passport)
            .await?
            .ok_or_else(|| CoreError::UnknownPassenger(passport.to_string()))
    }

    pub async fn by_id(&self, id: i64) -> CoreResult<Passenger> {
        self.store
            .passenger_by_id(id)
            .await?
            .ok_or_else(|| CoreError::UnknownPassenger(id.to_string()))
    }
}
