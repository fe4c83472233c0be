pub mod command;
pub mod ids;
pub mod model;
pub mod reports;
pub mod store;

use chrono::NaiveDate;

/// Error taxonomy surfaced by every command. Business-rule rejections
/// (capacity, already-rated) are ordinary outcomes here, not panics.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unknown passenger: {0}")]
    UnknownPassenger(String),
    #[error("unknown flight: {0}")]
    UnknownFlight(String),
    #[error("no flights between {origin} and {destination}")]
    NoSuchRoute { origin: String, destination: String },
    #[error("no seats left on flight {flight_number} for {date}")]
    CapacityExceeded {
        flight_number: String,
        date: NaiveDate,
    },
    #[error("passenger {passenger_id} has not flown flight {flight_number}")]
    NotFlown {
        passenger_id: i64,
        flight_number: String,
    },
    #[error("passenger {passenger_id} already rated flight {flight_number}")]
    AlreadyRated {
        passenger_id: i64,
        flight_number: String,
    },
    #[error("passport already registered: {0}")]
    DuplicatePassport(String),
    #[error("store busy: {0}")]
    Busy(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("identifier space exhausted: {0}")]
    IdSpaceExhausted(String),
}

impl CoreError {
    /// Transient failures a caller may retry with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Busy(_))
    }
}

impl From<store::StoreError> for CoreError {
    fn from(err: store::StoreError) -> Self {
        use store::StoreError;
        match err {
            StoreError::NotFound(what) => CoreError::UnknownFlight(what),
            StoreError::CapacityExhausted {
                flight_number,
                date,
            } => CoreError::CapacityExceeded {
                flight_number,
                date,
            },
            StoreError::DuplicateRating {
                passenger_id,
                flight_number,
            } => CoreError::AlreadyRated {
                passenger_id,
                flight_number,
            },
            StoreError::DuplicatePassport(passport) => CoreError::DuplicatePassport(passport),
            // Reference and id collisions are handled by the services'
            // re-draw loops; reaching this conversion means the bound was
            // spent, so surface them as retryable.
            StoreError::DuplicateReference(reference) => {
                CoreError::Busy(format!("booking reference collision: {}", reference))
            }
            StoreError::DuplicateId(id) => CoreError::Busy(format!("identifier collision: {}", id)),
            StoreError::Busy(msg) => CoreError::Busy(msg),
            StoreError::Unavailable(msg) => CoreError::Unavailable(msg),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_translation() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let err: CoreError = store::StoreError::CapacityExhausted {
            flight_number: "AE100".to_string(),
            date,
        }
        .into();
        assert!(matches!(err, CoreError::CapacityExceeded { .. }));

        let err: CoreError = store::StoreError::DuplicateRating {
            passenger_id: 1,
            flight_number: "AE100".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::AlreadyRated { .. }));
    }

    #[test]
    fn test_only_busy_is_retryable() {
        assert!(CoreError::Busy("locked".to_string()).is_retryable());
        assert!(!CoreError::Validation("bad".to_string()).is_retryable());
        assert!(!CoreError::UnknownFlight("AE100".to_string()).is_retryable());
        // Id-space collisions that spent their retry bound surface as Busy.
        let err: CoreError = store::StoreError::DuplicateId(7).into();
        assert!(err.is_retryable());
    }
}
