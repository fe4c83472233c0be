use aerobook_core::ids::{BookingReference, REFERENCE_LEN};
use aerobook_core::store::{BookingStore, PassengerStore, RatingStore};
use aerobook_core::{CoreError, CoreResult};
use rand::rngs::OsRng;
use rand::Rng;

const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Mints booking references: fixed-length draws from {A-Z, 0-9} off the OS
/// random source, re-drawn until a value not already in the booking set
/// comes up. The attempt bound turns near-exhaustion (or a broken
/// generator) into a hard error instead of a colliding identifier.
#[derive(Clone)]
pub struct ReferenceGenerator {
    attempts: u32,
}

impl ReferenceGenerator {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    /// One fresh candidate, format-valid but not yet checked for collisions.
    pub fn mint(&self) -> BookingReference {
        let mut value = String::with_capacity(REFERENCE_LEN);
        for _ in 0..REFERENCE_LEN {
            let idx = OsRng.gen_range(0..REFERENCE_ALPHABET.len());
            value.push(REFERENCE_ALPHABET[idx] as char);
        }
        BookingReference::new_unchecked(value)
    }

    /// Generate-and-check against the persisted booking set. The check is
    /// advisory; the store's uniqueness constraint is the backstop and the
    /// caller re-draws on an insert conflict.
    pub async fn next_booking_reference(
        &self,
        store: &dyn BookingStore,
    ) -> CoreResult<BookingReference> {
        for _ in 0..self.attempts {
            let candidate = self.mint();
            if !store.reference_exists(candidate.as_str()).await? {
                return Ok(candidate);
            }
        }
        Err(CoreError::IdSpaceExhausted(format!(
            "no free booking reference after {} attempts",
            self.attempts
        )))
    }
}

/// Persisted-max-plus-one, computed per call so it survives restarts.
/// Empty table yields 1. Concurrent allocations of the same value are
/// resolved by the store's primary-key constraint and the caller's retry.
pub async fn next_passenger_id(store: &dyn PassengerStore) -> CoreResult<i64> {
    Ok(store.max_passenger_id().await? + 1)
}

pub async fn next_rating_id(store: &dyn RatingStore) -> CoreResult<i64> {
    Ok(store.max_rating_id().await? + 1)
}
