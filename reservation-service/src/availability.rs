use anyhow::Result;
use chrono::NaiveDate;
use shared::capacity::{SeatAvailability, DEFAULT_CAPACITY};
use shared::TripNumber;
use tracing::warn;

use crate::store::SeatStore;

/// Remaining seats for a slot. A closed slot reports `Closed` no matter how
/// many reservations exist. This read path never fails: if the store is
/// unreachable the public calendar degrades to a fully open slot instead of
/// erroring out.
pub async fn available_seats(
    store: &dyn SeatStore,
    date: NaiveDate,
    trip: TripNumber,
) -> SeatAvailability {
    match seat_lookup(store, date, trip).await {
        Ok(availability) => availability,
        Err(e) => {
            warn!(
                "availability lookup failed for {} trip {}: {:#}",
                date,
                trip.number(),
                e
            );
            SeatAvailability::Open {
                seats: DEFAULT_CAPACITY,
            }
        }
    }
}

async fn seat_lookup(
    store: &dyn SeatStore,
    date: NaiveDate,
    trip: TripNumber,
) -> Result<SeatAvailability> {
    let override_row = store.schedule_override(date, trip).await?;
    if let Some(row) = &override_row {
        if !row.is_available {
            return Ok(SeatAvailability::Closed);
        }
    }
    let max_seats = override_row
        .map(|row| row.max_capacity)
        .unwrap_or(DEFAULT_CAPACITY);
    let reserved = store.confirmed_people(date, trip).await?;
    Ok(SeatAvailability::open(max_seats, reserved))
}
