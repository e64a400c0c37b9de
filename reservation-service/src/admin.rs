use chrono::NaiveDate;
use serde::Serialize;
use shared::dates::date_range_inclusive;
use shared::ledger::AdjustmentLedger;
use shared::TripNumber;
use tracing::{error, info, warn};

use crate::models::NewReservation;
use crate::store::SeatStore;

#[derive(Debug, Default, Clone, Serialize)]
pub struct CommitSummary {
    pub inserted: u32,
    pub deleted: u32,
    pub skipped: u32,
    pub failed: u32,
}

/// Replays the ledger against the store, one backend call per unit of delta:
/// a positive delta becomes that many single-person manual inserts, a
/// negative delta removes the newest manual rows first. Units are
/// best-effort: a unit that fails or finds nothing to delete is counted and
/// logged, and the batch keeps going. The ledger is cleared as a whole
/// afterwards.
pub async fn commit_ledger(store: &dyn SeatStore, ledger: &mut AdjustmentLedger) -> CommitSummary {
    let mut summary = CommitSummary::default();
    let entries: Vec<_> = ledger.entries().collect();
    for ((date, trip), delta) in entries {
        if delta > 0 {
            for _ in 0..delta {
                match store
                    .insert_reservation(NewReservation::manual_seat_hold(date, trip))
                    .await
                {
                    Ok(row) => {
                        summary.inserted += 1;
                        info!("added seat hold {} for {} trip {}", row.id, date, trip.number());
                    }
                    Err(e) => {
                        summary.failed += 1;
                        error!(
                            "seat hold insert failed for {} trip {}: {:#}",
                            date,
                            trip.number(),
                            e
                        );
                    }
                }
            }
        } else {
            for _ in 0..delta.unsigned_abs() {
                match store.delete_latest_manual(date, trip).await {
                    Ok(Some(id)) => {
                        summary.deleted += 1;
                        info!("removed seat hold {} for {} trip {}", id, date, trip.number());
                    }
                    Ok(None) => {
                        summary.skipped += 1;
                        warn!(
                            "no seat hold left to remove for {} trip {}",
                            date,
                            trip.number()
                        );
                    }
                    Err(e) => {
                        summary.failed += 1;
                        error!(
                            "seat hold delete failed for {} trip {}: {:#}",
                            date,
                            trip.number(),
                            e
                        );
                    }
                }
            }
        }
    }
    ledger.clear();
    summary
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct HolidaySummary {
    pub written: u32,
    pub failed: u32,
}

/// Marks every listed trip closed on every date in the inclusive range.
/// Writes are sequential and uncompensated: a failure is counted and the
/// loop moves on, leaving earlier writes in place.
pub async fn set_holiday_range(
    store: &dyn SeatStore,
    start: NaiveDate,
    end: NaiveDate,
    trips: &[TripNumber],
) -> HolidaySummary {
    let mut summary = HolidaySummary::default();
    for date in date_range_inclusive(start, end) {
        for trip in trips {
            match store.set_availability(date, *trip, false).await {
                Ok(()) => summary.written += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        "holiday write failed for {} trip {}: {:#}",
                        date,
                        trip.number(),
                        e
                    );
                }
            }
        }
    }
    summary
}
