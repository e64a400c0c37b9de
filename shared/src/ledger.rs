use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::TripNumber;

pub type SlotKey = (NaiveDate, TripNumber);

/// Seat-count edits staged in the admin surface before being written back.
///
/// Commit protocol: each unit of positive delta becomes one single-person
/// manual reservation insert, and each unit of negative delta deletes the
/// newest remaining manual reservation for the slot (LIFO). Units map to
/// discrete backend calls so every manually added seat stays individually
/// attributable and removable.
///
/// The ledger is a plain value object owned by whoever drives the admin
/// surface; it holds no backend handles and is cleared as a whole on commit
/// or cancel.
#[derive(Debug, Default, Clone)]
pub struct AdjustmentLedger {
    deltas: BTreeMap<SlotKey, i32>,
}

impl AdjustmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta(&self, date: NaiveDate, trip: TripNumber) -> i32 {
        self.deltas.get(&(date, trip)).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Dirty slots in deterministic (date, trip) order.
    pub fn entries(&self) -> impl Iterator<Item = (SlotKey, i32)> + '_ {
        self.deltas.iter().map(|(key, delta)| (*key, *delta))
    }

    /// Applies `change` if the resulting displayed reserved count stays
    /// within `[0, capacity]`. Returns false and leaves the ledger untouched
    /// otherwise. A delta that reaches zero drops its entry.
    pub fn adjust(
        &mut self,
        date: NaiveDate,
        trip: TripNumber,
        change: i32,
        base_reserved: i32,
        capacity: i32,
    ) -> bool {
        let key = (date, trip);
        let displayed = base_reserved + self.delta(date, trip);
        let next = displayed + change;
        if next < 0 || next > capacity {
            return false;
        }
        let entry = self.deltas.entry(key).or_insert(0);
        *entry += change;
        if *entry == 0 {
            self.deltas.remove(&key);
        }
        true
    }

    pub fn clear(&mut self) {
        self.deltas.clear();
    }
}
