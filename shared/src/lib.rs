pub mod capacity;
pub mod dates;
pub mod ledger;

use anyhow::anyhow;

/// One of the two daily departures. Integer-coded (1 or 2) on the wire and
/// in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TripNumber {
    First,
    Second,
}

impl TripNumber {
    pub const ALL: [TripNumber; 2] = [TripNumber::First, TripNumber::Second];

    pub fn number(self) -> i32 {
        match self {
            TripNumber::First => 1,
            TripNumber::Second => 2,
        }
    }
}

impl TryFrom<i32> for TripNumber {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TripNumber::First),
            2 => Ok(TripNumber::Second),
            other => Err(anyhow!("invalid trip number: {}", other)),
        }
    }
}

/// Only `Confirmed` rows count against capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::NoShow => "no_show",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            "completed" => Some(ReservationStatus::Completed),
            "no_show" => Some(ReservationStatus::NoShow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationSource {
    Web,
    Phone,
    WalkIn,
    Manual,
    Other,
}

impl ReservationSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationSource::Web => "web",
            ReservationSource::Phone => "phone",
            ReservationSource::WalkIn => "walk-in",
            ReservationSource::Manual => "manual",
            ReservationSource::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_number_round_trips() {
        assert_eq!(TripNumber::try_from(1).unwrap(), TripNumber::First);
        assert_eq!(TripNumber::try_from(2).unwrap(), TripNumber::Second);
        assert_eq!(TripNumber::First.number(), 1);
        assert_eq!(TripNumber::Second.number(), 2);
    }

    #[test]
    fn trip_number_rejects_out_of_range() {
        assert!(TripNumber::try_from(0).is_err());
        assert!(TripNumber::try_from(3).is_err());
    }

    #[test]
    fn status_parse_matches_as_str() {
        for status in [
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
            ReservationStatus::NoShow,
        ] {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("pending"), None);
    }
}
