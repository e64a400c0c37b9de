use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use shared::{ReservationSource, ReservationStatus, TripNumber};
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::reservations)]
pub struct Reservation {
    pub id: Uuid,
    pub date: NaiveDate,
    pub trip_number: i32,
    pub people_count: i32,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub rod_rental: bool,
    pub rod_rental_count: i32,
    pub note: Option<String>,
    pub status: String,
    pub source: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::reservations)]
pub struct NewReservation {
    pub id: Uuid,
    pub date: NaiveDate,
    pub trip_number: i32,
    pub people_count: i32,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub rod_rental: bool,
    pub rod_rental_count: i32,
    pub note: Option<String>,
    pub status: String,
    pub source: String,
}

impl NewReservation {
    /// A single seat held by the admin through a ledger commit. One row per
    /// unit keeps each held seat removable on its own.
    pub fn manual_seat_hold(date: NaiveDate, trip: TripNumber) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            trip_number: trip.number(),
            people_count: 1,
            name: "seat hold".to_string(),
            phone: String::new(),
            email: None,
            rod_rental: false,
            rod_rental_count: 0,
            note: None,
            status: ReservationStatus::Confirmed.as_str().to_string(),
            source: ReservationSource::Manual.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub name_kana: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer {
    pub id: Uuid,
    pub name: String,
    pub name_kana: Option<String>,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Queryable, Insertable, Serialize)]
#[diesel(table_name = crate::schema::schedule_overrides)]
pub struct ScheduleOverride {
    pub date: NaiveDate,
    pub trip_number: i32,
    pub is_available: bool,
    pub max_capacity: i32,
    pub updated_at: Option<DateTime<Utc>>,
}
