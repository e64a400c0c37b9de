use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::{pooled_connection::bb8::Pool, AsyncPgConnection, RunQueryDsl};
use shared::capacity::DEFAULT_CAPACITY;
use shared::{ReservationSource, ReservationStatus, TripNumber};
use uuid::Uuid;

use crate::models::{Customer, NewCustomer, NewReservation, Reservation, ScheduleOverride};
use crate::schema::{customers, reservations, schedule_overrides};

pub type DbPool = Pool<AsyncPgConnection>;

/// Query surface of the hosted reservation tables. Everything above this
/// trait is indifferent to where the rows actually live.
#[async_trait]
pub trait SeatStore: Send + Sync {
    async fn confirmed_people(&self, date: NaiveDate, trip: TripNumber) -> Result<i32>;
    async fn schedule_override(
        &self,
        date: NaiveDate,
        trip: TripNumber,
    ) -> Result<Option<ScheduleOverride>>;
    async fn insert_reservation(&self, new: NewReservation) -> Result<Reservation>;
    /// Deletes the newest confirmed manual reservation for the slot.
    /// Returns `None` when no manual reservation remains.
    async fn delete_latest_manual(&self, date: NaiveDate, trip: TripNumber)
        -> Result<Option<Uuid>>;
    async fn upsert_customer(&self, new: NewCustomer) -> Result<Customer>;
    async fn set_availability(
        &self,
        date: NaiveDate,
        trip: TripNumber,
        is_available: bool,
    ) -> Result<()>;
    async fn reservations_for_day(
        &self,
        date: NaiveDate,
        trip: Option<TripNumber>,
    ) -> Result<Vec<Reservation>>;
    async fn update_reservation_status(&self, id: Uuid, status: ReservationStatus)
        -> Result<bool>;
}

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeatStore for PgStore {
    async fn confirmed_people(&self, date: NaiveDate, trip: TripNumber) -> Result<i32> {
        let mut conn = self.pool.get().await?;
        let total: Option<i64> = reservations::table
            .filter(reservations::date.eq(date))
            .filter(reservations::trip_number.eq(trip.number()))
            .filter(reservations::status.eq(ReservationStatus::Confirmed.as_str()))
            .select(diesel::dsl::sum(reservations::people_count))
            .first(&mut conn)
            .await?;
        Ok(total.unwrap_or(0) as i32)
    }

    async fn schedule_override(
        &self,
        date: NaiveDate,
        trip: TripNumber,
    ) -> Result<Option<ScheduleOverride>> {
        let mut conn = self.pool.get().await?;
        let row = schedule_overrides::table
            .filter(schedule_overrides::date.eq(date))
            .filter(schedule_overrides::trip_number.eq(trip.number()))
            .first::<ScheduleOverride>(&mut conn)
            .await
            .optional()?;
        Ok(row)
    }

    async fn insert_reservation(&self, new: NewReservation) -> Result<Reservation> {
        let mut conn = self.pool.get().await?;
        let row = diesel::insert_into(reservations::table)
            .values(&new)
            .get_result::<Reservation>(&mut conn)
            .await?;
        Ok(row)
    }

    async fn delete_latest_manual(
        &self,
        date: NaiveDate,
        trip: TripNumber,
    ) -> Result<Option<Uuid>> {
        let mut conn = self.pool.get().await?;
        // The store has no "delete newest" primitive, so resolve the id
        // first and delete by id.
        let newest: Option<Uuid> = reservations::table
            .filter(reservations::date.eq(date))
            .filter(reservations::trip_number.eq(trip.number()))
            .filter(reservations::source.eq(ReservationSource::Manual.as_str()))
            .filter(reservations::status.eq(ReservationStatus::Confirmed.as_str()))
            .order(reservations::created_at.desc())
            .select(reservations::id)
            .first(&mut conn)
            .await
            .optional()?;

        match newest {
            Some(id) => {
                diesel::delete(reservations::table.filter(reservations::id.eq(id)))
                    .execute(&mut conn)
                    .await?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    async fn upsert_customer(&self, new: NewCustomer) -> Result<Customer> {
        let mut conn = self.pool.get().await?;
        let row = diesel::insert_into(customers::table)
            .values(&new)
            .on_conflict(customers::phone)
            .do_update()
            .set((
                customers::name.eq(excluded(customers::name)),
                customers::name_kana.eq(excluded(customers::name_kana)),
                customers::email.eq(excluded(customers::email)),
            ))
            .get_result::<Customer>(&mut conn)
            .await?;
        Ok(row)
    }

    async fn set_availability(
        &self,
        date: NaiveDate,
        trip: TripNumber,
        is_available: bool,
    ) -> Result<()> {
        let mut conn = self.pool.get().await?;
        let row = ScheduleOverride {
            date,
            trip_number: trip.number(),
            is_available,
            max_capacity: DEFAULT_CAPACITY,
            updated_at: Some(Utc::now()),
        };
        diesel::insert_into(schedule_overrides::table)
            .values(&row)
            .on_conflict((schedule_overrides::date, schedule_overrides::trip_number))
            .do_update()
            .set((
                schedule_overrides::is_available.eq(is_available),
                schedule_overrides::updated_at.eq(row.updated_at),
            ))
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn reservations_for_day(
        &self,
        date: NaiveDate,
        trip: Option<TripNumber>,
    ) -> Result<Vec<Reservation>> {
        let mut conn = self.pool.get().await?;
        let mut query = reservations::table
            .filter(reservations::date.eq(date))
            .into_boxed();
        if let Some(trip) = trip {
            query = query.filter(reservations::trip_number.eq(trip.number()));
        }
        let rows = query
            .order(reservations::created_at.asc())
            .load::<Reservation>(&mut conn)
            .await?;
        Ok(rows)
    }

    async fn update_reservation_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
    ) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        let updated = diesel::update(reservations::table.filter(reservations::id.eq(id)))
            .set(reservations::status.eq(status.as_str()))
            .execute(&mut conn)
            .await?;
        Ok(updated > 0)
    }
}
