use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post, put},
    Router,
};
use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use shared::capacity::{displayed_available, SeatAvailability, DEFAULT_CAPACITY};
use shared::ledger::AdjustmentLedger;
use shared::{dates, ReservationSource, ReservationStatus, TripNumber};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::admin::{self, CommitSummary, HolidaySummary};
use crate::availability::available_seats;
use crate::models::{NewCustomer, NewReservation, Reservation};
use crate::notify::{BookingNotice, Notifier};
use crate::store::SeatStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SeatStore>,
    pub notifier: Notifier,
    pub ledger: Arc<Mutex<AdjustmentLedger>>,
    pub admin_password: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn conflict(message: impl Into<String>) -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn internal_error(context: &str, e: anyhow::Error) -> ApiError {
    tracing::error!("{}: {:#}", context, e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: context.to_string(),
        }),
    )
}

pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/reservations", get(list_reservations))
        .route("/reservations/:id/status", patch(update_reservation_status))
        .route("/adjustments", get(pending_adjustments).post(adjust_seats))
        .route("/adjustments/commit", post(commit_adjustments))
        .route("/adjustments/cancel", post(cancel_adjustments))
        .route("/schedule", put(set_schedule))
        .route("/schedule/holidays", post(set_holidays))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health_check))
        .route("/availability", get(availability_for_date))
        .route("/availability/upcoming", get(upcoming_availability))
        .route("/reservations", post(create_reservation))
        .nest("/admin", admin_routes)
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

// The admin surface trusts a single shared password, carried on every
// request. No session, no expiry.
async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let supplied = request
        .headers()
        .get("x-admin-password")
        .and_then(|value| value.to_str().ok());
    if supplied == Some(state.admin_password.as_str()) {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "invalid admin password".to_string(),
            }),
        )
            .into_response()
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct SlotSeats {
    pub trip_number: i32,
    pub available_seats: i32,
}

#[derive(Debug, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<SlotSeats>,
}

async fn day_availability(store: &dyn SeatStore, date: NaiveDate) -> DayAvailability {
    let lookups = TripNumber::ALL.map(|trip| available_seats(store, date, trip));
    let seats = join_all(lookups).await;
    DayAvailability {
        date,
        slots: TripNumber::ALL
            .iter()
            .zip(seats)
            .map(|(trip, availability)| SlotSeats {
                trip_number: trip.number(),
                available_seats: availability.seat_count(),
            })
            .collect(),
    }
}

async fn availability_for_date(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> Json<DayAvailability> {
    Json(day_availability(state.store.as_ref(), params.date).await)
}

#[derive(Debug, Deserialize)]
pub struct UpcomingParams {
    pub days: Option<i64>,
}

async fn upcoming_availability(
    State(state): State<AppState>,
    Query(params): Query<UpcomingParams>,
) -> Json<Vec<DayAvailability>> {
    let days = params.days.unwrap_or(30).clamp(1, 60);
    let lookups =
        (0..days).map(|offset| day_availability(state.store.as_ref(), dates::today_plus(offset)));
    Json(join_all(lookups).await)
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub date: NaiveDate,
    pub trip_number: i32,
    pub people_count: i32,
    pub name: String,
    pub name_kana: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    #[serde(default)]
    pub rod_rental: bool,
    #[serde(default)]
    pub rod_rental_count: i32,
    pub note: Option<String>,
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Json<Reservation>, ApiError> {
    let trip =
        TripNumber::try_from(request.trip_number).map_err(|e| bad_request(e.to_string()))?;
    if request.people_count < 1 {
        return Err(bad_request("people_count must be at least 1"));
    }
    if request.name.trim().is_empty() {
        return Err(bad_request("name is required"));
    }
    if request.phone.trim().is_empty() {
        return Err(bad_request("phone is required"));
    }

    match available_seats(state.store.as_ref(), request.date, trip).await {
        SeatAvailability::Closed => {
            return Err(conflict("the trip is not operating on that date"));
        }
        SeatAvailability::Open { seats } if seats < request.people_count => {
            return Err(conflict("not enough seats left for that trip"));
        }
        SeatAvailability::Open { .. } => {}
    }

    // Customer and reservation are two independent writes, not a
    // transaction; a failure in between leaves only the customer row.
    state
        .store
        .upsert_customer(NewCustomer {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            name_kana: request.name_kana.clone(),
            phone: request.phone.clone(),
            email: request.email.clone(),
        })
        .await
        .map_err(|e| internal_error("failed to save customer", e))?;

    let rod_rental_count = if request.rod_rental {
        request.rod_rental_count.max(0)
    } else {
        0
    };
    let reservation = state
        .store
        .insert_reservation(NewReservation {
            id: Uuid::new_v4(),
            date: request.date,
            trip_number: trip.number(),
            people_count: request.people_count,
            name: request.name,
            phone: request.phone,
            email: request.email,
            rod_rental: request.rod_rental,
            rod_rental_count,
            note: request.note,
            status: ReservationStatus::Confirmed.as_str().to_string(),
            source: ReservationSource::Web.as_str().to_string(),
        })
        .await
        .map_err(|e| internal_error("failed to save reservation", e))?;

    if let Some(recipient) = state.notifier.recipient() {
        state.notifier.spawn_booking_notice(BookingNotice {
            recipient: recipient.to_string(),
            name: reservation.name.clone(),
            date: reservation.date,
            trip_number: reservation.trip_number,
            people_count: reservation.people_count,
            rod_rental: reservation.rod_rental,
            rod_rental_count: reservation.rod_rental_count,
            phone: reservation.phone.clone(),
            note: reservation.note.clone(),
        });
    }

    tracing::info!(
        "reservation {} created for {} trip {}",
        reservation.id,
        reservation.date,
        reservation.trip_number
    );
    Ok(Json(reservation))
}

#[derive(Debug, Deserialize)]
pub struct ReservationListParams {
    pub date: NaiveDate,
    pub trip_number: Option<i32>,
}

async fn list_reservations(
    State(state): State<AppState>,
    Query(params): Query<ReservationListParams>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let trip = match params.trip_number {
        Some(number) => {
            Some(TripNumber::try_from(number).map_err(|e| bad_request(e.to_string()))?)
        }
        None => None,
    };
    state
        .store
        .reservations_for_day(params.date, trip)
        .await
        .map(Json)
        .map_err(|e| internal_error("failed to load reservations", e))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

async fn update_reservation_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    let status = ReservationStatus::parse(&request.status)
        .ok_or_else(|| bad_request(format!("unknown status: {}", request.status)))?;
    let updated = state
        .store
        .update_reservation_status(id, status)
        .await
        .map_err(|e| internal_error("failed to update reservation", e))?;
    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "reservation not found".to_string(),
            }),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub date: NaiveDate,
    pub trip_number: i32,
    pub change: i32,
}

#[derive(Debug, Serialize)]
pub struct AdjustResponse {
    pub applied: bool,
    pub date: NaiveDate,
    pub trip_number: i32,
    pub pending_delta: i32,
    pub displayed_reserved: i32,
    pub displayed_available: i32,
}

async fn adjust_seats(
    State(state): State<AppState>,
    Json(request): Json<AdjustRequest>,
) -> Result<Json<AdjustResponse>, ApiError> {
    let trip =
        TripNumber::try_from(request.trip_number).map_err(|e| bad_request(e.to_string()))?;
    if request.change == 0 {
        return Err(bad_request("change must be non-zero"));
    }

    // Admin edits need accurate base counts, so store failures surface here
    // instead of failing open like the public calendar.
    let override_row = state
        .store
        .schedule_override(request.date, trip)
        .await
        .map_err(|e| internal_error("failed to load schedule", e))?;
    let base_reserved = state
        .store
        .confirmed_people(request.date, trip)
        .await
        .map_err(|e| internal_error("failed to load seat counts", e))?;

    let max_seats = override_row
        .as_ref()
        .map(|row| row.max_capacity)
        .unwrap_or(DEFAULT_CAPACITY);
    if override_row.map(|row| !row.is_available).unwrap_or(false) {
        tracing::warn!(
            "adjusting seats on closed slot {} trip {}",
            request.date,
            trip.number()
        );
    }

    let mut ledger = state.ledger.lock().await;
    let applied = ledger.adjust(request.date, trip, request.change, base_reserved, max_seats);
    let delta = ledger.delta(request.date, trip);
    Ok(Json(AdjustResponse {
        applied,
        date: request.date,
        trip_number: trip.number(),
        pending_delta: delta,
        displayed_reserved: base_reserved + delta,
        displayed_available: displayed_available(max_seats, base_reserved, delta),
    }))
}

#[derive(Debug, Serialize)]
pub struct PendingAdjustment {
    pub date: NaiveDate,
    pub trip_number: i32,
    pub delta: i32,
}

async fn pending_adjustments(State(state): State<AppState>) -> Json<Vec<PendingAdjustment>> {
    let ledger = state.ledger.lock().await;
    Json(
        ledger
            .entries()
            .map(|((date, trip), delta)| PendingAdjustment {
                date,
                trip_number: trip.number(),
                delta,
            })
            .collect(),
    )
}

#[derive(Debug, Serialize)]
pub struct SlotAvailability {
    pub date: NaiveDate,
    pub trip_number: i32,
    pub available_seats: i32,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub summary: CommitSummary,
    pub slots: Vec<SlotAvailability>,
}

async fn commit_adjustments(State(state): State<AppState>) -> Json<CommitResponse> {
    let mut ledger = state.ledger.lock().await;
    let affected: Vec<(NaiveDate, TripNumber)> = ledger.entries().map(|(key, _)| key).collect();
    let summary = admin::commit_ledger(state.store.as_ref(), &mut ledger).await;
    drop(ledger);

    if let Err(e) = state.notifier.invalidate_cache(&[]).await {
        tracing::error!("cache invalidation failed: {:#}", e);
    }

    // explicit reload so the admin surface can drop its stale base counts
    let mut slots = Vec::with_capacity(affected.len());
    for (date, trip) in affected {
        let availability = available_seats(state.store.as_ref(), date, trip).await;
        slots.push(SlotAvailability {
            date,
            trip_number: trip.number(),
            available_seats: availability.seat_count(),
        });
    }
    Json(CommitResponse { summary, slots })
}

async fn cancel_adjustments(State(state): State<AppState>) -> StatusCode {
    let mut ledger = state.ledger.lock().await;
    ledger.clear();
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub trip_number: i32,
    pub is_available: bool,
}

async fn set_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleEntry>,
) -> Result<Json<ScheduleEntry>, ApiError> {
    let trip =
        TripNumber::try_from(request.trip_number).map_err(|e| bad_request(e.to_string()))?;

    if !request.is_available {
        let ledger = state.ledger.lock().await;
        if ledger.delta(request.date, trip) != 0 {
            tracing::warn!(
                "closing {} trip {} with pending seat adjustments",
                request.date,
                trip.number()
            );
        }
    }

    state
        .store
        .set_availability(request.date, trip, request.is_available)
        .await
        .map_err(|e| internal_error("failed to update schedule", e))?;

    if let Err(e) = state.notifier.invalidate_cache(&[]).await {
        tracing::error!("cache invalidation failed: {:#}", e);
    }

    Ok(Json(request))
}

#[derive(Debug, Deserialize)]
pub struct HolidayRangeRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub trip_numbers: Vec<i32>,
}

async fn set_holidays(
    State(state): State<AppState>,
    Json(request): Json<HolidayRangeRequest>,
) -> Result<Json<HolidaySummary>, ApiError> {
    if request.end_date < request.start_date {
        return Err(bad_request("end_date must not precede start_date"));
    }
    if request.trip_numbers.is_empty() {
        return Err(bad_request("trip_numbers must not be empty"));
    }
    let mut trips = Vec::with_capacity(request.trip_numbers.len());
    for number in &request.trip_numbers {
        trips.push(TripNumber::try_from(*number).map_err(|e| bad_request(e.to_string()))?);
    }

    let summary =
        admin::set_holiday_range(state.store.as_ref(), request.start_date, request.end_date, &trips)
            .await;

    if let Err(e) = state.notifier.invalidate_cache(&[]).await {
        tracing::error!("cache invalidation failed: {:#}", e);
    }

    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request as HttpRequest};
    use serde_json::{json, Value};
    use shared::ReservationSource;
    use tower::ServiceExt;

    use super::*;
    use crate::store::mem::MemStore;

    const PASSWORD: &str = "let-me-in";

    fn test_app(store: Arc<MemStore>) -> Router {
        create_router(AppState {
            store,
            notifier: Notifier::default(),
            ledger: Arc::new(Mutex::new(AdjustmentLedger::new())),
            admin_password: PASSWORD.to_string(),
        })
    }

    fn get_request(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value, admin: bool) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if admin {
            builder = builder.header("x-admin-password", PASSWORD);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn response_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn booking_body(date: &str, trip: i32, people: i32) -> Value {
        json!({
            "date": date,
            "trip_number": trip,
            "people_count": people,
            "name": "山田太郎",
            "name_kana": "ヤマダタロウ",
            "phone": "090-1234-5678",
            "email": "taro@example.com",
            "rod_rental": true,
            "rod_rental_count": 2,
        })
    }

    #[tokio::test]
    async fn availability_reports_both_trips() {
        let store = Arc::new(MemStore::new());
        let date = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        store.seed_reservation(date, TripNumber::First, 5, ReservationSource::Web);
        let app = test_app(store);

        let response = app
            .oneshot(get_request("/availability?date=2025-07-10"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["date"], "2025-07-10");
        assert_eq!(body["slots"][0]["trip_number"], 1);
        assert_eq!(body["slots"][0]["available_seats"], 3);
        assert_eq!(body["slots"][1]["trip_number"], 2);
        assert_eq!(body["slots"][1]["available_seats"], 8);
    }

    #[tokio::test]
    async fn booking_persists_reservation_and_customer() {
        let store = Arc::new(MemStore::new());
        let app = test_app(store.clone());

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/reservations",
                booking_body("2025-07-10", 1, 3),
                false,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["people_count"], 3);
        assert_eq!(body["status"], "confirmed");
        assert_eq!(body["source"], "web");

        assert_eq!(store.reservations.lock().unwrap().len(), 1);
        let customers = store.customers.lock().unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].phone, "090-1234-5678");
    }

    #[tokio::test]
    async fn booking_validation_rejects_bad_input() {
        let app = test_app(Arc::new(MemStore::new()));

        let mut body = booking_body("2025-07-10", 1, 2);
        body["trip_number"] = json!(3);
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/reservations", body, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/reservations",
                booking_body("2025-07-10", 1, 0),
                false,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut body = booking_body("2025-07-10", 1, 2);
        body["phone"] = json!("");
        let response = app
            .oneshot(json_request(Method::POST, "/reservations", body, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn booking_rejects_overbooking_and_closed_slots() {
        let store = Arc::new(MemStore::new());
        let date = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        store.seed_reservation(date, TripNumber::First, 7, ReservationSource::Web);
        store
            .set_availability(date, TripNumber::Second, false)
            .await
            .unwrap();
        let app = test_app(store);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/reservations",
                booking_body("2025-07-10", 1, 2),
                false,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/reservations",
                booking_body("2025-07-10", 2, 1),
                false,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn admin_routes_require_the_shared_password() {
        let app = test_app(Arc::new(MemStore::new()));

        let response = app
            .clone()
            .oneshot(get_request("/admin/adjustments"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = HttpRequest::builder()
            .method(Method::GET)
            .uri("/admin/adjustments")
            .header("x-admin-password", PASSWORD)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn adjust_commit_flow_updates_seat_counts() {
        let store = Arc::new(MemStore::new());
        let date = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        store.seed_reservation(date, TripNumber::First, 5, ReservationSource::Web);
        let app = test_app(store.clone());

        let adjust = json!({ "date": "2025-07-10", "trip_number": 1, "change": 1 });
        for expected_delta in [1, 2] {
            let response = app
                .clone()
                .oneshot(json_request(
                    Method::POST,
                    "/admin/adjustments",
                    adjust.clone(),
                    true,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = response_json(response).await;
            assert_eq!(body["applied"], true);
            assert_eq!(body["pending_delta"], expected_delta);
        }

        // displayed reserved is 7 of 8: one more unit reaches the ceiling,
        // the unit after that must be rejected
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/admin/adjustments",
                adjust.clone(),
                true,
            ))
            .await
            .unwrap();
        let body = response_json(response).await;
        assert_eq!(body["applied"], true);
        assert_eq!(body["displayed_available"], 0);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/admin/adjustments", adjust, true))
            .await
            .unwrap();
        let body = response_json(response).await;
        assert_eq!(body["applied"], false);
        assert_eq!(body["pending_delta"], 3);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/admin/adjustments/commit",
                json!({}),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["summary"]["inserted"], 3);
        assert_eq!(body["slots"][0]["available_seats"], 0);
        assert_eq!(store.manual_row_count(date, TripNumber::First), 3);

        // ledger is clean again after the commit
        let response = app
            .oneshot(json_request(
                Method::POST,
                "/admin/adjustments/commit",
                json!({}),
                true,
            ))
            .await
            .unwrap();
        let body = response_json(response).await;
        assert_eq!(body["summary"]["inserted"], 0);
    }

    #[tokio::test]
    async fn cancel_discards_pending_adjustments() {
        let store = Arc::new(MemStore::new());
        let app = test_app(store.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/admin/adjustments",
                json!({ "date": "2025-07-10", "trip_number": 1, "change": 1 }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/admin/adjustments/cancel",
                json!({}),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = HttpRequest::builder()
            .method(Method::GET)
            .uri("/admin/adjustments")
            .header("x-admin-password", PASSWORD)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let body = response_json(response).await;
        assert_eq!(body, json!([]));
        // nothing was written to the store
        assert!(store.reservations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn schedule_toggle_and_holiday_range_close_slots() {
        let store = Arc::new(MemStore::new());
        let app = test_app(store.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/admin/schedule",
                json!({ "date": "2025-07-20", "trip_number": 1, "is_available": false }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request("/availability?date=2025-07-20"))
            .await
            .unwrap();
        let body = response_json(response).await;
        assert_eq!(body["slots"][0]["available_seats"], -1);
        assert_eq!(body["slots"][1]["available_seats"], 8);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/admin/schedule/holidays",
                json!({
                    "start_date": "2025-12-24",
                    "end_date": "2025-12-26",
                    "trip_numbers": [1, 2],
                }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["written"], 6);
        assert_eq!(body["failed"], 0);

        let response = app
            .oneshot(get_request("/availability?date=2025-12-25"))
            .await
            .unwrap();
        let body = response_json(response).await;
        assert_eq!(body["slots"][0]["available_seats"], -1);
        assert_eq!(body["slots"][1]["available_seats"], -1);
    }

    #[tokio::test]
    async fn holiday_range_validation() {
        let app = test_app(Arc::new(MemStore::new()));

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/admin/schedule/holidays",
                json!({
                    "start_date": "2025-12-26",
                    "end_date": "2025-12-24",
                    "trip_numbers": [1],
                }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/admin/schedule/holidays",
                json!({
                    "start_date": "2025-12-24",
                    "end_date": "2025-12-26",
                    "trip_numbers": [],
                }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn status_update_handles_unknown_values_and_ids() {
        let store = Arc::new(MemStore::new());
        let date = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        let id = store.seed_reservation(date, TripNumber::First, 2, ReservationSource::Web);
        let app = test_app(store.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/admin/reservations/{}/status", id),
                json!({ "status": "cancelled" }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            store.reservations.lock().unwrap()[0].status,
            "cancelled"
        );

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                &format!("/admin/reservations/{}/status", id),
                json!({ "status": "double-booked" }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                Method::PATCH,
                &format!("/admin/reservations/{}/status", Uuid::new_v4()),
                json!({ "status": "cancelled" }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
