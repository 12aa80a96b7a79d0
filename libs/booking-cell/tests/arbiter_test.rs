use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::models::{BookingError, BookingRequest};
use booking_cell::services::arbiter::BookingArbiter;
use shared_database::SupabaseClient;
use shared_utils::test_utils::{MockPortalResponses, TestConfig};

fn arbiter_for(server: &MockServer) -> BookingArbiter {
    let config = TestConfig::with_storage_url(&server.uri());
    BookingArbiter::with_client(Arc::new(SupabaseClient::new(&config)))
}

fn cleaning_request(email: &str, slot: &str) -> BookingRequest {
    BookingRequest {
        email: email.to_string(),
        treatment: "Teeth Cleaning".to_string(),
        appointment_date: "2026-05-01".to_string(),
        slot: slot.to_string(),
    }
}

async fn mount_cleaning_option(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_options"))
        .and(query_param("name", "eq.Teeth Cleaning"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPortalResponses::appointment_option(1, "Teeth Cleaning", 80, &["8am", "9am", "10am"]),
        ])))
        .mount(server)
        .await;
}

async fn mount_no_prior_bookings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_reserve_success() {
    let server = MockServer::start().await;
    mount_cleaning_option(&server).await;
    mount_no_prior_bookings(&server).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPortalResponses::booking("alice@example.com", "Teeth Cleaning", "2026-05-01", "9am"),
        ])))
        .mount(&server)
        .await;

    let arbiter = arbiter_for(&server);
    let booking = arbiter
        .reserve(cleaning_request("alice@example.com", "9am"))
        .await
        .unwrap();

    assert_eq!(booking.email, "alice@example.com");
    assert_eq!(booking.treatment, "Teeth Cleaning");
    assert_eq!(booking.slot, "9am");
    assert!(!booking.paid);
}

#[tokio::test]
async fn test_reserve_rejects_malformed_date() {
    let server = MockServer::start().await;

    let arbiter = arbiter_for(&server);
    let mut request = cleaning_request("alice@example.com", "9am");
    request.appointment_date = "May 1st 2026".to_string();

    let result = arbiter.reserve(request).await;

    assert_matches!(result, Err(BookingError::InvalidDate(_)));
    // Nothing reaches storage on a malformed date
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reserve_rejects_unknown_treatment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_options"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let arbiter = arbiter_for(&server);
    let mut request = cleaning_request("alice@example.com", "9am");
    request.treatment = "Phrenology".to_string();

    let result = arbiter.reserve(request).await;

    assert_matches!(result, Err(BookingError::UnknownTreatment(ref name)) if name == "Phrenology");
}

#[tokio::test]
async fn test_reserve_rejects_slot_outside_catalog() {
    let server = MockServer::start().await;
    mount_cleaning_option(&server).await;

    let arbiter = arbiter_for(&server);
    let result = arbiter
        .reserve(cleaning_request("alice@example.com", "midnight"))
        .await;

    assert_matches!(result, Err(BookingError::SlotNotOffered { ref slot, .. }) if slot == "midnight");
}

#[tokio::test]
async fn test_reserve_rejects_second_booking_same_day_different_slot() {
    let server = MockServer::start().await;
    mount_cleaning_option(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("email", "eq.alice@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPortalResponses::booking("alice@example.com", "Teeth Cleaning", "2026-05-01", "8am"),
        ])))
        .mount(&server)
        .await;

    let arbiter = arbiter_for(&server);
    // Same caller, same treatment, same date; the slot differing changes nothing
    let result = arbiter
        .reserve(cleaning_request("alice@example.com", "9am"))
        .await;

    assert_matches!(result, Err(BookingError::AlreadyBookedThatDate { .. }));
}

#[tokio::test]
async fn test_reserve_maps_unique_violation_to_slot_taken() {
    let server = MockServer::start().await;
    mount_cleaning_option(&server).await;
    mount_no_prior_bookings(&server).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(MockPortalResponses::unique_violation()),
        )
        .mount(&server)
        .await;

    let arbiter = arbiter_for(&server);
    let result = arbiter
        .reserve(cleaning_request("bob@example.com", "9am"))
        .await;

    assert_matches!(result, Err(BookingError::SlotTaken { ref slot, .. }) if slot == "9am");
}

#[tokio::test]
async fn test_concurrent_reservations_have_one_winner() {
    let server = MockServer::start().await;
    mount_cleaning_option(&server).await;
    mount_no_prior_bookings(&server).await;

    // The storage side accepts exactly one insert for the slot; every
    // later attempt hits the unique index
    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockPortalResponses::booking("alice@example.com", "Teeth Cleaning", "2026-05-01", "9am"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(MockPortalResponses::unique_violation()),
        )
        .mount(&server)
        .await;

    let arbiter = arbiter_for(&server);
    let (first, second) = tokio::join!(
        arbiter.reserve(cleaning_request("alice@example.com", "9am")),
        arbiter.reserve(cleaning_request("bob@example.com", "9am")),
    );

    let winners = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);

    let loser = if first.is_ok() { second } else { first };
    assert_matches!(loser, Err(BookingError::SlotTaken { .. }));
}

#[tokio::test]
async fn test_bookings_for_filters_by_email() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("email", "eq.alice@example.com"))
        .and(query_param("order", "appointment_date.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPortalResponses::booking("alice@example.com", "Teeth Cleaning", "2026-05-01", "9am"),
            MockPortalResponses::booking("alice@example.com", "Root Canal", "2026-05-02", "1pm"),
        ])))
        .mount(&server)
        .await;

    let arbiter = arbiter_for(&server);
    let bookings = arbiter.bookings_for("alice@example.com").await.unwrap();

    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].treatment, "Teeth Cleaning");
    assert_eq!(bookings[1].treatment, "Root Canal");
}

#[tokio::test]
async fn test_get_unknown_booking_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let arbiter = arbiter_for(&server);
    let result = arbiter.get(Uuid::new_v4()).await;

    assert_matches!(result, Err(BookingError::NotFound));
}
