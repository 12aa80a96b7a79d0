use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::services::availability::SlotAvailabilityResolver;
use shared_database::{DbError, SupabaseClient};
use shared_utils::test_utils::{MockPortalResponses, TestConfig};

fn resolver_for(server: &MockServer) -> SlotAvailabilityResolver {
    let config = TestConfig::with_storage_url(&server.uri());
    SlotAvailabilityResolver::with_client(Arc::new(SupabaseClient::new(&config)))
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_options"))
        .and(query_param("order", "id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockPortalResponses::appointment_option(1, "Teeth Cleaning", 80, &["8am", "9am", "10am"]),
            MockPortalResponses::appointment_option(2, "Root Canal", 250, &["11am", "1pm"]),
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_subtracts_booked_slots() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("appointment_date", "eq.2026-05-01"))
        .and(query_param("select", "treatment,slot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "treatment": "Teeth Cleaning", "slot": "9am" },
        ])))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let entries = resolver.resolve(Some("2026-05-01")).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "Teeth Cleaning");
    assert_eq!(entries[0].slots, vec!["8am", "10am"]);
    assert_eq!(entries[1].name, "Root Canal");
    assert_eq!(entries[1].slots, vec!["11am", "1pm"]);
}

#[tokio::test]
async fn test_resolve_fully_booked_option_keeps_empty_entry() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "treatment": "Root Canal", "slot": "11am" },
            { "treatment": "Root Canal", "slot": "1pm" },
        ])))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let entries = resolver.resolve(Some("2026-05-01")).await.unwrap();

    // Sold-out treatments stay in the list with an empty slot vector
    assert_eq!(entries[1].name, "Root Canal");
    assert!(entries[1].slots.is_empty());
    assert_eq!(entries[1].price, 250);
}

#[tokio::test]
async fn test_resolve_without_date_returns_full_catalog() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let resolver = resolver_for(&server);
    let entries = resolver.resolve(None).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].slots, vec!["8am", "9am", "10am"]);
}

#[tokio::test]
async fn test_resolve_malformed_date_treated_as_absent() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let resolver = resolver_for(&server);
    let entries = resolver.resolve(Some("May 1st")).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].slots, vec!["8am", "9am", "10am"]);
}

#[tokio::test]
async fn test_pushdown_passes_date_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/available_slots"))
        .and(body_json(json!({ "on_date": "2026-05-01" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Teeth Cleaning", "price": 80, "slots": ["8am", "10am"] },
        ])))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let entries = resolver.resolve_pushdown(Some("2026-05-01")).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].slots, vec!["8am", "10am"]);
}

#[tokio::test]
async fn test_pushdown_malformed_date_sends_null() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/available_slots"))
        .and(body_json(json!({ "on_date": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Teeth Cleaning", "price": 80, "slots": ["8am", "9am", "10am"] },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let entries = resolver.resolve_pushdown(Some("not-a-date")).await.unwrap();

    assert_eq!(entries[0].slots.len(), 3);
}

#[tokio::test]
async fn test_specialties_returns_names_in_catalog_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_options"))
        .and(query_param("select", "name"))
        .and(query_param("order", "id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Teeth Cleaning" },
            { "name": "Root Canal" },
        ])))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let specialties = resolver.specialties().await.unwrap();

    assert_eq!(specialties.len(), 2);
    assert_eq!(specialties[0].name, "Teeth Cleaning");
    assert_eq!(specialties[1].name, "Root Canal");
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_options"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockPortalResponses::error_response("internal error", "XX000"),
        ))
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let result = resolver.resolve(None).await;

    assert_matches!(result, Err(DbError::Api { status: 500, .. }));
}
