use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::residency::domain::{BedNumber, HostelBuilding};
use crate::workflows::residency::router::residency_router;
use crate::workflows::residency::service::ResidencyService;

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn submission_payload(student_id: &str) -> Value {
    json!({
        "student_id": student_id,
        "full_name": "Asha Verma",
        "email": format!("{student_id}@college.example"),
        "phone": "9876543210",
        "guardian_phone": "9123456780",
        "cgpa": 8.7,
        "category": "general",
    })
}

#[tokio::test]
async fn submit_route_accepts_payloads() {
    let (service, _, _) = build_service();
    let router = residency_router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/hostel/applications",
            &submission_payload("21CS014"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("pending")));
    assert!(payload.get("application_id").is_some());
}

#[tokio::test]
async fn duplicate_submission_returns_conflict() {
    let (service, _, _) = build_service();
    let router = residency_router_with_service(service);

    let first = router
        .clone()
        .oneshot(post_json(
            "/api/v1/hostel/applications",
            &submission_payload("21CS014"),
        ))
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::ACCEPTED);

    let second = router
        .oneshot(post_json(
            "/api/v1/hostel/applications",
            &submission_payload("21CS014"),
        ))
        .await
        .expect("route executes");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_submission_returns_unprocessable() {
    let (service, _, _) = build_service();
    let router = residency_router_with_service(service);

    let mut payload = submission_payload("21CS014");
    payload["cgpa"] = json!(11.0);

    let response = router
        .oneshot(post_json("/api/v1/hostel/applications", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn review_routes_drive_the_state_machine() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let router = residency_router(service.clone());

    let application = service
        .submit(application_form("21CS014", 8.7))
        .expect("submission succeeds");
    let approve_uri = format!(
        "/api/v1/hostel/applications/{}/approve",
        application.application_id
    );

    let approved = router
        .clone()
        .oneshot(post_json(&approve_uri, &json!({})))
        .await
        .expect("route executes");
    assert_eq!(approved.status(), StatusCode::OK);
    let payload = read_json_body(approved).await;
    assert_eq!(payload.get("status"), Some(&json!("approved")));

    let again = router
        .oneshot(post_json(&approve_uri, &json!({})))
        .await
        .expect("route executes");
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn allotment_route_creates_and_then_conflicts() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let router = residency_router(service.clone());

    let first = service
        .submit(application_form("21CS014", 8.7))
        .expect("first submission");
    let second = service
        .submit(application_form("21ME007", 7.5))
        .expect("second submission");

    let allot = |application_id: &str| {
        json!({
            "application_id": application_id,
            "building": "block_a",
            "room_number": "101",
            "bed_number": 1,
        })
    };

    let created = router
        .clone()
        .oneshot(post_json(
            "/api/v1/hostel/allotments",
            &allot(&first.application_id.0),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let payload = read_json_body(created).await;
    assert_eq!(payload.get("floor"), Some(&json!(1)));
    assert_eq!(payload.get("status"), Some(&json!("active")));

    let conflicted = router
        .oneshot(post_json(
            "/api/v1/hostel/allotments",
            &allot(&second.application_id.0),
        ))
        .await
        .expect("route executes");
    assert_eq!(conflicted.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn allotment_route_rejects_bed_three() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let router = residency_router(service.clone());

    let application = service
        .submit(application_form("21CS014", 8.7))
        .expect("submission succeeds");

    let response = router
        .oneshot(post_json(
            "/api/v1/hostel/allotments",
            &json!({
                "application_id": application.application_id.0,
                "building": "block_a",
                "room_number": "101",
                "bed_number": 3,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn occupancy_route_reports_room_state() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let router = residency_router(service.clone());

    let application = service
        .submit(application_form("21CS014", 8.7))
        .expect("submission succeeds");
    service
        .allot_room(
            &application.application_id,
            HostelBuilding::BlockA,
            "101",
            BedNumber::Two,
        )
        .expect("allotment succeeds");

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/hostel/rooms/block_a/101/occupancy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("occupied_count"), Some(&json!(1)));
    assert_eq!(payload.get("occupied_beds"), Some(&json!([2])));

    let unknown = router
        .oneshot(
            Request::get("/api/v1/hostel/rooms/block_z/101/occupancy")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn listing_route_orders_by_cgpa() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let router = residency_router(service.clone());

    for (student, cgpa) in [("21CS014", 6.0), ("21ME007", 9.2), ("21EE031", 7.5)] {
        service
            .submit(application_form(student, cgpa))
            .expect("submission succeeds");
    }

    let response = router
        .clone()
        .oneshot(
            Request::get("/api/v1/hostel/applications?status=pending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let cgpas: Vec<f64> = payload
        .as_array()
        .expect("array payload")
        .iter()
        .map(|entry| entry.get("cgpa").and_then(Value::as_f64).expect("cgpa"))
        .collect();
    let expected = [9.2, 7.5, 6.0];
    assert_eq!(cgpas.len(), expected.len());
    for (actual, wanted) in cgpas.iter().zip(expected) {
        assert!((actual - wanted).abs() < 1e-5, "got {cgpas:?}");
    }

    let bad_filter = router
        .oneshot(
            Request::get("/api/v1/hostel/applications?status=waitlisted")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(bad_filter.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn status_route_returns_not_found_for_unknown_application() {
    let (service, _, _) = build_service();
    let router = residency_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/hostel/applications/HOSTEL-2026-0000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repository_outage_maps_to_internal_error() {
    let service = Arc::new(ResidencyService::new(
        Arc::new(UnavailableStore),
        Arc::new(UnavailableStore),
        Arc::new(MemoryNotifier::default()),
    ));
    let router = residency_router(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/hostel/applications",
            &submission_payload("21CS014"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
