use std::sync::Arc;

use super::common::*;
use crate::workflows::residency::domain::{ApplicationId, ApplicationStatus};
use crate::workflows::residency::repository::RepositoryError;
use crate::workflows::residency::service::{ResidencyService, ResidencyServiceError};

#[test]
fn submit_assigns_generated_id_and_pending_status() {
    let (service, _, _) = build_service();

    let application = service
        .submit(application_form("21CS014", 8.7))
        .expect("submission succeeds");

    assert_eq!(application.status, ApplicationStatus::Pending);

    let parts: Vec<&str> = application.application_id.0.split('-').collect();
    assert_eq!(parts.len(), 3, "expected HOSTEL-<year>-<seq>");
    assert_eq!(parts[0], "HOSTEL");
    assert_eq!(parts[1].len(), 4);
    assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(parts[2].len(), 4);
    assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn second_submission_for_same_student_is_rejected() {
    let (service, _, _) = build_service();
    service
        .submit(application_form("21CS014", 8.7))
        .expect("first submission succeeds");

    match service.submit(application_form("21CS014", 9.0)) {
        Err(ResidencyServiceError::DuplicateApplication(student)) => {
            assert_eq!(student.0, "21CS014");
        }
        other => panic!("expected duplicate application, got {other:?}"),
    }
}

#[test]
fn submit_propagates_intake_violations() {
    let (service, _, _) = build_service();
    let mut form = application_form("21CS014", 8.7);
    form.cgpa = 11.0;

    match service.submit(form) {
        Err(ResidencyServiceError::Intake(_)) => {}
        other => panic!("expected intake violation, got {other:?}"),
    }
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service();

    match service.get(&ApplicationId("HOSTEL-2026-0000".to_string())) {
        Err(ResidencyServiceError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn allotment_of_returns_none_before_allocation() {
    let (service, _, _) = build_service();
    let application = service
        .submit(application_form("21CS014", 8.7))
        .expect("submission succeeds");

    let allotment = service
        .allotment_of(&application.application_id)
        .expect("lookup succeeds");
    assert!(allotment.is_none());
}

#[test]
fn submit_surfaces_store_outage() {
    let service = ResidencyService::new(
        Arc::new(UnavailableStore),
        Arc::new(UnavailableStore),
        Arc::new(MemoryNotifier::default()),
    );

    match service.submit(application_form("21CS014", 8.7)) {
        Err(ResidencyServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable error, got {other:?}"),
    }
}
