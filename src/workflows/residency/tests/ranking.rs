use super::common::*;
use crate::workflows::residency::domain::{ApplicationStatus, BedNumber, HostelBuilding};

#[test]
fn applications_rank_by_cgpa_descending() {
    let (service, _, _) = build_service();
    for (student, cgpa) in [("21CS014", 6.0), ("21ME007", 9.2), ("21EE031", 7.5)] {
        service
            .submit(application_form(student, cgpa))
            .expect("submission succeeds");
    }

    let ranked = service
        .list_applications(Some(ApplicationStatus::Pending))
        .expect("listing succeeds");

    let cgpas: Vec<f32> = ranked.iter().map(|application| application.cgpa).collect();
    assert_eq!(cgpas, vec![9.2, 7.5, 6.0]);
}

#[test]
fn equal_cgpa_preserves_submission_order() {
    let (service, _, _) = build_service();
    let first = service
        .submit(application_form("21CS014", 8.0))
        .expect("first submission");
    let second = service
        .submit(application_form("21ME007", 8.0))
        .expect("second submission");

    let ranked = service
        .list_applications(None)
        .expect("listing succeeds");

    assert_eq!(ranked[0].application_id, first.application_id);
    assert_eq!(ranked[1].application_id, second.application_id);
}

#[test]
fn status_filter_narrows_the_listing() {
    let (service, _, _) = build_service();
    let first = service
        .submit(application_form("21CS014", 9.0))
        .expect("first submission");
    let second = service
        .submit(application_form("21ME007", 8.0))
        .expect("second submission");
    service
        .submit(application_form("21EE031", 7.0))
        .expect("third submission");

    service
        .allot_room(
            &first.application_id,
            HostelBuilding::BlockA,
            "101",
            BedNumber::One,
        )
        .expect("allotment succeeds");
    service.reject(&second.application_id).expect("rejection");

    let pending = service
        .list_applications(Some(ApplicationStatus::Pending))
        .expect("pending listing");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].cgpa, 7.0);

    let approved = service
        .list_applications(Some(ApplicationStatus::Approved))
        .expect("approved listing");
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].application_id, first.application_id);
}
