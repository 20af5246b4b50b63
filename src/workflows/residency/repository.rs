use serde::Serialize;

use super::domain::{
    Allotment, Application, ApplicationId, ApplicationStatus, BedNumber, HostelBuilding,
};

/// Error enumeration for storage failures.
///
/// `SeatOccupied` and `StateConflict` exist so the allocation service can
/// distinguish "the bed is gone" from "the application moved under us" after a
/// racing write; both are detected by the store at commit time, never by the
/// advisory pre-reads.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("bed already occupied")]
    SeatOccupied,
    #[error("application status changed concurrently (now {actual})")]
    StateConflict { actual: ApplicationStatus },
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the applications collection.
pub trait ApplicationStore: Send + Sync {
    /// Persist a new application. Must reject a duplicate `application_id`
    /// or a second application for the same `student_id` with `Conflict`.
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;

    /// Compare-and-set status update: succeeds only while the stored status
    /// still equals `expect`, otherwise fails with `StateConflict`.
    fn set_status(
        &self,
        id: &ApplicationId,
        expect: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Application, RepositoryError>;

    /// All applications, optionally filtered by status, in submission order.
    fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError>;
}

/// Storage abstraction over the allotments collection.
pub trait AllotmentStore: Send + Sync {
    /// Persist an active allotment. The store is the authority for seat
    /// uniqueness: it must atomically reject an active occupant of the same
    /// (building, room, bed) triple with `SeatOccupied`, and a second
    /// allotment for the same application with `Conflict`.
    fn insert_active(&self, allotment: Allotment) -> Result<Allotment, RepositoryError>;

    /// Flip an application's allotment to cancelled. Used as the compensation
    /// path when the paired status update loses a race.
    fn cancel(&self, application_id: &ApplicationId) -> Result<(), RepositoryError>;

    fn fetch_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<Allotment>, RepositoryError>;

    /// Bed numbers with an active occupant in the given room, ascending.
    fn occupied_beds(
        &self,
        building: HostelBuilding,
        room_number: &str,
    ) -> Result<Vec<BedNumber>, RepositoryError>;
}

/// Sanitized representation of an application for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: ApplicationId,
    pub student_id: String,
    pub full_name: String,
    pub cgpa: f32,
    pub category: &'static str,
    pub status: &'static str,
}

impl ApplicationView {
    pub fn from_application(application: &Application) -> Self {
        Self {
            application_id: application.application_id.clone(),
            student_id: application.student_id.0.clone(),
            full_name: application.profile.full_name.clone(),
            cgpa: application.cgpa,
            category: application.category.label(),
            status: application.status.label(),
        }
    }
}

/// Wire representation of a confirmed allotment.
#[derive(Debug, Clone, Serialize)]
pub struct AllotmentView {
    pub application_id: ApplicationId,
    pub student_id: String,
    pub building: &'static str,
    pub room_number: String,
    pub bed_number: u8,
    pub floor: u8,
    pub status: &'static str,
}

impl AllotmentView {
    pub fn from_allotment(allotment: &Allotment) -> Self {
        Self {
            application_id: allotment.application_id.clone(),
            student_id: allotment.student_id.0.clone(),
            building: allotment.building.code(),
            room_number: allotment.room_number.clone(),
            bed_number: allotment.bed_number.index(),
            floor: allotment.floor,
            status: allotment.status.label(),
        }
    }
}

/// Advisory occupancy snapshot used by review staff to pre-filter beds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomOccupancy {
    pub occupied_count: usize,
    pub occupied_beds: Vec<u8>,
}

impl RoomOccupancy {
    pub fn from_beds(beds: &[BedNumber]) -> Self {
        Self {
            occupied_count: beds.len(),
            occupied_beds: beds.iter().map(|bed| bed.index()).collect(),
        }
    }
}
