//! Hostel residency workflow: application intake, staff review, and
//! race-safe room allotment.

pub mod domain;
pub mod intake;
pub mod notify;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    floor_of, AdmissionCategory, Allotment, AllotmentStatus, Application, ApplicationId,
    ApplicationStatus, BedNumber, HostelBuilding, StudentId, StudentProfile,
};
pub use intake::{ApplicationForm, IntakeGuard, IntakeViolation};
pub use notify::{AllotmentNotice, AllotmentNotifier, LogNotifier, NotifyError};
pub use repository::{
    AllotmentStore, AllotmentView, ApplicationStore, ApplicationView, RepositoryError,
    RoomOccupancy,
};
pub use router::residency_router;
pub use service::{ResidencyService, ResidencyServiceError};
pub use store::MemoryHostelStore;
