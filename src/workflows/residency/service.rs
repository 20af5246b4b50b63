use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Datelike, Local};

use super::domain::{
    floor_of, Allotment, AllotmentStatus, Application, ApplicationId, ApplicationStatus,
    BedNumber, HostelBuilding, StudentId,
};
use super::intake::{ApplicationForm, IntakeGuard, IntakeViolation};
use super::notify::{AllotmentNotice, AllotmentNotifier, NotifyError};
use super::repository::{AllotmentStore, ApplicationStore, RepositoryError, RoomOccupancy};

/// Service composing the intake guard, both stores, and the notifier.
///
/// Every status write, whether it comes from the review endpoints or from
/// room allotment, is gated by [`ApplicationStatus::permits`] and committed
/// as a compare-and-set, so the two paths share one transition table.
pub struct ResidencyService<R, L, N> {
    guard: IntakeGuard,
    applications: Arc<R>,
    allotments: Arc<L>,
    notifier: Arc<N>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id(year: i32) -> ApplicationId {
    let seq = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("HOSTEL-{year}-{seq:04}"))
}

impl<R, L, N> ResidencyService<R, L, N>
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    pub fn new(applications: Arc<R>, allotments: Arc<L>, notifier: Arc<N>) -> Self {
        Self {
            guard: IntakeGuard,
            applications,
            allotments,
            notifier,
        }
    }

    /// Submit a new application, returning the stored record with its
    /// generated `HOSTEL-<year>-<seq>` identifier and `pending` status.
    pub fn submit(&self, form: ApplicationForm) -> Result<Application, ResidencyServiceError> {
        let today = Local::now().date_naive();
        let mut application = self.guard.application_from_form(form, today)?;
        application.application_id = next_application_id(today.year());

        let student_id = application.student_id.clone();
        match self.applications.insert(application) {
            Ok(stored) => {
                tracing::info!(
                    application_id = %stored.application_id,
                    student_id = %stored.student_id,
                    "hostel application received"
                );
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => {
                Err(ResidencyServiceError::DuplicateApplication(student_id))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Review decision: `pending -> approved`.
    pub fn approve(&self, id: &ApplicationId) -> Result<Application, ResidencyServiceError> {
        self.transition(id, ApplicationStatus::Approved)
    }

    /// Review decision: `pending -> rejected`.
    pub fn reject(&self, id: &ApplicationId) -> Result<Application, ResidencyServiceError> {
        self.transition(id, ApplicationStatus::Rejected)
    }

    fn transition(
        &self,
        id: &ApplicationId,
        to: ApplicationStatus,
    ) -> Result<Application, ResidencyServiceError> {
        let application = self
            .applications
            .fetch(id)?
            .ok_or_else(|| ResidencyServiceError::NotFound(id.clone()))?;

        if !application.status.permits(to) {
            return Err(ResidencyServiceError::InvalidTransition {
                id: id.clone(),
                from: application.status,
                to,
            });
        }

        // The pending check above is advisory; the store re-verifies it at
        // commit time so two racing reviewers cannot both win.
        match self.applications.set_status(id, application.status, to) {
            Ok(updated) => {
                tracing::info!(application_id = %id, status = %to, "application reviewed");
                Ok(updated)
            }
            Err(RepositoryError::StateConflict { actual }) => {
                Err(ResidencyServiceError::InvalidTransition {
                    id: id.clone(),
                    from: actual,
                    to,
                })
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Reserve a specific bed for an application and mark it approved.
    ///
    /// Allotment implies approval: a `pending` application is moved straight
    /// to `approved` here, while an application approved earlier (and thus
    /// already holding a bed) fails `AlreadyAllotted` and a rejected one
    /// fails the transition table.
    pub fn allot_room(
        &self,
        id: &ApplicationId,
        building: HostelBuilding,
        room_number: &str,
        bed_number: BedNumber,
    ) -> Result<Allotment, ResidencyServiceError> {
        let room_number = room_number.trim();
        if room_number.is_empty() {
            return Err(IntakeViolation::MissingField {
                field: "room_number",
            }
            .into());
        }

        let application = self
            .applications
            .fetch(id)?
            .ok_or_else(|| ResidencyServiceError::NotFound(id.clone()))?;

        match application.status {
            ApplicationStatus::Approved => {
                return Err(ResidencyServiceError::AlreadyAllotted { id: id.clone() })
            }
            ApplicationStatus::Rejected => {
                return Err(ResidencyServiceError::InvalidTransition {
                    id: id.clone(),
                    from: ApplicationStatus::Rejected,
                    to: ApplicationStatus::Approved,
                })
            }
            ApplicationStatus::Pending => {}
        }

        let allotment = Allotment {
            application_id: id.clone(),
            student_id: application.student_id.clone(),
            building,
            room_number: room_number.to_string(),
            bed_number,
            floor: floor_of(room_number),
            allotted_on: Local::now().date_naive(),
            status: AllotmentStatus::Active,
        };

        // The bed is the scarce resource, so it commits first; the store
        // enforces seat and per-application uniqueness under its own lock.
        let allotment = match self.allotments.insert_active(allotment) {
            Ok(stored) => stored,
            Err(RepositoryError::SeatOccupied) => {
                return Err(ResidencyServiceError::SeatTaken {
                    building,
                    room_number: room_number.to_string(),
                    bed_number,
                })
            }
            Err(RepositoryError::Conflict) => {
                return Err(ResidencyServiceError::AlreadyAllotted { id: id.clone() })
            }
            Err(other) => return Err(other.into()),
        };

        // Pair the reservation with the status flip. If a concurrent explicit
        // approval won the race, release the bed again so neither half of the
        // unit survives alone.
        if let Err(err) = self.applications.set_status(
            id,
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
        ) {
            self.allotments.cancel(id)?;
            return match err {
                RepositoryError::StateConflict { .. } => {
                    Err(ResidencyServiceError::AlreadyAllotted { id: id.clone() })
                }
                other => Err(other.into()),
            };
        }

        tracing::info!(
            application_id = %id,
            building = %building,
            room = %allotment.room_number,
            bed = %bed_number,
            "bed allotted"
        );

        let mut details = BTreeMap::new();
        details.insert("building".to_string(), building.label().to_string());
        details.insert("room".to_string(), allotment.room_number.clone());
        details.insert("bed".to_string(), bed_number.to_string());
        self.notifier.publish(AllotmentNotice {
            template: "allotment_confirmed".to_string(),
            application_id: id.clone(),
            details,
        })?;

        Ok(allotment)
    }

    /// Advisory occupancy snapshot for a room; the authoritative check stays
    /// inside the store at insert time.
    pub fn room_occupancy(
        &self,
        building: HostelBuilding,
        room_number: &str,
    ) -> Result<RoomOccupancy, ResidencyServiceError> {
        let beds = self.allotments.occupied_beds(building, room_number.trim())?;
        Ok(RoomOccupancy::from_beds(&beds))
    }

    /// Applications ranked for review: CGPA descending, ties stable by
    /// submission order.
    pub fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, ResidencyServiceError> {
        let mut applications = self.applications.list(status)?;
        applications.sort_by(|a, b| b.cgpa.total_cmp(&a.cgpa));
        Ok(applications)
    }

    /// Fetch an application for API responses.
    pub fn get(&self, id: &ApplicationId) -> Result<Application, ResidencyServiceError> {
        self.applications
            .fetch(id)?
            .ok_or_else(|| ResidencyServiceError::NotFound(id.clone()))
    }

    /// The confirmed allotment for an application, if any.
    pub fn allotment_of(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Allotment>, ResidencyServiceError> {
        Ok(self.allotments.fetch_for_application(id)?)
    }
}

/// Error raised by the residency service.
#[derive(Debug, thiserror::Error)]
pub enum ResidencyServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error("a hostel application already exists for student {0}")]
    DuplicateApplication(StudentId),
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error("application {id} is already approved and holds a bed")]
    AlreadyAllotted { id: ApplicationId },
    #[error("bed {bed_number} in room {room_number} of {building} is already occupied")]
    SeatTaken {
        building: HostelBuilding,
        room_number: String,
        bed_number: BedNumber,
    },
    #[error("application {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
