use std::sync::Mutex;

use super::domain::{
    Allotment, AllotmentStatus, Application, ApplicationId, ApplicationStatus, BedNumber,
    HostelBuilding,
};
use super::repository::{AllotmentStore, ApplicationStore, RepositoryError};

/// In-memory store backing both allocation collections.
///
/// A single lock guards applications and allotments together, so the
/// uniqueness checks performed inside `insert_active` and `set_status` are
/// atomic with the writes they guard. Concurrent allot calls racing for the
/// same bed serialize here and the loser observes `SeatOccupied` instead of
/// double-booking.
#[derive(Debug, Default)]
pub struct MemoryHostelStore {
    inner: Mutex<HostelState>,
}

#[derive(Debug, Default)]
struct HostelState {
    applications: Vec<Application>,
    allotments: Vec<Allotment>,
}

impl MemoryHostelStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HostelState>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("hostel store lock poisoned".to_string()))
    }
}

impl ApplicationStore for MemoryHostelStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut state = self.lock()?;
        let duplicate = state.applications.iter().any(|existing| {
            existing.application_id == application.application_id
                || existing.student_id == application.student_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        state.applications.push(application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .iter()
            .find(|application| &application.application_id == id)
            .cloned())
    }

    fn set_status(
        &self,
        id: &ApplicationId,
        expect: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        let mut state = self.lock()?;
        let application = state
            .applications
            .iter_mut()
            .find(|application| &application.application_id == id)
            .ok_or(RepositoryError::NotFound)?;
        if application.status != expect {
            return Err(RepositoryError::StateConflict {
                actual: application.status,
            });
        }
        application.status = to;
        Ok(application.clone())
    }

    fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .iter()
            .filter(|application| status.map_or(true, |wanted| application.status == wanted))
            .cloned()
            .collect())
    }
}

impl AllotmentStore for MemoryHostelStore {
    fn insert_active(&self, allotment: Allotment) -> Result<Allotment, RepositoryError> {
        let mut state = self.lock()?;

        let already_allotted = state
            .allotments
            .iter()
            .any(|existing| existing.application_id == allotment.application_id);
        if already_allotted {
            return Err(RepositoryError::Conflict);
        }

        let seat_occupied = state.allotments.iter().any(|existing| {
            existing.status == AllotmentStatus::Active
                && existing.building == allotment.building
                && existing.room_number == allotment.room_number
                && existing.bed_number == allotment.bed_number
        });
        if seat_occupied {
            return Err(RepositoryError::SeatOccupied);
        }

        state.allotments.push(allotment.clone());
        Ok(allotment)
    }

    fn cancel(&self, application_id: &ApplicationId) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let allotment = state
            .allotments
            .iter_mut()
            .find(|allotment| &allotment.application_id == application_id)
            .ok_or(RepositoryError::NotFound)?;
        allotment.status = AllotmentStatus::Cancelled;
        Ok(())
    }

    fn fetch_for_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<Allotment>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .allotments
            .iter()
            .find(|allotment| &allotment.application_id == application_id)
            .cloned())
    }

    fn occupied_beds(
        &self,
        building: HostelBuilding,
        room_number: &str,
    ) -> Result<Vec<BedNumber>, RepositoryError> {
        let state = self.lock()?;
        let mut beds: Vec<BedNumber> = state
            .allotments
            .iter()
            .filter(|allotment| {
                allotment.status == AllotmentStatus::Active
                    && allotment.building == building
                    && allotment.room_number == room_number
            })
            .map(|allotment| allotment.bed_number)
            .collect();
        beds.sort_by_key(|bed| bed.index());
        Ok(beds)
    }
}
