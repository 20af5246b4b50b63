use std::sync::Mutex;

use chrono::NaiveDate;

use super::domain::{Complaint, ComplaintId, ComplaintStatus, Notice, NoticeAudience};
use super::repository::{ComplaintStore, DeskRepositoryError, NoticeStore};

/// In-memory store backing the complaint register and the notice board.
#[derive(Debug, Default)]
pub struct MemoryDeskStore {
    inner: Mutex<DeskState>,
}

#[derive(Debug, Default)]
struct DeskState {
    complaints: Vec<Complaint>,
    notices: Vec<Notice>,
}

impl MemoryDeskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, DeskState>, DeskRepositoryError> {
        self.inner
            .lock()
            .map_err(|_| DeskRepositoryError::Unavailable("desk store lock poisoned".to_string()))
    }
}

impl ComplaintStore for MemoryDeskStore {
    fn insert(&self, complaint: Complaint) -> Result<Complaint, DeskRepositoryError> {
        let mut state = self.lock()?;
        if state
            .complaints
            .iter()
            .any(|existing| existing.complaint_id == complaint.complaint_id)
        {
            return Err(DeskRepositoryError::Conflict);
        }
        state.complaints.push(complaint.clone());
        Ok(complaint)
    }

    fn fetch(&self, id: &ComplaintId) -> Result<Option<Complaint>, DeskRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .complaints
            .iter()
            .find(|complaint| &complaint.complaint_id == id)
            .cloned())
    }

    fn set_status(
        &self,
        id: &ComplaintId,
        expect: ComplaintStatus,
        to: ComplaintStatus,
        resolved_on: Option<NaiveDate>,
    ) -> Result<Complaint, DeskRepositoryError> {
        let mut state = self.lock()?;
        let complaint = state
            .complaints
            .iter_mut()
            .find(|complaint| &complaint.complaint_id == id)
            .ok_or(DeskRepositoryError::NotFound)?;
        if complaint.status != expect {
            return Err(DeskRepositoryError::StateConflict {
                actual: complaint.status,
            });
        }
        complaint.status = to;
        if resolved_on.is_some() {
            complaint.resolved_on = resolved_on;
        }
        Ok(complaint.clone())
    }

    fn list(
        &self,
        status: Option<ComplaintStatus>,
    ) -> Result<Vec<Complaint>, DeskRepositoryError> {
        let state = self.lock()?;
        let mut complaints: Vec<Complaint> = state
            .complaints
            .iter()
            .filter(|complaint| status.map_or(true, |wanted| complaint.status == wanted))
            .cloned()
            .collect();
        complaints.reverse();
        Ok(complaints)
    }
}

impl NoticeStore for MemoryDeskStore {
    fn insert(&self, notice: Notice) -> Result<Notice, DeskRepositoryError> {
        let mut state = self.lock()?;
        if state
            .notices
            .iter()
            .any(|existing| existing.notice_id == notice.notice_id)
        {
            return Err(DeskRepositoryError::Conflict);
        }
        state.notices.push(notice.clone());
        Ok(notice)
    }

    fn list(
        &self,
        audience: Option<NoticeAudience>,
    ) -> Result<Vec<Notice>, DeskRepositoryError> {
        let state = self.lock()?;
        let mut notices: Vec<Notice> = state
            .notices
            .iter()
            .filter(|notice| audience.map_or(true, |wanted| notice.audience.reaches(wanted)))
            .cloned()
            .collect();
        notices.reverse();
        Ok(notices)
    }
}
