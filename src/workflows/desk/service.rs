use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::workflows::residency::StudentId;

use super::domain::{
    Complaint, ComplaintCategory, ComplaintId, ComplaintStatus, Notice, NoticeAudience,
};
use super::repository::{ComplaintStore, DeskRepositoryError, NoticeStore};

/// Validation errors raised by the desk service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeskViolation {
    #[error("required field '{field}' is missing or empty")]
    MissingField { field: &'static str },
}

/// Raw complaint payload as received from the complaint form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintForm {
    pub student_id: String,
    pub category: ComplaintCategory,
    pub subject: String,
    pub description: String,
}

/// Raw notice payload as posted by staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeForm {
    pub title: String,
    pub body: String,
    pub audience: NoticeAudience,
}

static COMPLAINT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static NOTICE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_complaint_id(year: i32) -> ComplaintId {
    let seq = COMPLAINT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ComplaintId(format!("CMP-{year}-{seq:04}"))
}

/// Service handling the complaint register and the notice board.
pub struct DeskService<C, B> {
    complaints: Arc<C>,
    notices: Arc<B>,
}

impl<C, B> DeskService<C, B>
where
    C: ComplaintStore + 'static,
    B: NoticeStore + 'static,
{
    pub fn new(complaints: Arc<C>, notices: Arc<B>) -> Self {
        Self {
            complaints,
            notices,
        }
    }

    /// File a new complaint; it starts `open`.
    pub fn file_complaint(&self, form: ComplaintForm) -> Result<Complaint, DeskServiceError> {
        require(&form.student_id, "student_id")?;
        require(&form.subject, "subject")?;
        require(&form.description, "description")?;

        let today = Local::now().date_naive();
        let complaint = Complaint {
            complaint_id: next_complaint_id(today.year()),
            student_id: StudentId(form.student_id.trim().to_string()),
            category: form.category,
            subject: form.subject.trim().to_string(),
            description: form.description.trim().to_string(),
            status: ComplaintStatus::Open,
            opened_on: today,
            resolved_on: None,
        };

        let stored = self.complaints.insert(complaint)?;
        tracing::info!(
            complaint_id = %stored.complaint_id,
            category = stored.category.label(),
            "complaint filed"
        );
        Ok(stored)
    }

    /// Staff picked the ticket up: `open -> in_progress`.
    pub fn progress_complaint(&self, id: &ComplaintId) -> Result<Complaint, DeskServiceError> {
        self.transition(id, ComplaintStatus::InProgress, None)
    }

    /// Close the ticket: `open | in_progress -> resolved`.
    pub fn resolve_complaint(&self, id: &ComplaintId) -> Result<Complaint, DeskServiceError> {
        let today = Local::now().date_naive();
        self.transition(id, ComplaintStatus::Resolved, Some(today))
    }

    fn transition(
        &self,
        id: &ComplaintId,
        to: ComplaintStatus,
        resolved_on: Option<chrono::NaiveDate>,
    ) -> Result<Complaint, DeskServiceError> {
        let complaint = self
            .complaints
            .fetch(id)?
            .ok_or_else(|| DeskServiceError::NotFound(id.clone()))?;

        if !complaint.status.permits(to) {
            return Err(DeskServiceError::InvalidTransition {
                id: id.clone(),
                from: complaint.status,
                to,
            });
        }

        match self
            .complaints
            .set_status(id, complaint.status, to, resolved_on)
        {
            Ok(updated) => Ok(updated),
            Err(DeskRepositoryError::StateConflict { actual }) => {
                Err(DeskServiceError::InvalidTransition {
                    id: id.clone(),
                    from: actual,
                    to,
                })
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn list_complaints(
        &self,
        status: Option<ComplaintStatus>,
    ) -> Result<Vec<Complaint>, DeskServiceError> {
        Ok(self.complaints.list(status)?)
    }

    /// Post an announcement to the notice board.
    pub fn post_notice(&self, form: NoticeForm) -> Result<Notice, DeskServiceError> {
        require(&form.title, "title")?;
        require(&form.body, "body")?;

        let notice = Notice {
            notice_id: NOTICE_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            title: form.title.trim().to_string(),
            body: form.body.trim().to_string(),
            audience: form.audience,
            posted_on: Local::now().date_naive(),
        };

        let stored = self.notices.insert(notice)?;
        tracing::info!(
            notice_id = stored.notice_id,
            audience = stored.audience.label(),
            "notice posted"
        );
        Ok(stored)
    }

    pub fn list_notices(
        &self,
        audience: Option<NoticeAudience>,
    ) -> Result<Vec<Notice>, DeskServiceError> {
        Ok(self.notices.list(audience)?)
    }
}

fn require(value: &str, field: &'static str) -> Result<(), DeskViolation> {
    if value.trim().is_empty() {
        return Err(DeskViolation::MissingField { field });
    }
    Ok(())
}

/// Error raised by the desk service.
#[derive(Debug, thiserror::Error)]
pub enum DeskServiceError {
    #[error(transparent)]
    Validation(#[from] DeskViolation),
    #[error("complaint {0} not found")]
    NotFound(ComplaintId),
    #[error("complaint {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ComplaintId,
        from: ComplaintStatus,
        to: ComplaintStatus,
    },
    #[error(transparent)]
    Repository(#[from] DeskRepositoryError),
}
