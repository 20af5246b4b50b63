use serde::Serialize;

use super::domain::{Complaint, ComplaintId, ComplaintStatus, Notice, NoticeAudience};

/// Error enumeration for desk storage failures.
#[derive(Debug, thiserror::Error)]
pub enum DeskRepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("ticket status changed concurrently (now {actual})")]
    StateConflict { actual: ComplaintStatus },
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the complaints collection.
pub trait ComplaintStore: Send + Sync {
    fn insert(&self, complaint: Complaint) -> Result<Complaint, DeskRepositoryError>;

    fn fetch(&self, id: &ComplaintId) -> Result<Option<Complaint>, DeskRepositoryError>;

    /// Compare-and-set ticket update; `resolved_on` is written together with
    /// the status so the pair stays consistent.
    fn set_status(
        &self,
        id: &ComplaintId,
        expect: ComplaintStatus,
        to: ComplaintStatus,
        resolved_on: Option<chrono::NaiveDate>,
    ) -> Result<Complaint, DeskRepositoryError>;

    /// Complaints newest first, optionally filtered by status.
    fn list(
        &self,
        status: Option<ComplaintStatus>,
    ) -> Result<Vec<Complaint>, DeskRepositoryError>;
}

/// Storage abstraction over the notice board.
pub trait NoticeStore: Send + Sync {
    fn insert(&self, notice: Notice) -> Result<Notice, DeskRepositoryError>;

    /// Notices newest first. An audience filter also returns `all`-audience
    /// notices.
    fn list(
        &self,
        audience: Option<NoticeAudience>,
    ) -> Result<Vec<Notice>, DeskRepositoryError>;
}

/// Wire representation of a complaint ticket.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintView {
    pub complaint_id: ComplaintId,
    pub student_id: String,
    pub category: &'static str,
    pub subject: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_on: Option<chrono::NaiveDate>,
}

impl ComplaintView {
    pub fn from_complaint(complaint: &Complaint) -> Self {
        Self {
            complaint_id: complaint.complaint_id.clone(),
            student_id: complaint.student_id.0.clone(),
            category: complaint.category.label(),
            subject: complaint.subject.clone(),
            status: complaint.status.label(),
            resolved_on: complaint.resolved_on,
        }
    }
}
