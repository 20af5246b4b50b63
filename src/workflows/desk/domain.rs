use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::residency::StudentId;

/// Identifier wrapper for filed complaints (`CMP-<year>-<seq>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplaintId(pub String);

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    Maintenance,
    Mess,
    Discipline,
    Security,
    Other,
}

impl ComplaintCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ComplaintCategory::Maintenance => "maintenance",
            ComplaintCategory::Mess => "mess",
            ComplaintCategory::Discipline => "discipline",
            ComplaintCategory::Security => "security",
            ComplaintCategory::Other => "other",
        }
    }
}

/// Ticket states for a complaint. Tickets never reopen once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ComplaintStatus::Open => "open",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
        }
    }

    /// Allowed moves: open -> in_progress, open -> resolved,
    /// in_progress -> resolved.
    pub const fn permits(self, next: ComplaintStatus) -> bool {
        matches!(
            (self, next),
            (ComplaintStatus::Open, ComplaintStatus::InProgress)
                | (ComplaintStatus::Open, ComplaintStatus::Resolved)
                | (ComplaintStatus::InProgress, ComplaintStatus::Resolved)
        )
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "open" => Some(ComplaintStatus::Open),
            "in_progress" => Some(ComplaintStatus::InProgress),
            "resolved" => Some(ComplaintStatus::Resolved),
            _ => None,
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A resident-filed issue tracked until staff resolve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub complaint_id: ComplaintId,
    pub student_id: StudentId,
    pub category: ComplaintCategory,
    pub subject: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub opened_on: NaiveDate,
    pub resolved_on: Option<NaiveDate>,
}

/// Audience selector for posted notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeAudience {
    All,
    Residents,
    Applicants,
}

impl NoticeAudience {
    pub const fn label(self) -> &'static str {
        match self {
            NoticeAudience::All => "all",
            NoticeAudience::Residents => "residents",
            NoticeAudience::Applicants => "applicants",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "all" => Some(NoticeAudience::All),
            "residents" => Some(NoticeAudience::Residents),
            "applicants" => Some(NoticeAudience::Applicants),
            _ => None,
        }
    }

    /// Whether a notice aimed at `self` reaches a reader asking for `wanted`.
    pub const fn reaches(self, wanted: NoticeAudience) -> bool {
        matches!(self, NoticeAudience::All) || (self as u8) == (wanted as u8)
    }
}

/// Staff-posted announcement on the hostel notice board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub notice_id: u64,
    pub title: String,
    pub body: String,
    pub audience: NoticeAudience,
    pub posted_on: NaiveDate,
}
