use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted hostel applications (`HOSTEL-<year>-<seq>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Institute roll number of the applicant. At most one application may exist per student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Admission category recorded on the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionCategory {
    General,
    Obc,
    Sc,
    St,
    Ews,
}

impl AdmissionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            AdmissionCategory::General => "general",
            AdmissionCategory::Obc => "obc",
            AdmissionCategory::Sc => "sc",
            AdmissionCategory::St => "st",
            AdmissionCategory::Ews => "ews",
        }
    }
}

/// Review state tracked on every application.
///
/// `Pending` is the only initial state; `Approved` and `Rejected` are terminal.
/// Every status write in the crate goes through [`ApplicationStatus::permits`],
/// whether it originates from the review endpoints or from room allotment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// The authoritative transition table: pending may move to either terminal
    /// state, terminal states never move again.
    pub const fn permits(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (ApplicationStatus::Pending, ApplicationStatus::Approved)
                | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
        )
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hostel buildings available for allotment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostelBuilding {
    BlockA,
    BlockB,
    BlockC,
    BlockD,
}

impl HostelBuilding {
    /// Short code used in URLs and queries.
    pub const fn code(self) -> &'static str {
        match self {
            HostelBuilding::BlockA => "block_a",
            HostelBuilding::BlockB => "block_b",
            HostelBuilding::BlockC => "block_c",
            HostelBuilding::BlockD => "block_d",
        }
    }

    /// Human label used in rendered reports.
    pub const fn label(self) -> &'static str {
        match self {
            HostelBuilding::BlockA => "A Block",
            HostelBuilding::BlockB => "B Block",
            HostelBuilding::BlockC => "C Block",
            HostelBuilding::BlockD => "D Block",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "block_a" | "a" => Some(HostelBuilding::BlockA),
            "block_b" | "b" => Some(HostelBuilding::BlockB),
            "block_c" | "c" => Some(HostelBuilding::BlockC),
            "block_d" | "d" => Some(HostelBuilding::BlockD),
            _ => None,
        }
    }
}

impl fmt::Display for HostelBuilding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bed slot within a room. Rooms hold exactly two beds, so room capacity is
/// enforced by construction: a third occupant would need a third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BedNumber {
    One,
    Two,
}

impl BedNumber {
    pub const ALL: [BedNumber; 2] = [BedNumber::One, BedNumber::Two];

    pub const fn index(self) -> u8 {
        match self {
            BedNumber::One => 1,
            BedNumber::Two => 2,
        }
    }
}

impl TryFrom<u8> for BedNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BedNumber::One),
            2 => Ok(BedNumber::Two),
            other => Err(format!("bed number must be 1 or 2, got {other}")),
        }
    }
}

impl From<BedNumber> for u8 {
    fn from(value: BedNumber) -> Self {
        value.index()
    }
}

impl fmt::Display for BedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Contact details carried on the application. Not invariant-bearing, but
/// shape-checked at intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub guardian_phone: String,
}

/// One student's request for a hostel bed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub application_id: ApplicationId,
    pub student_id: StudentId,
    pub profile: StudentProfile,
    pub cgpa: f32,
    pub category: AdmissionCategory,
    pub status: ApplicationStatus,
    pub submitted_on: NaiveDate,
}

/// Lifecycle of a confirmed bed assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllotmentStatus {
    Active,
    Cancelled,
}

impl AllotmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AllotmentStatus::Active => "active",
            AllotmentStatus::Cancelled => "cancelled",
        }
    }
}

/// A confirmed bed assignment fulfilling an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allotment {
    pub application_id: ApplicationId,
    pub student_id: StudentId,
    pub building: HostelBuilding,
    pub room_number: String,
    pub bed_number: BedNumber,
    pub floor: u8,
    pub allotted_on: NaiveDate,
    pub status: AllotmentStatus,
}

/// Floor encoded as the leading digit of the room number ("101" sits on floor
/// 1, "204" on floor 2). Rooms without a leading digit are ground floor.
pub fn floor_of(room_number: &str) -> u8 {
    room_number
        .trim()
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
        .unwrap_or(0)
}
