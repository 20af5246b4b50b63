use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AdmissionCategory, Application, ApplicationId, ApplicationStatus, StudentId, StudentProfile,
};

/// Validation errors raised by the intake guard.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("required field '{field}' is missing or empty")]
    MissingField { field: &'static str },
    #[error("'{0}' is not a usable email address")]
    InvalidEmail(String),
    #[error("'{0}' is not a usable phone number (need at least 10 digits)")]
    InvalidPhone(String),
    #[error("cgpa {0} is outside the 0-10 scale")]
    CgpaOutOfRange(f32),
}

/// Raw submission payload as received from the application form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub student_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub guardian_phone: String,
    pub cgpa: f32,
    pub category: AdmissionCategory,
}

/// Guard responsible for turning a raw form into a well-formed [`Application`].
///
/// The returned application carries a placeholder id; the service assigns the
/// real `HOSTEL-<year>-<seq>` identifier before persisting.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn application_from_form(
        &self,
        form: ApplicationForm,
        submitted_on: NaiveDate,
    ) -> Result<Application, IntakeViolation> {
        require(&form.student_id, "student_id")?;
        require(&form.full_name, "full_name")?;
        require(&form.email, "email")?;
        require(&form.phone, "phone")?;
        require(&form.guardian_phone, "guardian_phone")?;

        let email = form.email.trim().to_string();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(IntakeViolation::InvalidEmail(email));
        }

        let phone = normalized_phone(&form.phone)
            .ok_or_else(|| IntakeViolation::InvalidPhone(form.phone.clone()))?;
        let guardian_phone = normalized_phone(&form.guardian_phone)
            .ok_or_else(|| IntakeViolation::InvalidPhone(form.guardian_phone.clone()))?;

        if !form.cgpa.is_finite() || !(0.0..=10.0).contains(&form.cgpa) {
            return Err(IntakeViolation::CgpaOutOfRange(form.cgpa));
        }

        Ok(Application {
            application_id: ApplicationId("pending".to_string()),
            student_id: StudentId(form.student_id.trim().to_string()),
            profile: StudentProfile {
                full_name: form.full_name.trim().to_string(),
                email,
                phone,
                guardian_phone,
            },
            cgpa: form.cgpa,
            category: form.category,
            status: ApplicationStatus::Pending,
            submitted_on,
        })
    }
}

fn require(value: &str, field: &'static str) -> Result<(), IntakeViolation> {
    if value.trim().is_empty() {
        return Err(IntakeViolation::MissingField { field });
    }
    Ok(())
}

fn normalized_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 {
        return None;
    }
    Some(digits)
}
