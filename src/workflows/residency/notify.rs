use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::ApplicationId;

/// Trait describing outbound notification hooks (warden e-mail, SMS adapters).
pub trait AllotmentNotifier: Send + Sync {
    fn publish(&self, notice: AllotmentNotice) -> Result<(), NotifyError>;
}

/// Payload handed to notifier implementations when a bed is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllotmentNotice {
    pub template: String,
    pub application_id: ApplicationId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Default notifier: records the confirmation on the service log. Real
/// deployments swap in a mail or SMS adapter behind the same trait.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl AllotmentNotifier for LogNotifier {
    fn publish(&self, notice: AllotmentNotice) -> Result<(), NotifyError> {
        tracing::info!(
            template = %notice.template,
            application_id = %notice.application_id,
            "allotment notification dispatched"
        );
        Ok(())
    }
}
