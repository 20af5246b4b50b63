use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::residency::domain::{
    Allotment, Application, ApplicationId, ApplicationStatus, BedNumber, HostelBuilding,
};
use crate::workflows::residency::intake::ApplicationForm;
use crate::workflows::residency::notify::{AllotmentNotice, AllotmentNotifier, NotifyError};
use crate::workflows::residency::repository::{
    AllotmentStore, ApplicationStore, RepositoryError,
};
use crate::workflows::residency::router::residency_router;
use crate::workflows::residency::service::ResidencyService;
use crate::workflows::residency::store::MemoryHostelStore;
use crate::workflows::residency::AdmissionCategory;

pub(super) fn application_form(student_id: &str, cgpa: f32) -> ApplicationForm {
    ApplicationForm {
        student_id: student_id.to_string(),
        full_name: "Asha Verma".to_string(),
        email: format!("{student_id}@college.example"),
        phone: "+91 98765 43210".to_string(),
        guardian_phone: "9123456780".to_string(),
        cgpa,
        category: AdmissionCategory::General,
    }
}

pub(super) type MemoryResidencyService =
    ResidencyService<MemoryHostelStore, MemoryHostelStore, MemoryNotifier>;

pub(super) fn build_service() -> (
    MemoryResidencyService,
    Arc<MemoryHostelStore>,
    Arc<MemoryNotifier>,
) {
    let store = Arc::new(MemoryHostelStore::new());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ResidencyService::new(store.clone(), store.clone(), notifier.clone());
    (service, store, notifier)
}

pub(super) fn residency_router_with_service(service: MemoryResidencyService) -> axum::Router {
    residency_router(Arc::new(service))
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<AllotmentNotice>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<AllotmentNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl AllotmentNotifier for MemoryNotifier {
    fn publish(&self, notice: AllotmentNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

/// Store double that reports every operation as unavailable.
pub(super) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_status(
        &self,
        _id: &ApplicationId,
        _expect: ApplicationStatus,
        _to: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(
        &self,
        _status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl AllotmentStore for UnavailableStore {
    fn insert_active(&self, _allotment: Allotment) -> Result<Allotment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn cancel(&self, _application_id: &ApplicationId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_for_application(
        &self,
        _application_id: &ApplicationId,
    ) -> Result<Option<Allotment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn occupied_beds(
        &self,
        _building: HostelBuilding,
        _room_number: &str,
    ) -> Result<Vec<BedNumber>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store double that simulates an explicit approval sneaking in between the
/// allotment insert and the paired status flip: the advisory fetch still
/// reports `pending`, but the compare-and-set loses.
pub(super) struct RacedApprovalStore {
    pub(super) inner: Arc<MemoryHostelStore>,
}

impl ApplicationStore for RacedApprovalStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn set_status(
        &self,
        _id: &ApplicationId,
        _expect: ApplicationStatus,
        _to: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::StateConflict {
            actual: ApplicationStatus::Approved,
        })
    }

    fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list(status)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
