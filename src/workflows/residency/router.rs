use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, ApplicationStatus, BedNumber, HostelBuilding};
use super::intake::ApplicationForm;
use super::notify::AllotmentNotifier;
use super::repository::{AllotmentStore, ApplicationStore, ApplicationView, AllotmentView};
use super::service::{ResidencyService, ResidencyServiceError};

/// Router builder exposing the intake, review, and allotment endpoints.
pub fn residency_router<R, L, N>(service: Arc<ResidencyService<R, L, N>>) -> Router
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/hostel/applications",
            post(submit_handler::<R, L, N>).get(list_handler::<R, L, N>),
        )
        .route(
            "/api/v1/hostel/applications/:application_id",
            get(status_handler::<R, L, N>),
        )
        .route(
            "/api/v1/hostel/applications/:application_id/approve",
            post(approve_handler::<R, L, N>),
        )
        .route(
            "/api/v1/hostel/applications/:application_id/reject",
            post(reject_handler::<R, L, N>),
        )
        .route("/api/v1/hostel/allotments", post(allot_handler::<R, L, N>))
        .route(
            "/api/v1/hostel/rooms/:building/:room_number/occupancy",
            get(occupancy_handler::<R, L, N>),
        )
        .with_state(service)
}

impl IntoResponse for ResidencyServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ResidencyServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ResidencyServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ResidencyServiceError::DuplicateApplication(_)
            | ResidencyServiceError::AlreadyAllotted { .. }
            | ResidencyServiceError::SeatTaken { .. }
            | ResidencyServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ResidencyServiceError::Repository(_) | ResidencyServiceError::Notify(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = axum::Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn submit_handler<R, L, N>(
    State(service): State<Arc<ResidencyService<R, L, N>>>,
    axum::Json(form): axum::Json<ApplicationForm>,
) -> Response
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    match service.submit(form) {
        Ok(application) => {
            let view = ApplicationView::from_application(&application);
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListApplicationsQuery {
    status: Option<String>,
}

pub(crate) async fn list_handler<R, L, N>(
    State(service): State<Arc<ResidencyService<R, L, N>>>,
    Query(query): Query<ListApplicationsQuery>,
) -> Response
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    let status = match query.status.as_deref() {
        None => None,
        Some(code) => match ApplicationStatus::from_code(code) {
            Some(status) => Some(status),
            None => {
                let payload = json!({ "error": format!("unknown status '{code}'") });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };

    match service.list_applications(status) {
        Ok(applications) => {
            let views: Vec<ApplicationView> = applications
                .iter()
                .map(ApplicationView::from_application)
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn status_handler<R, L, N>(
    State(service): State<Arc<ResidencyService<R, L, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(application) => {
            let view = ApplicationView::from_application(&application);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn approve_handler<R, L, N>(
    State(service): State<Arc<ResidencyService<R, L, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.approve(&id) {
        Ok(application) => {
            let view = ApplicationView::from_application(&application);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn reject_handler<R, L, N>(
    State(service): State<Arc<ResidencyService<R, L, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    let id = ApplicationId(application_id);
    match service.reject(&id) {
        Ok(application) => {
            let view = ApplicationView::from_application(&application);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// Request body for confirming a bed.
#[derive(Debug, Deserialize)]
pub(crate) struct AllotmentRequest {
    pub application_id: String,
    pub building: HostelBuilding,
    pub room_number: String,
    pub bed_number: BedNumber,
}

pub(crate) async fn allot_handler<R, L, N>(
    State(service): State<Arc<ResidencyService<R, L, N>>>,
    axum::Json(request): axum::Json<AllotmentRequest>,
) -> Response
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    let id = ApplicationId(request.application_id);
    match service.allot_room(
        &id,
        request.building,
        &request.room_number,
        request.bed_number,
    ) {
        Ok(allotment) => {
            let view = AllotmentView::from_allotment(&allotment);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn occupancy_handler<R, L, N>(
    State(service): State<Arc<ResidencyService<R, L, N>>>,
    Path((building, room_number)): Path<(String, String)>,
) -> Response
where
    R: ApplicationStore + 'static,
    L: AllotmentStore + 'static,
    N: AllotmentNotifier + 'static,
{
    let Some(building) = HostelBuilding::from_code(&building) else {
        let payload = json!({ "error": format!("unknown building '{building}'") });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    match service.room_occupancy(building, &room_number) {
        Ok(occupancy) => (StatusCode::OK, axum::Json(occupancy)).into_response(),
        Err(error) => error.into_response(),
    }
}
