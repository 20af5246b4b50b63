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

use super::domain::{ComplaintId, ComplaintStatus, NoticeAudience};
use super::repository::{ComplaintStore, ComplaintView, NoticeStore};
use super::service::{ComplaintForm, DeskService, DeskServiceError, NoticeForm};

/// Router builder exposing the complaint register and the notice board.
pub fn desk_router<C, B>(service: Arc<DeskService<C, B>>) -> Router
where
    C: ComplaintStore + 'static,
    B: NoticeStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/hostel/complaints",
            post(file_complaint_handler::<C, B>).get(list_complaints_handler::<C, B>),
        )
        .route(
            "/api/v1/hostel/complaints/:complaint_id/progress",
            post(progress_handler::<C, B>),
        )
        .route(
            "/api/v1/hostel/complaints/:complaint_id/resolve",
            post(resolve_handler::<C, B>),
        )
        .route(
            "/api/v1/hostel/notices",
            post(post_notice_handler::<C, B>).get(list_notices_handler::<C, B>),
        )
        .with_state(service)
}

impl IntoResponse for DeskServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            DeskServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DeskServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            DeskServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
            DeskServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = axum::Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn file_complaint_handler<C, B>(
    State(service): State<Arc<DeskService<C, B>>>,
    axum::Json(form): axum::Json<ComplaintForm>,
) -> Response
where
    C: ComplaintStore + 'static,
    B: NoticeStore + 'static,
{
    match service.file_complaint(form) {
        Ok(complaint) => {
            let view = ComplaintView::from_complaint(&complaint);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListComplaintsQuery {
    status: Option<String>,
}

pub(crate) async fn list_complaints_handler<C, B>(
    State(service): State<Arc<DeskService<C, B>>>,
    Query(query): Query<ListComplaintsQuery>,
) -> Response
where
    C: ComplaintStore + 'static,
    B: NoticeStore + 'static,
{
    let status = match query.status.as_deref() {
        None => None,
        Some(code) => match ComplaintStatus::from_code(code) {
            Some(status) => Some(status),
            None => {
                let payload = json!({ "error": format!("unknown status '{code}'") });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };

    match service.list_complaints(status) {
        Ok(complaints) => {
            let views: Vec<ComplaintView> =
                complaints.iter().map(ComplaintView::from_complaint).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn progress_handler<C, B>(
    State(service): State<Arc<DeskService<C, B>>>,
    Path(complaint_id): Path<String>,
) -> Response
where
    C: ComplaintStore + 'static,
    B: NoticeStore + 'static,
{
    let id = ComplaintId(complaint_id);
    match service.progress_complaint(&id) {
        Ok(complaint) => {
            let view = ComplaintView::from_complaint(&complaint);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn resolve_handler<C, B>(
    State(service): State<Arc<DeskService<C, B>>>,
    Path(complaint_id): Path<String>,
) -> Response
where
    C: ComplaintStore + 'static,
    B: NoticeStore + 'static,
{
    let id = ComplaintId(complaint_id);
    match service.resolve_complaint(&id) {
        Ok(complaint) => {
            let view = ComplaintView::from_complaint(&complaint);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn post_notice_handler<C, B>(
    State(service): State<Arc<DeskService<C, B>>>,
    axum::Json(form): axum::Json<NoticeForm>,
) -> Response
where
    C: ComplaintStore + 'static,
    B: NoticeStore + 'static,
{
    match service.post_notice(form) {
        Ok(notice) => (StatusCode::CREATED, axum::Json(notice)).into_response(),
        Err(error) => error.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListNoticesQuery {
    audience: Option<String>,
}

pub(crate) async fn list_notices_handler<C, B>(
    State(service): State<Arc<DeskService<C, B>>>,
    Query(query): Query<ListNoticesQuery>,
) -> Response
where
    C: ComplaintStore + 'static,
    B: NoticeStore + 'static,
{
    let audience = match query.audience.as_deref() {
        None => None,
        Some(code) => match NoticeAudience::from_code(code) {
            Some(audience) => Some(audience),
            None => {
                let payload = json!({ "error": format!("unknown audience '{code}'") });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };

    match service.list_notices(audience) {
        Ok(notices) => (StatusCode::OK, axum::Json(notices)).into_response(),
        Err(error) => error.into_response(),
    }
}
