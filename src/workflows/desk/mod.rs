//! Hostel desk workflow: resident complaints and the staff notice board.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;


pub use domain::{
    Complaint, ComplaintCategory, ComplaintId, ComplaintStatus, Notice, NoticeAudience,
};
pub use repository::{ComplaintStore, ComplaintView, DeskRepositoryError, NoticeStore};
pub use router::desk_router;
pub use service::{ComplaintForm, DeskService, DeskServiceError, DeskViolation, NoticeForm};
pub use store::MemoryDeskStore;
