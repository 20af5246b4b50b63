//! Hostel desk: application intake, CGPA-ranked review, race-safe room
//! allotment, complaints, and the notice board behind one axum service.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
