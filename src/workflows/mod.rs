pub mod desk;
pub mod residency;
