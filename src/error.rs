use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::desk::DeskServiceError;
use crate::workflows::residency::ResidencyServiceError;
use std::fmt;

/// Process-level failures surfaced by the CLI entrypoints.
///
/// Workflow errors carry their own HTTP mapping inside the routers; this enum
/// only exists so `main` can report startup and demo failures uniformly.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Residency(ResidencyServiceError),
    Desk(DeskServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
            AppError::Residency(err) => write!(f, "residency workflow error: {err}"),
            AppError::Desk(err) => write!(f, "desk workflow error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Residency(err) => Some(err),
            AppError::Desk(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ResidencyServiceError> for AppError {
    fn from(value: ResidencyServiceError) -> Self {
        Self::Residency(value)
    }
}

impl From<DeskServiceError> for AppError {
    fn from(value: DeskServiceError) -> Self {
        Self::Desk(value)
    }
}
