use std::fmt;

use crate::model::CenterId;

/// Errors from severity score construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeverityError {
    /// RACE scores are valid on 0 through 9
    InvalidRace(f64),
    /// NIHSS scores are valid on 0 through 42
    InvalidNihss(f64),
}

impl fmt::Display for SeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityError::InvalidRace(score) => {
                write!(f, "RACE score {score} outside the 0-9 scale")
            }
            SeverityError::InvalidNihss(score) => {
                write!(f, "NIHSS score {score} outside the 0-42 scale")
            }
        }
    }
}

impl std::error::Error for SeverityError {}

/// Errors from model construction and runs
#[derive(Debug, Clone)]
pub enum ModelError {
    /// No center in the roster has a usable travel time
    NoReachableCenters,
    /// A run was requested with zero samples
    EmptySample,
    /// Door-to-treatment quantiles cannot parameterize a log-normal
    InvalidPerformanceQuantiles {
        center_id: CenterId,
        median: f64,
        q75: f64,
    },
    Severity(SeverityError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::NoReachableCenters => {
                write!(f, "no stroke center is reachable from the patient location")
            }
            ModelError::EmptySample => write!(f, "simulation requested with zero samples"),
            ModelError::InvalidPerformanceQuantiles {
                center_id,
                median,
                q75,
            } => {
                write!(
                    f,
                    "center {center_id:?} performance quantiles (median={median}, q75={q75}) are not usable: \
                     both must be positive with q75 >= median"
                )
            }
            ModelError::Severity(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Severity(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SeverityError> for ModelError {
    fn from(e: SeverityError) -> Self {
        ModelError::Severity(e)
    }
}
