//! Acute ischemic stroke triage simulation library
//!
//! This crate provides a Monte Carlo engine for comparing prehospital
//! transport strategies for suspected stroke patients: direct transport to a
//! comprehensive stroke center versus thrombolysis at the nearest primary
//! center followed by transfer (drip-and-ship). It supports:
//! - RACE and NIHSS severity scales with validated conversion
//! - Severity-conditioned treatment outcome probabilities from published
//!   regressions
//! - Stochastic door-to-treatment and travel timing per center
//! - A lifetime Markov cohort model producing QALYs and costs per strategy
//! - Net-monetary-benefit destination choice with adaptive sample growth
//!   until the choice distribution stabilizes
//!
//! # Example
//!
//! ```ignore
//! use strokesim_core::{Patient, RunSettings, Severity, Sex, StrokeModel};
//!
//! let severity = Severity::from_race(7.0)?;
//! let patient = Patient::new(Sex::Male, 70, severity, 50.0);
//! let model = StrokeModel::new(patient, centers);
//! let run = model.run_adaptive(42, &RunSettings::default())?;
//! println!("best destination: {:?}", run.results.optimal_destination);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod cohort;
pub mod constants;
pub mod costs;
pub mod error;
pub mod outcomes;
pub mod severity;
pub mod simulation;
pub mod tensor;
pub mod times;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ModelError, SeverityError};
pub use model::{
    CenterId, CenterType, CenterSummary, Patient, Results, Sex, StrokeCenter, TreatmentQuantiles,
};
pub use severity::{Severity, SeverityScale};
pub use simulation::{ModelRun, RunSettings, StrokeModel, check_convergence};
