//! Entities the simulation acts on: the patient, the stroke centers they can
//! be routed to, and the aggregated results of a run.

mod hospital;
mod patient;
mod results;

pub use hospital::{CenterId, CenterType, StrokeCenter, TreatmentQuantiles};
pub use patient::{Patient, Sex};
pub use results::{CenterSummary, Results};
