//! Unit tests for the severity models, timing sampler, outcome engine,
//! cohort contraction and the adaptive simulation loop.

use crate::model::{CenterId, Patient, Sex, StrokeCenter, TreatmentQuantiles};
use crate::severity::Severity;
use crate::simulation::RunSettings;

mod outcomes;
mod times;

pub(crate) fn patient_with_race(race: f64) -> Patient {
    let severity = Severity::from_race(race).unwrap();
    Patient::new(Sex::Male, 70, severity, 50.0)
}

pub(crate) fn patient_with_nihss(nihss: f64) -> Patient {
    let severity = Severity::from_nihss(nihss).unwrap();
    Patient::new(Sex::Male, 70, severity, 50.0)
}

/// Settings with every random input pinned, so timelines are exact.
pub(crate) fn deterministic_settings() -> RunSettings {
    RunSettings {
        add_time_uncertainty: false,
        add_lvo_uncertainty: false,
        fix_performance: true,
        cost_year: 2016,
    }
}

/// One comprehensive center 30 minutes out and one primary center 10 minutes
/// out that transfers to it.
pub(crate) fn two_center_roster() -> Vec<StrokeCenter> {
    vec![
        StrokeCenter::comprehensive(
            CenterId(1),
            "Metro Comprehensive",
            TreatmentQuantiles::new(45.0, 60.0),
            TreatmentQuantiles::new(90.0, 110.0),
        )
        .with_time(30.0),
        StrokeCenter::primary(CenterId(2), "County Primary", TreatmentQuantiles::new(30.0, 40.0))
            .with_transfer(CenterId(1), 25.0)
            .with_time(10.0),
    ]
}
