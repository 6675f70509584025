//! Shared clinical constants.

use serde::{Deserialize, Serialize};

/// Number of modified Rankin Scale states tracked by the outcome tensor.
pub const NUM_STATES: usize = 7;

/// Modified Rankin Scale disability grade. Grade 0 is symptom free, grade 6
/// is death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankinGrade {
    Mrs0,
    Mrs1,
    Mrs2,
    Mrs3,
    Mrs4,
    Mrs5,
    Mrs6,
}

impl RankinGrade {
    /// All grades in tensor axis order.
    pub const ALL: [RankinGrade; NUM_STATES] = [
        RankinGrade::Mrs0,
        RankinGrade::Mrs1,
        RankinGrade::Mrs2,
        RankinGrade::Mrs3,
        RankinGrade::Mrs4,
        RankinGrade::Mrs5,
        RankinGrade::Mrs6,
    ];

    /// Position of this grade along the state axis of the outcome tensor.
    #[must_use]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this grade counts as a good outcome (mRS 0-2).
    #[must_use]
    pub fn is_good_outcome(self) -> bool {
        matches!(self, RankinGrade::Mrs0 | RankinGrade::Mrs1 | RankinGrade::Mrs2)
    }
}

// Thrombolysis window in minutes from symptom onset.
// Source: Hacke et al., NEJM 2008 (ECASS III, 4.5 h)
pub const TIME_LIMIT_TPA: f64 = 270.0;

// Thrombectomy window in minutes from symptom onset.
// Source: Powers et al., Stroke 2019 (AHA/ASA guideline, 6 h)
pub const TIME_LIMIT_EVT: f64 = 360.0;

// Door-to-puncture in minutes at the receiving comprehensive center after an
// interhospital transfer. Imaging and workup are complete on arrival.
pub const DOOR_TO_PUNCTURE_TRANSFER: f64 = 30.0;
