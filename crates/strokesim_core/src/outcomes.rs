//! Acute treatment outcomes per routing strategy.
//!
//! Each (sample, center) timeline is pushed through the treatment decision
//! tree: thrombolysis inside its window, thrombectomy inside its window for
//! large vessel occlusions, and the corresponding good-outcome probability
//! and acute cost. LVO and non-LVO courses are mixed by the per-sample LVO
//! probability, then expanded into full mRS distributions.

use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::constants::{TIME_LIMIT_EVT, TIME_LIMIT_TPA};
use crate::costs::CostTable;
use crate::model::Patient;
use crate::tensor::{OutcomeTensor, SampleMatrix};
use crate::times::TimingSamples;

/// Outcome distributions and acute costs for every (sample, center) pair.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyOutcomes {
    /// mRS distribution at 90 days, per (sample, center).
    pub states: OutcomeTensor,
    /// Acute treatment cost, per (sample, center).
    pub acute_costs: SampleMatrix,
}

impl StrategyOutcomes {
    /// Evaluate the treatment decision tree over all sampled timelines.
    ///
    /// A NaN timeline entry fails its window check, so a center that offers
    /// no thrombectomy route simply never reaches the endovascular branches.
    #[must_use]
    pub fn run_all_strategies(
        patient: &Patient,
        times: &TimingSamples,
        costs: &CostTable,
    ) -> Self {
        let severity = patient.severity;
        let n_samples = times.onset_to_needle.n_samples();
        let n_centers = times.onset_to_needle.n_centers();

        let compute_cell = |sample: usize, center: usize| -> (f64, f64) {
            let needle = times.onset_to_needle.get(sample, center);
            let puncture = times.onset_to_puncture.get(sample, center);
            let tpa_ok = needle < TIME_LIMIT_TPA;
            let evt_ok = puncture < TIME_LIMIT_EVT;

            let p_evt = severity.p_reperfusion_endovascular();
            let (p_good_lvo, cost_lvo) = match (tpa_ok, evt_ok) {
                (true, true) => {
                    // Thrombolysis can open the vessel while the patient
                    // waits for the angio suite.
                    let p_early = severity
                        .p_early_reperfusion_thrombolysis((puncture - needle).max(0.0));
                    let p_reperfused = p_early + (1.0 - p_early) * p_evt;
                    let p_good = p_reperfused
                        * severity.p_good_outcome_post_evt_success(puncture)
                        + (1.0 - p_reperfused) * severity.p_good_outcome_no_reperfusion();
                    (
                        p_good,
                        costs.admission + costs.thrombolysis + costs.thrombectomy,
                    )
                }
                (true, false) => {
                    // Thrombolysis alone. Lysis happens within about an hour
                    // of the infusion when it happens at all.
                    let p_early = severity.p_early_reperfusion_thrombolysis(70.0);
                    let p_good = p_early
                        * severity.p_good_outcome_post_evt_success(needle + 70.0)
                        + (1.0 - p_early) * severity.p_good_outcome_no_reperfusion();
                    (p_good, costs.admission + costs.thrombolysis)
                }
                (false, true) => {
                    let p_good = p_evt * severity.p_good_outcome_post_evt_success(puncture)
                        + (1.0 - p_evt) * severity.p_good_outcome_no_reperfusion();
                    (p_good, costs.admission + costs.thrombectomy)
                }
                (false, false) => (severity.p_good_outcome_no_reperfusion(), costs.admission),
            };

            let p_good_no_lvo = severity.p_good_outcome_ais_no_lvo(needle);
            let cost_no_lvo = if tpa_ok {
                costs.admission + costs.thrombolysis
            } else {
                costs.admission
            };

            let p_lvo = times.p_lvo[sample];
            let p_good = (p_lvo * p_good_lvo + (1.0 - p_lvo) * p_good_no_lvo).clamp(0.0, 1.0);
            let cost = p_lvo * cost_lvo + (1.0 - p_lvo) * cost_no_lvo;
            (p_good, cost)
        };

        #[cfg(feature = "parallel")]
        let cells: Vec<(f64, f64)> = (0..n_samples * n_centers)
            .into_par_iter()
            .map(|k| compute_cell(k / n_centers, k % n_centers))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let cells: Vec<(f64, f64)> = (0..n_samples * n_centers)
            .map(|k| compute_cell(k / n_centers, k % n_centers))
            .collect();

        let mut p_good = SampleMatrix::new(n_samples, n_centers);
        let mut acute_costs = SampleMatrix::new(n_samples, n_centers);
        for (k, (good, cost)) in cells.into_iter().enumerate() {
            p_good.set(k / n_centers, k % n_centers, good);
            acute_costs.set(k / n_centers, k % n_centers, cost);
        }

        let states = severity.break_up_ais_patients(&p_good);
        Self {
            states,
            acute_costs,
        }
    }
}
