//! Lifetime consequences of the 90-day outcome state.
//!
//! A patient who survives the acute phase in a given mRS grade stays in that
//! grade for life; each subsequent year they face an age- and sex-specific
//! background mortality scaled by a grade-specific hazard ratio, and accrue
//! a utility weight and an annual care cost while alive. Both streams are
//! discounted to the decision point. The per-grade lifetime totals depend
//! only on the patient and the cost table, so they are computed once and
//! contracted against every (sample, center) outcome distribution.

use serde::Serialize;

use crate::constants::NUM_STATES;
use crate::costs::CostTable;
use crate::model::{Patient, Sex};
use crate::tensor::{OutcomeTensor, SampleMatrix};

/// Utility weight per mRS grade, death last.
// Source: Chaisinanunkul et al., Stroke 2015
const UTILITY_BY_MRS: [f64; NUM_STATES] = [1.0, 0.91, 0.76, 0.65, 0.33, 0.0, 0.0];

/// Long-term mortality hazard ratio vs. the general population, mRS 0-5.
// Source: Hong and Saver, Stroke 2010; Slot et al., BMJ 2008
const HAZARD_RATIO_BY_MRS: [f64; 6] = [1.53, 1.52, 2.17, 3.18, 4.55, 6.55];

const DISCOUNT_RATE: f64 = 0.03;
const MAX_AGE: u8 = 100;

/// Annual probability of death in the general population, Gompertz fit.
// Source: Arias and Xu, United States Life Tables, NVSR
fn annual_death_hazard(sex: Sex, age: u8) -> f64 {
    let (a, b) = match sex {
        Sex::Male => (4.5e-5, 0.085),
        Sex::Female => (2.2e-5, 0.09),
    };
    a * (b * f64::from(age)).exp()
}

/// Discounted lifetime QALYs and costs conditional on each 90-day state.
#[derive(Debug, Clone, Serialize)]
pub struct CohortModel {
    pub qalys_by_state: [f64; NUM_STATES],
    pub costs_by_state: [f64; NUM_STATES],
}

/// Per-(sample, center) lifetime totals, acute phase included.
#[derive(Debug, Clone, Serialize)]
pub struct CohortOutcomes {
    pub qalys: SampleMatrix,
    pub costs: SampleMatrix,
}

impl CohortModel {
    /// Run the annual survival cycle for every surviving mRS grade.
    ///
    /// Death within 90 days (mRS 6) contributes no QALYs and only the
    /// terminal care cost. Later deaths add the same terminal cost in the
    /// year they occur, discounted like everything else.
    #[must_use]
    pub fn new(patient: &Patient, costs: &CostTable) -> Self {
        let mut qalys_by_state = [0.0; NUM_STATES];
        let mut costs_by_state = [0.0; NUM_STATES];

        for (state, &hazard_ratio) in HAZARD_RATIO_BY_MRS.iter().enumerate() {
            let mut alive = 1.0;
            let mut qalys = 0.0;
            let mut lifetime_costs = 0.0;
            for (cycle, age) in (patient.age..MAX_AGE).enumerate() {
                let p_death = (annual_death_hazard(patient.sex, age) * hazard_ratio).min(1.0);
                let discount = (1.0 + DISCOUNT_RATE).powi(cycle as i32).recip();
                let died = alive * p_death;
                alive -= died;
                qalys += alive * UTILITY_BY_MRS[state] * discount;
                lifetime_costs += (alive * costs.annual_by_mrs[state] + died * costs.death)
                    * discount;
            }
            qalys_by_state[state] = qalys;
            costs_by_state[state] = lifetime_costs;
        }

        costs_by_state[NUM_STATES - 1] = costs.death;

        Self {
            qalys_by_state,
            costs_by_state,
        }
    }

    /// Contract outcome distributions into expected lifetime QALYs and
    /// costs, adding the acute treatment cost of each cell.
    #[must_use]
    pub fn analyze(
        &self,
        states: &OutcomeTensor,
        acute_costs: &SampleMatrix,
    ) -> CohortOutcomes {
        let n_samples = states.n_samples();
        let n_centers = states.n_centers();
        let mut qalys = SampleMatrix::new(n_samples, n_centers);
        let mut costs = SampleMatrix::new(n_samples, n_centers);

        for sample in 0..n_samples {
            for center in 0..n_centers {
                let cell = states.cell(sample, center);
                let mut q = 0.0;
                let mut c = acute_costs.get(sample, center);
                for state in 0..NUM_STATES {
                    q += cell[state] * self.qalys_by_state[state];
                    c += cell[state] * self.costs_by_state[state];
                }
                qalys.set(sample, center, q);
                costs.set(sample, center, c);
            }
        }

        CohortOutcomes { qalys, costs }
    }
}
