//! Simulation driver and adaptive sampling loop.
//!
//! A [`StrokeModel`] pairs one patient with a hospital roster and runs the
//! full pipeline: timeline sampling, treatment outcomes, lifetime cohort
//! contraction and cost-effectiveness ranking. [`StrokeModel::run`] does one
//! pass at a fixed sample count; [`StrokeModel::run_adaptive`] repeats with
//! growing counts until the destination-choice frequencies stop moving.

use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cohort::CohortModel;
use crate::costs::CostTable;
use crate::error::ModelError;
use crate::model::{CenterId, CenterType, Patient, Results, StrokeCenter};
use crate::outcomes::StrategyOutcomes;
use crate::times::TimingSamples;

/// Largest per-center frequency shift two consecutive runs may show and
/// still count as converged.
pub const CONVERGENCE_THRESHOLD: f64 = 0.01;

/// Sample count of the first adaptive iteration.
pub const INITIAL_N_SIM: usize = 5000;

/// Adaptive iterations before giving up and returning the latest run.
pub const MAX_ADAPTIVE_RUNS: usize = 20;

/// Willingness to pay per QALY unless the caller overrides it.
pub const DEFAULT_THRESHOLD_ICER: f64 = 1_000_000.0;

/// Switches controlling which uncertainty sources a run samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Jitter travel and transfer times by a uniform factor.
    pub add_time_uncertainty: bool,
    /// Draw the LVO probability between its regression bounds instead of
    /// using the point estimate.
    pub add_lvo_uncertainty: bool,
    /// Hold in-hospital performance at the reported medians.
    pub fix_performance: bool,
    /// Dollar year all costs are expressed in.
    pub cost_year: u16,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            add_time_uncertainty: true,
            add_lvo_uncertainty: true,
            fix_performance: false,
            cost_year: 2016,
        }
    }
}

/// Everything one simulation pass produced, from ranking down to the raw
/// timeline draws.
#[derive(Debug, Clone)]
pub struct ModelRun {
    pub results: Results,
    pub cohort: CohortModel,
    pub times: TimingSamples,
}

/// One patient against a roster of candidate stroke centers.
#[derive(Debug, Clone)]
pub struct StrokeModel {
    pub patient: Patient,
    pub centers: Vec<StrokeCenter>,
    pub threshold_icer: f64,
}

impl StrokeModel {
    #[must_use]
    pub fn new(patient: Patient, centers: Vec<StrokeCenter>) -> Self {
        Self {
            patient,
            centers,
            threshold_icer: DEFAULT_THRESHOLD_ICER,
        }
    }

    #[must_use]
    pub fn with_threshold_icer(mut self, threshold_icer: f64) -> Self {
        self.threshold_icer = threshold_icer;
        self
    }

    /// Centers reachable from the current patient location.
    #[must_use]
    pub fn hospitals(&self) -> Vec<&StrokeCenter> {
        self.centers.iter().filter(|c| c.is_reachable()).collect()
    }

    /// Reachable thrombolysis-only centers.
    #[must_use]
    pub fn primaries(&self) -> Vec<&StrokeCenter> {
        self.centers
            .iter()
            .filter(|c| c.is_reachable() && c.center_type == CenterType::Primary)
            .collect()
    }

    /// Reachable thrombectomy-capable centers.
    #[must_use]
    pub fn comprehensives(&self) -> Vec<&StrokeCenter> {
        self.centers
            .iter()
            .filter(|c| c.is_reachable() && c.center_type == CenterType::Comprehensive)
            .collect()
    }

    /// Load travel times from a lookup keyed by center id.
    ///
    /// A center missing from the lookup, or whose value does not parse as a
    /// number, gets an unknown (NaN) time and drops out of [`hospitals`]
    /// instead of failing the whole roster.
    ///
    /// [`hospitals`]: StrokeModel::hospitals
    pub fn set_times(&mut self, lookup: &HashMap<String, String>) {
        for center in &mut self.centers {
            center.time = lookup
                .get(&center.center_id.0.to_string())
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .unwrap_or(f64::NAN);
        }
    }

    /// One simulation pass with `n_samples` simulated patients.
    pub fn run(
        &self,
        seed: u64,
        n_samples: usize,
        settings: &RunSettings,
    ) -> Result<ModelRun, ModelError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.run_with_rng(&mut rng, n_samples, settings)
    }

    /// One simulation pass drawing from the caller's RNG.
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n_samples: usize,
        settings: &RunSettings,
    ) -> Result<ModelRun, ModelError> {
        if n_samples == 0 {
            return Err(ModelError::EmptySample);
        }
        let hospitals = self.hospitals();
        if hospitals.is_empty() {
            return Err(ModelError::NoReachableCenters);
        }

        let costs = CostTable::inflated_to(settings.cost_year);
        let times = TimingSamples::draw(rng, &self.patient, &hospitals, n_samples, settings)?;
        let outcomes = StrategyOutcomes::run_all_strategies(&self.patient, &times, &costs);
        let cohort = CohortModel::new(&self.patient, &costs);
        let lifetime = cohort.analyze(&outcomes.states, &outcomes.acute_costs);

        let center_ids: Vec<CenterId> = hospitals.iter().map(|h| h.center_id).collect();
        let results = Results::new(
            &center_ids,
            &lifetime.qalys,
            &lifetime.costs,
            self.threshold_icer,
        );

        Ok(ModelRun {
            results,
            cohort,
            times,
        })
    }

    /// Re-run with growing sample counts until the destination-choice
    /// frequencies settle.
    ///
    /// The first pass can never converge since there is nothing to compare
    /// against. Hitting the iteration cap is not an error: the latest run is
    /// returned as the best available answer.
    pub fn run_adaptive(
        &self,
        seed: u64,
        settings: &RunSettings,
    ) -> Result<ModelRun, ModelError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut previous: Option<FxHashMap<CenterId, f64>> = None;
        let mut n_sim = INITIAL_N_SIM;
        let mut iteration = 0;

        loop {
            let run = self.run_with_rng(&mut rng, n_sim, settings)?;
            let frequencies = run.results.choice_frequencies();
            if check_convergence(previous.as_ref(), &frequencies) {
                debug!(n_sim, iteration, "destination frequencies converged");
                return Ok(run);
            }
            iteration += 1;
            if iteration >= MAX_ADAPTIVE_RUNS {
                warn!(n_sim, "sampling cap reached before convergence");
                return Ok(run);
            }
            debug!(n_sim, iteration, "destination mix still moving, enlarging the sample");
            previous = Some(frequencies);
            n_sim += 1000 * iteration;
        }
    }
}

/// Largest absolute per-center difference between two frequency tables.
///
/// Centers present in only one table are ignored, which cannot happen for
/// tables produced over the same roster.
#[must_use]
pub fn max_frequency_shift(
    previous: &FxHashMap<CenterId, f64>,
    current: &FxHashMap<CenterId, f64>,
) -> f64 {
    current
        .iter()
        .filter_map(|(id, freq)| previous.get(id).map(|prev| (freq - prev).abs()))
        .fold(0.0, f64::max)
}

/// Whether a run's frequencies agree with the previous run's to within
/// [`CONVERGENCE_THRESHOLD`]. With no previous run the answer is always no.
#[must_use]
pub fn check_convergence(
    previous: Option<&FxHashMap<CenterId, f64>>,
    current: &FxHashMap<CenterId, f64>,
) -> bool {
    previous.is_some_and(|prev| max_frequency_shift(prev, current) <= CONVERGENCE_THRESHOLD)
}
