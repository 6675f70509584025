use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::model::CenterId;
use crate::tensor::SampleMatrix;

/// Per-center aggregates over all Monte Carlo samples.
#[derive(Debug, Clone, Serialize)]
pub struct CenterSummary {
    pub center_id: CenterId,
    /// Mean discounted quality-adjusted life years.
    pub mean_qalys: f64,
    /// Mean discounted lifetime cost.
    pub mean_costs: f64,
    /// Samples in which this center maximized net monetary benefit.
    pub times_chosen: usize,
}

/// Outcome of a simulation run: the cost-effectiveness ranking of every
/// reachable center at the configured willingness-to-pay threshold.
#[derive(Debug, Clone, Serialize)]
pub struct Results {
    /// Willingness to pay per QALY used in the net monetary benefit.
    pub threshold_icer: f64,
    pub n_samples: usize,
    /// Center chosen most often across samples.
    pub optimal_destination: Option<CenterId>,
    /// One summary per reachable center, in input order.
    pub centers: Vec<CenterSummary>,
}

impl Results {
    /// Rank centers by per-sample net monetary benefit.
    ///
    /// For each sample the winning center is the one maximizing
    /// `threshold_icer * qalys - costs`. A NaN benefit never wins. Ties go to
    /// the earliest center in input order, which keeps reruns deterministic.
    #[must_use]
    pub fn new(
        center_ids: &[CenterId],
        qalys: &SampleMatrix,
        costs: &SampleMatrix,
        threshold_icer: f64,
    ) -> Self {
        debug_assert_eq!(center_ids.len(), qalys.n_centers());
        debug_assert_eq!(qalys.n_centers(), costs.n_centers());
        debug_assert_eq!(qalys.n_samples(), costs.n_samples());

        let n_samples = qalys.n_samples();
        let mut times_chosen = vec![0usize; center_ids.len()];

        for sample in 0..n_samples {
            let mut best: Option<(usize, f64)> = None;
            for center in 0..center_ids.len() {
                let nmb = threshold_icer * qalys.get(sample, center) - costs.get(sample, center);
                if nmb.is_nan() {
                    continue;
                }
                match best {
                    Some((_, best_nmb)) if nmb <= best_nmb => {}
                    _ => best = Some((center, nmb)),
                }
            }
            if let Some((winner, _)) = best {
                times_chosen[winner] += 1;
            }
        }

        let centers: Vec<CenterSummary> = center_ids
            .iter()
            .enumerate()
            .map(|(i, &center_id)| CenterSummary {
                center_id,
                mean_qalys: qalys.column_mean(i),
                mean_costs: costs.column_mean(i),
                times_chosen: times_chosen[i],
            })
            .collect();

        let optimal_destination = centers
            .iter()
            .fold(None::<&CenterSummary>, |best, c| match best {
                Some(b) if c.times_chosen <= b.times_chosen => Some(b),
                _ => Some(c),
            })
            .map(|c| c.center_id);

        Self {
            threshold_icer,
            n_samples,
            optimal_destination,
            centers,
        }
    }

    /// How often each center won, keyed by id.
    #[must_use]
    pub fn counts_by_center(&self) -> FxHashMap<CenterId, usize> {
        self.centers
            .iter()
            .map(|c| (c.center_id, c.times_chosen))
            .collect()
    }

    /// Fraction of samples each center won. Every center has an entry, so
    /// two tables from runs over the same centers always share keys.
    #[must_use]
    pub fn choice_frequencies(&self) -> FxHashMap<CenterId, f64> {
        let n = self.n_samples as f64;
        self.centers
            .iter()
            .map(|c| (c.center_id, c.times_chosen as f64 / n))
            .collect()
    }
}
