//! Monte Carlo sampling of treatment timelines.
//!
//! For every (sample, center) pair this draws the full prehospital and
//! in-hospital timeline: onset to needle (thrombolysis) and onset to groin
//! puncture (thrombectomy). Hospital performance intervals are log-normal,
//! fitted to each center's reported median and 75th percentile. Travel
//! times optionally jitter by a uniform factor. All draws come from the
//! caller's RNG in a fixed order, so a seed fully determines the samples.

use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use serde::Serialize;

use crate::constants::DOOR_TO_PUNCTURE_TRANSFER;
use crate::error::ModelError;
use crate::model::{CenterId, CenterType, Patient, StrokeCenter, TreatmentQuantiles};
use crate::simulation::RunSettings;
use crate::tensor::SampleMatrix;

// 75th percentile of the standard normal.
const Z_75: f64 = 0.674_489_75;

/// Sampler for one in-hospital treatment interval.
enum PerfDraw {
    /// Performance held at the reported median.
    Fixed(f64),
    /// Log-normal fitted through the median and 75th percentile.
    Skewed(LogNormal<f64>),
}

impl PerfDraw {
    fn from_quantiles(
        center_id: CenterId,
        q: TreatmentQuantiles,
        fix_performance: bool,
    ) -> Result<Self, ModelError> {
        if fix_performance {
            return Ok(Self::Fixed(q.median));
        }
        if !(q.median.is_finite() && q.median > 0.0 && q.q75.is_finite()) {
            return Err(ModelError::InvalidPerformanceQuantiles {
                center_id,
                median: q.median,
                q75: q.q75,
            });
        }
        let mu = q.median.ln();
        let sigma = (q.q75.ln() - mu) / Z_75;
        LogNormal::new(mu, sigma)
            .map(Self::Skewed)
            .map_err(|_| ModelError::InvalidPerformanceQuantiles {
                center_id,
                median: q.median,
                q75: q.q75,
            })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Self::Fixed(minutes) => *minutes,
            Self::Skewed(dist) => dist.sample(rng),
        }
    }
}

fn travel_factor<R: Rng + ?Sized>(rng: &mut R, settings: &RunSettings) -> f64 {
    if settings.add_time_uncertainty {
        rng.random_range(0.8..1.2)
    } else {
        1.0
    }
}

/// All random draws for one simulation iteration.
#[derive(Debug, Clone, Serialize)]
pub struct TimingSamples {
    /// Minutes from symptom onset to thrombolysis, per (sample, center).
    pub onset_to_needle: SampleMatrix,
    /// Minutes from symptom onset to groin puncture, per (sample, center).
    /// NaN where the routing offers no thrombectomy.
    pub onset_to_puncture: SampleMatrix,
    /// Per-sample probability that the stroke is a large vessel occlusion.
    pub p_lvo: Vec<f64>,
}

impl TimingSamples {
    /// Draw timelines for `n_samples` simulated patients across `centers`.
    ///
    /// A comprehensive center treats on site with its own needle and
    /// puncture performance. A primary center needles on site and, if a
    /// transfer route is configured, ships the patient onward for puncture
    /// after the interfacility transfer plus a fixed door-to-puncture delay
    /// at the receiving center. A primary center with no route leaves the
    /// puncture time NaN.
    pub fn draw<R: Rng + ?Sized>(
        rng: &mut R,
        patient: &Patient,
        centers: &[&StrokeCenter],
        n_samples: usize,
        settings: &RunSettings,
    ) -> Result<Self, ModelError> {
        let mut onset_to_needle = SampleMatrix::new(n_samples, centers.len());
        let mut onset_to_puncture = SampleMatrix::filled(n_samples, centers.len(), f64::NAN);

        for (j, center) in centers.iter().enumerate() {
            let needle_perf = PerfDraw::from_quantiles(
                center.center_id,
                center.door_to_needle,
                settings.fix_performance,
            )?;
            let puncture_perf = match center.door_to_puncture {
                Some(q) => Some(PerfDraw::from_quantiles(
                    center.center_id,
                    q,
                    settings.fix_performance,
                )?),
                None => None,
            };

            for i in 0..n_samples {
                let travel = center.time * travel_factor(rng, settings);
                let needle = patient.time_since_symptoms + travel + needle_perf.sample(rng);
                onset_to_needle.set(i, j, needle);

                match center.center_type {
                    CenterType::Comprehensive => {
                        if let Some(perf) = &puncture_perf {
                            let puncture =
                                patient.time_since_symptoms + travel + perf.sample(rng);
                            onset_to_puncture.set(i, j, puncture);
                        }
                    }
                    CenterType::Primary => {
                        if let (Some(transfer), Some(_)) =
                            (center.transfer_time, center.destination_id)
                        {
                            let onward = transfer * travel_factor(rng, settings);
                            onset_to_puncture
                                .set(i, j, needle + onward + DOOR_TO_PUNCTURE_TRANSFER);
                        }
                    }
                }
            }
        }

        let p_lvo =
            patient
                .severity
                .prob_lvo_given_ais(rng, n_samples, settings.add_lvo_uncertainty);

        Ok(Self {
            onset_to_needle,
            onset_to_puncture,
            p_lvo,
        })
    }
}
