//! Stroke severity scales and severity-conditioned outcome probabilities.
//!
//! Two prehospital severity measures are supported: the full NIH Stroke Scale
//! (NIHSS, 0-42) and the abbreviated RACE score (0-9) collected in the field.
//! A severity is normalized to its RACE equivalent at construction and the
//! NIHSS value is re-derived from it, so every probability model below reads
//! a single internal scale. The RACE-NIHSS mapping is a published regression
//! and therefore lossy: an NIHSS-constructed severity reports the regression
//! NIHSS, not the input.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{RankinGrade, TIME_LIMIT_TPA};
use crate::error::SeverityError;
use crate::tensor::{OutcomeTensor, SampleMatrix};

/// Scale a severity score was reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityScale {
    Race,
    Nihss,
}

/// A patient's stroke severity, stored as its RACE equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Severity {
    scale: SeverityScale,
    race: f64,
    nihss: f64,
}

// RACE-NIHSS regression.
// Source: Perez de la Ossa et al., Stroke 2014, Schlemm analysis
fn nihss_from_race(race: f64) -> f64 {
    if race == 0.0 { 1.0 } else { -0.39 + 2.39 * race }
}

fn race_from_nihss(nihss: f64) -> f64 {
    let race = if nihss <= 1.0 {
        0.0
    } else {
        (nihss + 0.39) / 2.39
    };
    // A derived RACE past the top of the scale resets to zero, it is not
    // clamped to 9. Kept exactly as the published mapping behaves.
    if race > 9.0 { 0.0 } else { race }
}

impl Severity {
    /// Severity from a RACE score on [0, 9].
    pub fn from_race(score: f64) -> Result<Self, SeverityError> {
        if !(0.0..=9.0).contains(&score) {
            return Err(SeverityError::InvalidRace(score));
        }
        Ok(Self {
            scale: SeverityScale::Race,
            race: score,
            nihss: nihss_from_race(score),
        })
    }

    /// Severity from an NIHSS score on [0, 42].
    pub fn from_nihss(score: f64) -> Result<Self, SeverityError> {
        if !(0.0..=42.0).contains(&score) {
            return Err(SeverityError::InvalidNihss(score));
        }
        let race = race_from_nihss(score);
        Ok(Self {
            scale: SeverityScale::Nihss,
            race,
            nihss: nihss_from_race(race),
        })
    }

    /// Scale this severity was constructed from.
    #[must_use]
    pub fn scale(&self) -> SeverityScale {
        self.scale
    }

    /// RACE equivalent of this severity.
    #[must_use]
    pub fn race(&self) -> f64 {
        self.race
    }

    /// NIHSS equivalent derived from the RACE value.
    #[must_use]
    pub fn nihss(&self) -> f64 {
        self.nihss
    }

    #[inline]
    fn lvo_logistic(&self, b0: f64, b1: f64) -> f64 {
        1.0 / (1.0 + (-b0 - b1 * self.race).exp())
    }

    /// Probability that an acute ischemic stroke of this severity is a large
    /// vessel occlusion, one value per sample.
    ///
    /// Without uncertainty every sample carries the point estimate. With
    /// uncertainty each sample draws uniformly between the lower and upper
    /// regression curves evaluated at this score.
    ///
    /// Source: Perez de la Ossa et al., Stroke 2014
    pub fn prob_lvo_given_ais<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n: usize,
        add_uncertainty: bool,
    ) -> Vec<f64> {
        if !add_uncertainty {
            return vec![self.lvo_logistic(-2.9297, 0.5533); n];
        }
        let lower = self.lvo_logistic(-3.6526, 0.4141);
        let upper = self.lvo_logistic(-2.2067, 0.6925);
        (0..n).map(|_| rng.random_range(lower..upper)).collect()
    }

    /// Good outcome (mRS 0-2) after successful endovascular reperfusion, as a
    /// function of minutes from onset to reperfusion.
    ///
    /// Saver et al. JAMA 2016, Schlemm analysis. The regression was redone
    /// against the published data.
    #[must_use]
    pub fn p_good_outcome_post_evt_success(&self, time_onset_to_reperfusion: f64) -> f64 {
        let beta = -0.00879544 - 9.01419716e-05 * time_onset_to_reperfusion;
        (beta * self.nihss).exp().clamp(0.0, 1.0)
    }

    /// Good outcome with no reperfusion at all.
    ///
    /// Schlemm analysis: linear decline in NIHSS, floored at 0.05 from
    /// NIHSS 20 upward.
    #[must_use]
    pub fn p_good_outcome_no_reperfusion(&self) -> f64 {
        if self.nihss >= 20.0 {
            0.05
        } else {
            (-0.0464 * self.nihss + 1.0071).clamp(0.0, 1.0)
        }
    }

    /// Good outcome for an ischemic stroke without a large vessel occlusion,
    /// as a function of minutes from onset to thrombolysis.
    ///
    /// The treatment odds ratio applies only inside the thrombolysis window;
    /// past it the patient gets no tPA and keeps the baseline probability.
    /// An unknown (NaN) time yields an unknown probability.
    ///
    /// Schlemm analysis. No consistent evidence that the time-dependent odds
    /// ratio differs between patients with and without LVO, so the same
    /// regression is used.
    #[must_use]
    pub fn p_good_outcome_ais_no_lvo(&self, time_onset_to_tpa: f64) -> f64 {
        if time_onset_to_tpa.is_nan() {
            return f64::NAN;
        }
        // The baseline hits 1.0 at NIHSS 0, which the odds transform cannot
        // represent. Held just below 1 before converting.
        let baseline = (0.001 * self.nihss * self.nihss - 0.0615 * self.nihss + 1.0)
            .min(0.999_999_999_999);
        let p = if time_onset_to_tpa < TIME_LIMIT_TPA {
            let odds_ratio = -0.0031 * time_onset_to_tpa + 2.068;
            let odds = baseline / (1.0 - baseline) * odds_ratio;
            odds / (1.0 + odds)
        } else {
            baseline
        };
        p.clamp(0.0, 1.0)
    }

    /// Reperfusion probability under endovascular therapy.
    ///
    /// Saver et al. JAMA 2016, Schlemm analysis
    #[must_use]
    pub fn p_reperfusion_endovascular(&self) -> f64 {
        0.71
    }

    /// Early reperfusion from thrombolysis given while waiting for the
    /// puncture, saturating at 70 minutes of needle-to-groin time.
    #[must_use]
    pub fn p_early_reperfusion_thrombolysis(&self, time_needle_to_groin: f64) -> f64 {
        if time_needle_to_groin.is_nan() {
            return f64::NAN;
        }
        0.18 * time_needle_to_groin.min(70.0) / 70.0
    }

    /// Expand good-outcome probabilities into full mRS distributions.
    ///
    /// From the pooled meta-analysis in the supplement of Saver et al. JAMA
    /// 2016: death (mRS 6) is a band function of NIHSS alone, independent of
    /// time to treatment; the good and bad outcome masses are split over
    /// mRS 0-2 and mRS 3-5 with fixed proportions. The good mass is capped at
    /// 1 minus the death band so the bad mass can never go negative, keeping
    /// every cell a probability distribution.
    #[must_use]
    pub fn break_up_ais_patients(&self, p_good_outcome: &SampleMatrix) -> OutcomeTensor {
        let p_death = if self.nihss < 7.0 {
            0.042
        } else if self.nihss < 13.0 {
            0.139
        } else if self.nihss < 21.0 {
            0.316
        } else {
            0.535
        };

        let mut states = OutcomeTensor::new(p_good_outcome.n_samples(), p_good_outcome.n_centers());
        for sample in 0..p_good_outcome.n_samples() {
            for center in 0..p_good_outcome.n_centers() {
                let mut p_good = p_good_outcome.get(sample, center);
                if p_good > 1.0 - p_death {
                    p_good = 1.0 - p_death;
                }
                let p_bad = 1.0 - p_good - p_death;

                let cell = states.cell_mut(sample, center);
                cell[RankinGrade::Mrs0.index()] = 0.205627706 * p_good;
                cell[RankinGrade::Mrs1.index()] = 0.341991342 * p_good;
                cell[RankinGrade::Mrs2.index()] = 0.452380952 * p_good;
                cell[RankinGrade::Mrs3.index()] = 0.35678392 * p_bad;
                cell[RankinGrade::Mrs4.index()] = 0.432160804 * p_bad;
                cell[RankinGrade::Mrs5.index()] = 0.211055276 * p_bad;
                cell[RankinGrade::Mrs6.index()] = p_death;
            }
        }
        states
    }
}
