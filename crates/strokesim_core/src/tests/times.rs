use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::ModelError;
use crate::model::{CenterId, StrokeCenter, TreatmentQuantiles};
use crate::simulation::RunSettings;
use crate::times::TimingSamples;

use super::{deterministic_settings, patient_with_race};

#[test]
fn deterministic_timelines_match_routing() {
    let roster = vec![
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
        StrokeCenter::primary(CenterId(3), "Rural Primary", TreatmentQuantiles::new(35.0, 45.0))
            .with_time(20.0),
    ];
    let refs: Vec<&StrokeCenter> = roster.iter().collect();
    let patient = patient_with_race(7.0);

    let mut rng = SmallRng::seed_from_u64(0);
    let times =
        TimingSamples::draw(&mut rng, &patient, &refs, 2, &deterministic_settings()).unwrap();

    for sample in 0..2 {
        // Onset 50 + travel + door-to-needle median.
        assert_eq!(times.onset_to_needle.get(sample, 0), 125.0);
        assert_eq!(times.onset_to_needle.get(sample, 1), 90.0);
        assert_eq!(times.onset_to_needle.get(sample, 2), 105.0);

        // Comprehensive punctures on site; the routed primary adds transfer
        // plus the receiving center's door-to-puncture; no route, no puncture.
        assert_eq!(times.onset_to_puncture.get(sample, 0), 170.0);
        assert_eq!(times.onset_to_puncture.get(sample, 1), 145.0);
        assert!(times.onset_to_puncture.get(sample, 2).is_nan());
    }
}

#[test]
fn travel_jitter_stays_inside_band() {
    let roster = vec![StrokeCenter::comprehensive(
        CenterId(1),
        "Metro Comprehensive",
        TreatmentQuantiles::new(50.0, 65.0),
        TreatmentQuantiles::new(90.0, 110.0),
    )
    .with_time(100.0)];
    let refs: Vec<&StrokeCenter> = roster.iter().collect();
    let patient = patient_with_race(7.0);
    let settings = RunSettings {
        add_time_uncertainty: true,
        add_lvo_uncertainty: false,
        fix_performance: true,
        cost_year: 2016,
    };

    let mut rng = SmallRng::seed_from_u64(11);
    let times = TimingSamples::draw(&mut rng, &patient, &refs, 200, &settings).unwrap();

    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for sample in 0..200 {
        let needle = times.onset_to_needle.get(sample, 0);
        // 50 onset + jittered travel in [80, 120) + 50 needle median.
        assert!((180.0..220.0).contains(&needle), "needle {needle} out of band");
        low = low.min(needle);
        high = high.max(needle);

        // One ride: needle and puncture share the jitter draw.
        let spread = times.onset_to_puncture.get(sample, 0) - needle;
        assert!((spread - 40.0).abs() < 1e-9);
    }
    assert!(high - low > 1.0, "jitter produced a degenerate band");
}

#[test]
fn performance_draws_follow_quantiles() {
    let roster = vec![StrokeCenter::comprehensive(
        CenterId(1),
        "Metro Comprehensive",
        TreatmentQuantiles::new(45.0, 60.0),
        TreatmentQuantiles::new(90.0, 110.0),
    )
    .with_time(0.0)];
    let refs: Vec<&StrokeCenter> = roster.iter().collect();
    let patient = patient_with_race(7.0);
    let settings = RunSettings {
        add_time_uncertainty: false,
        add_lvo_uncertainty: false,
        fix_performance: false,
        cost_year: 2016,
    };

    let mut rng = SmallRng::seed_from_u64(3);
    let times = TimingSamples::draw(&mut rng, &patient, &refs, 400, &settings).unwrap();

    let mut below_median = 0;
    let mut below_q75 = 0;
    for sample in 0..400 {
        let door_to_needle = times.onset_to_needle.get(sample, 0) - 50.0;
        assert!(door_to_needle > 0.0, "log-normal interval went nonpositive");
        if door_to_needle < 45.0 {
            below_median += 1;
        }
        if door_to_needle < 60.0 {
            below_q75 += 1;
        }
    }
    // Loose binomial bands around the fitted quantiles.
    assert!((120..=280).contains(&below_median), "median off: {below_median}/400");
    assert!((220..=380).contains(&below_q75), "q75 off: {below_q75}/400");
}

#[test]
fn invalid_quantiles_rejected() {
    let backwards = vec![StrokeCenter::primary(
        CenterId(1),
        "Backwards",
        TreatmentQuantiles::new(40.0, 30.0),
    )
    .with_time(10.0)];
    let refs: Vec<&StrokeCenter> = backwards.iter().collect();
    let patient = patient_with_race(5.0);

    let mut rng = SmallRng::seed_from_u64(0);
    let sampled = TimingSamples::draw(&mut rng, &patient, &refs, 5, &RunSettings::default());
    assert!(matches!(
        sampled,
        Err(ModelError::InvalidPerformanceQuantiles { center_id: CenterId(1), .. })
    ));

    // Holding performance at the median never consults the distribution.
    let fixed = TimingSamples::draw(&mut rng, &patient, &refs, 5, &deterministic_settings());
    assert!(fixed.is_ok());

    let nonpositive = vec![StrokeCenter::primary(
        CenterId(2),
        "Zeroed",
        TreatmentQuantiles::new(0.0, 10.0),
    )
    .with_time(10.0)];
    let refs: Vec<&StrokeCenter> = nonpositive.iter().collect();
    let sampled = TimingSamples::draw(&mut rng, &patient, &refs, 5, &RunSettings::default());
    assert!(matches!(sampled, Err(ModelError::InvalidPerformanceQuantiles { .. })));
}

#[test]
fn lvo_probabilities_cover_every_sample() {
    let roster = super::two_center_roster();
    let refs: Vec<&StrokeCenter> = roster.iter().collect();
    let patient = patient_with_race(4.0);

    let mut rng = SmallRng::seed_from_u64(5);
    let times =
        TimingSamples::draw(&mut rng, &patient, &refs, 17, &deterministic_settings()).unwrap();

    assert_eq!(times.p_lvo.len(), 17);
    let first = times.p_lvo[0];
    assert!(times.p_lvo.iter().all(|&p| p == first), "point mode must not vary");
}
