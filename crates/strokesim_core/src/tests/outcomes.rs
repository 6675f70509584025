use crate::costs::CostTable;
use crate::error::ModelError;
use crate::model::{CenterId, StrokeCenter, TreatmentQuantiles};
use crate::outcomes::StrategyOutcomes;
use crate::severity::Severity;
use crate::simulation::StrokeModel;
use crate::tensor::SampleMatrix;

use super::{deterministic_settings, patient_with_nihss, patient_with_race, two_center_roster};

fn cell_sum(cell: &[f64]) -> f64 {
    cell.iter().sum()
}

#[test]
fn mrs_distribution_rows_sum_to_one() {
    let severity = Severity::from_nihss(10.0).unwrap();
    let p_good = SampleMatrix::filled(3, 2, 0.5);
    let states = severity.break_up_ais_patients(&p_good);

    for sample in 0..3 {
        for center in 0..2 {
            let total = cell_sum(states.cell(sample, center));
            assert!((total - 1.0).abs() < 1e-9, "cell sums to {total}");
        }
    }
}

#[test]
fn moderate_stroke_death_and_mrs0_fractions() {
    let severity = Severity::from_nihss(10.0).unwrap();
    let p_good = SampleMatrix::filled(3, 2, 0.5);
    let states = severity.break_up_ais_patients(&p_good);

    for sample in 0..3 {
        for center in 0..2 {
            assert!((states.get(sample, center, 6) - 0.139).abs() < 1e-12);
            assert!((states.get(sample, center, 0) - 0.5 * 0.205627706).abs() < 1e-9);
        }
    }
}

#[test]
fn death_band_tracks_severity() {
    let cases = [
        (5.0, 0.042),
        (7.5, 0.139),
        (12.5, 0.139),
        (13.5, 0.316),
        (20.5, 0.316),
        (21.05, 0.535),
    ];
    for (nihss, expected_death) in cases {
        let severity = Severity::from_nihss(nihss).unwrap();
        let states = severity.break_up_ais_patients(&SampleMatrix::filled(1, 1, 0.2));
        assert!(
            (states.get(0, 0, 6) - expected_death).abs() < 1e-12,
            "wrong death fraction for NIHSS {nihss}"
        );
    }
}

#[test]
fn good_mass_capped_by_death_band() {
    // NIHSS past 21 carries a 53.5% death fraction, so a 95% good-outcome
    // probability is impossible and the bad-outcome mass collapses to zero.
    let severity = Severity::from_nihss(21.05).unwrap();
    let states = severity.break_up_ais_patients(&SampleMatrix::filled(1, 1, 0.95));

    assert!((states.get(0, 0, 6) - 0.535).abs() < 1e-12);
    for state in 3..=5 {
        assert!(states.get(0, 0, state).abs() < 1e-12);
    }
    assert!((states.get(0, 0, 0) - 0.205627706 * 0.465).abs() < 1e-9);
    assert!((cell_sum(states.cell(0, 0)) - 1.0).abs() < 1e-9);
}

#[test]
fn deterministic_pipeline_mixes_costs_by_lvo_probability() {
    let model = StrokeModel::new(patient_with_race(8.0), two_center_roster());
    let settings = deterministic_settings();
    let run = model.run(0, 4, &settings).unwrap();

    // Fixed performance, no jitter: every sample shares one timeline.
    for sample in 0..4 {
        assert_eq!(run.times.onset_to_needle.get(sample, 0), 125.0);
        assert_eq!(run.times.onset_to_needle.get(sample, 1), 90.0);
        assert_eq!(run.times.onset_to_puncture.get(sample, 0), 170.0);
        assert_eq!(run.times.onset_to_puncture.get(sample, 1), 145.0);
    }

    let table = CostTable::inflated_to(2016);
    let outcomes = StrategyOutcomes::run_all_strategies(&model.patient, &run.times, &table);

    for sample in 0..4 {
        for center in 0..2 {
            let total = cell_sum(outcomes.states.cell(sample, center));
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    // Both centers treat inside both windows, so the acute cost is the
    // LVO/no-LVO mixture of full treatment vs thrombolysis alone.
    let p_lvo = 1.0 / (1.0 + (2.9297f64 - 0.5533 * 8.0).exp());
    let expected = p_lvo * (table.admission + table.thrombolysis + table.thrombectomy)
        + (1.0 - p_lvo) * (table.admission + table.thrombolysis);
    for sample in 0..4 {
        assert!((outcomes.acute_costs.get(sample, 0) - expected).abs() < 1e-9);
    }
}

#[test]
fn no_thrombectomy_route_costs_thrombolysis_only() {
    let roster = vec![
        StrokeCenter::primary(CenterId(9), "Rural Primary", TreatmentQuantiles::new(30.0, 40.0))
            .with_time(10.0),
    ];
    let model = StrokeModel::new(patient_with_nihss(10.0), roster);
    let run = model.run(0, 2, &deterministic_settings()).unwrap();

    assert!(run.times.onset_to_puncture.get(0, 0).is_nan());

    let table = CostTable::inflated_to(2016);
    let outcomes = StrategyOutcomes::run_all_strategies(&model.patient, &run.times, &table);

    // LVO and no-LVO courses both amount to admission plus thrombolysis, so
    // the mixture collapses.
    let expected = table.admission + table.thrombolysis;
    assert!((outcomes.acute_costs.get(0, 0) - expected).abs() < 1e-9);
    assert!((cell_sum(outcomes.states.cell(0, 0)) - 1.0).abs() < 1e-9);
}

#[test]
fn same_seed_reproduces_every_draw() {
    let model = StrokeModel::new(patient_with_race(6.0), two_center_roster());
    let settings = crate::simulation::RunSettings::default();

    let a = model.run(7, 50, &settings).unwrap();
    let b = model.run(7, 50, &settings).unwrap();

    assert_eq!(a.times.onset_to_needle.data(), b.times.onset_to_needle.data());
    assert_eq!(a.times.onset_to_puncture.data(), b.times.onset_to_puncture.data());
    assert_eq!(a.times.p_lvo, b.times.p_lvo);
    assert_eq!(a.results.optimal_destination, b.results.optimal_destination);
}

#[test]
fn degenerate_inputs_error() {
    let reachable = StrokeModel::new(patient_with_race(5.0), two_center_roster());
    assert!(matches!(
        reachable.run(0, 0, &deterministic_settings()),
        Err(ModelError::EmptySample)
    ));

    // Constructors leave travel times unknown until set.
    let unreachable = StrokeModel::new(
        patient_with_race(5.0),
        vec![StrokeCenter::primary(
            CenterId(1),
            "Unplaced",
            TreatmentQuantiles::new(30.0, 40.0),
        )],
    );
    assert!(matches!(
        unreachable.run(0, 10, &deterministic_settings()),
        Err(ModelError::NoReachableCenters)
    ));
}
