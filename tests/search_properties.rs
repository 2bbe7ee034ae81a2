//! Property tests for the tolerance predicate and the match engine

use domdb::ingest::{ExperimentBatch, PeakRecord, SampleRecord};
use domdb::model::IonMode;
use domdb::projection::ResultTable;
use domdb::search::{ppm_difference, within_tolerance, MatchEngine, QueryPoint, SearchOptions, Tolerance};
use domdb::store::Database;
use proptest::prelude::*;

/// Two experiments of random peaks around m/z 300, each with a control and two
/// treatment samples split over two media
fn random_db(peaks: &[(f64, f64, [f64; 3])]) -> Database {
    let mut db = Database::new();
    for (e, chunk) in peaks.chunks(((peaks.len() + 1) / 2).max(1)).enumerate() {
        let mut batch = ExperimentBatch::new(format!("exp{e}"), IonMode::Positive);
        batch.samples = vec![
            SampleRecord::new("blank", true).attribute("media", "LB"),
            SampleRecord::new("t1", false).attribute("media", "LB"),
            SampleRecord::new("t2", false).attribute("media", "M9"),
        ];
        batch.peaks = chunk
            .iter()
            .map(|(mz, rt, i)| PeakRecord::new(*mz, *rt, i.to_vec()))
            .collect();
        db.insert_experiment(batch).unwrap();
    }
    db
}

fn peak_strategy() -> impl Strategy<Value = (f64, f64, [f64; 3])> {
    (
        299.99f64..300.01,
        50.0f64..60.0,
        // at least one positive intensity per peak
        (0.0f64..100.0, 1.0f64..100.0, 0.0f64..100.0),
    )
        .prop_map(|(mz, rt, (a, b, c))| (mz, rt, [a, b, c]))
}

proptest! {
    /// The rt test does not depend on argument order
    #[test]
    fn test_rt_symmetry(mz in 50.0f64..1000.0, rt_a in 0.0f64..1000.0, rt_b in 0.0f64..1000.0, window in 0.0f64..50.0) {
        let a = QueryPoint::new(mz, rt_a);
        let b = QueryPoint::new(mz, rt_b);
        let tol = Tolerance::new(0.0, window);
        prop_assert_eq!(within_tolerance(&a, &b, &tol), within_tolerance(&b, &a, &tol));
    }

    /// The second argument is the ppm reference: the smaller m/z as reference
    /// always gives the larger ppm difference
    #[test]
    fn test_ppm_reference_side(lo in 50.0f64..1000.0, delta in 0.0f64..1.0) {
        let hi = lo + delta;
        prop_assert!(ppm_difference(hi, lo) >= ppm_difference(lo, hi));
        let tol = Tolerance::new(ppm_difference(lo, hi), 0.0);
        prop_assert!(within_tolerance(&QueryPoint::new(lo, 0.0), &QueryPoint::new(hi, 0.0), &tol));
    }

    /// A higher intensity-over-controls ratio never adds rows
    #[test]
    fn test_ratio_monotonicity(
        peaks in prop::collection::vec(peak_strategy(), 1..20),
        r1 in 0.0f64..5.0,
        bump in 0.0f64..5.0,
        grouped in any::<bool>(),
    ) {
        let db = random_db(&peaks);
        let attrs = if grouped { vec!["media".to_string()] } else { Vec::new() };
        let run = |ratio: f64| {
            let config = SearchOptions {
                ppm_diff: 50.0,
                rt_diff: 5.0,
                int_over_controls: Some(ratio),
                attrs: attrs.clone(),
                ..Default::default()
            }
            .validate()
            .unwrap();
            MatchEngine::new(db.partition(IonMode::Positive), &config)
                .bulk_match("exp0")
                .unwrap()
                .iter()
                .map(|r| (r.source.peak_id(), r.matched.id, r.sample.id))
                .collect::<Vec<_>>()
        };

        let loose = run(r1);
        let strict = run(r1 + bump);
        prop_assert!(strict.len() <= loose.len());
        prop_assert!(strict.iter().all(|row| loose.contains(row)));
    }

    /// Bulk match never pairs a peak with itself or its own experiment, and
    /// repeated runs render identical CSV
    #[test]
    fn test_bulk_match_invariants(peaks in prop::collection::vec(peak_strategy(), 2..20)) {
        let db = random_db(&peaks);
        let config = SearchOptions {
            ppm_diff: 50.0,
            rt_diff: 5.0,
            int_over_controls: Some(0.0),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let engine = MatchEngine::new(db.partition(IonMode::Positive), &config);

        let rows = engine.bulk_match("exp0").unwrap();
        for row in &rows {
            prop_assert_ne!(row.source.peak_id(), Some(row.matched.id));
            prop_assert_ne!(row.source.experiment_name(), Some(row.matched_experiment.name.as_str()));
        }

        let first = ResultTable::from_rows(&rows).unwrap().to_csv_string().unwrap();
        let again = engine.bulk_match("exp0").unwrap();
        let second = ResultTable::from_rows(&again).unwrap().to_csv_string().unwrap();
        prop_assert_eq!(first, second);
    }
}
