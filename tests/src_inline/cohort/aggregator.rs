use super::*;
use crate::input::{MemorySource, ScoreRecord};

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn three_subject_repo() -> ScoreRepository {
    let source = MemorySource::new()
        .with("S1", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![0.5, 0.6]))
        .with("S2", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![0.7, 0.8]))
        .with("S3", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![0.3, 0.4]));
    ScoreRepository::from_source(&ids(&["S1", "S2", "S3"]), &ids(&["A-vs-B"]), &source).unwrap()
}

fn single_subject_repo() -> ScoreRepository {
    let source =
        MemorySource::new().with("S1", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![0.5, 0.6]));
    ScoreRepository::from_source(&ids(&["S1"]), &ids(&["A-vs-B"]), &source).unwrap()
}

#[test]
fn test_new_requires_loaded_repository() {
    let repo = ScoreRepository::new();
    assert!(matches!(
        CohortAggregator::new(&repo),
        Err(CohortError::NotLoaded)
    ));
}

#[test]
fn test_three_subject_mean_and_sem() {
    let repo = three_subject_repo();
    let agg = CohortAggregator::new(&repo).unwrap();

    let mean = agg.mean_curve("A-vs-B").unwrap();
    assert_eq!(mean.len(), 2);
    assert!(approx_eq(mean.as_slice()[0], 0.5));
    assert!(approx_eq(mean.as_slice()[1], 0.6));

    let sem = agg.standard_error_curve("A-vs-B").unwrap();
    let expected = 0.2 / 3f64.sqrt();
    assert!(approx_eq(sem.as_slice()[0], expected));
    assert!(approx_eq(sem.as_slice()[1], expected));
    assert!((sem.as_slice()[0] - 0.1155).abs() < 1e-4);
}

#[test]
fn test_queries_are_idempotent() {
    let repo = three_subject_repo();
    let agg = CohortAggregator::new(&repo).unwrap();
    let a = agg.mean_curve("A-vs-B").unwrap();
    let b = agg.mean_curve("A-vs-B").unwrap();
    let sa = agg.standard_error_curve("A-vs-B").unwrap();
    let sb = agg.standard_error_curve("A-vs-B").unwrap();
    for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
    for (x, y) in sa.as_slice().iter().zip(sb.as_slice()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[test]
fn test_single_subject_sem_fails() {
    let repo = single_subject_repo();
    let agg = CohortAggregator::new(&repo).unwrap();
    assert_eq!(agg.mean_curve("A-vs-B").unwrap().as_slice(), &[0.5, 0.6]);
    assert!(matches!(
        agg.standard_error_curve("A-vs-B"),
        Err(CohortError::InsufficientSamples { n: 1, .. })
    ));
}

#[test]
fn test_subject_curve_bounds() {
    let repo = three_subject_repo();
    let agg = CohortAggregator::new(&repo).unwrap();
    assert_eq!(agg.subject_curve("A-vs-B", 1).unwrap().as_slice(), &[0.7, 0.8]);
    assert!(matches!(
        agg.subject_curve("A-vs-B", 5),
        Err(CohortError::IndexOutOfRange { index: 5, n: 3, .. })
    ));
    assert!(matches!(
        agg.subject_curve("A-vs-B", 3),
        Err(CohortError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_unknown_contrast_queries() {
    let repo = three_subject_repo();
    let agg = CohortAggregator::new(&repo).unwrap();
    assert!(matches!(
        agg.mean_curve("X"),
        Err(CohortError::UnknownContrast(_))
    ));
    assert!(matches!(
        agg.standard_error_curve("X"),
        Err(CohortError::UnknownContrast(_))
    ));
    assert!(matches!(
        agg.subject_curve("X", 0),
        Err(CohortError::UnknownContrast(_))
    ));
}

#[test]
fn test_nan_propagates_into_aggregates() {
    let source = MemorySource::new()
        .with("S1", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![f64::NAN, 0.6]))
        .with("S2", "A-vs-B", ScoreRecord::new(vec![0.0, 0.1], vec![0.5, 0.8]));
    let repo =
        ScoreRepository::from_source(&ids(&["S1", "S2"]), &ids(&["A-vs-B"]), &source).unwrap();
    let agg = CohortAggregator::new(&repo).unwrap();
    let mean = agg.mean_curve("A-vs-B").unwrap();
    assert!(mean.as_slice()[0].is_nan());
    assert!(approx_eq(mean.as_slice()[1], 0.7));
    assert!(agg.standard_error_curve("A-vs-B").unwrap().as_slice()[0].is_nan());
}

#[test]
fn test_noisier_contrast_has_larger_sem() {
    let source = MemorySource::new()
        .with("S1", "tight", ScoreRecord::new(vec![0.0], vec![0.60]))
        .with("S2", "tight", ScoreRecord::new(vec![0.0], vec![0.61]))
        .with("S1", "noisy", ScoreRecord::new(vec![0.0], vec![0.40]))
        .with("S2", "noisy", ScoreRecord::new(vec![0.0], vec![0.80]));
    let repo =
        ScoreRepository::from_source(&ids(&["S1", "S2"]), &ids(&["tight", "noisy"]), &source)
            .unwrap();
    let agg = CohortAggregator::new(&repo).unwrap();
    let tight = agg.standard_error_curve("tight").unwrap().as_slice()[0];
    let noisy = agg.standard_error_curve("noisy").unwrap().as_slice()[0];
    assert!(noisy > tight);
}

#[test]
fn test_aggregate_in_load_order() {
    let source = MemorySource::new()
        .with("S1", "b", ScoreRecord::new(vec![0.0], vec![0.5]))
        .with("S1", "a", ScoreRecord::new(vec![0.0], vec![0.7]));
    let repo = ScoreRepository::from_source(&ids(&["S1"]), &ids(&["b", "a"]), &source).unwrap();
    let agg = CohortAggregator::new(&repo).unwrap();
    let result = agg.aggregate().unwrap();
    let names: Vec<&str> = result
        .contrasts
        .iter()
        .map(|c| c.contrast.as_str())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
    assert!(result.contrasts.iter().all(|c| c.sem.is_none()));
    assert_eq!(result.contrasts[1].n_subjects, 1);
}
