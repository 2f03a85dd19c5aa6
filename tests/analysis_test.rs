//! Analysis group statistics and histogram behavior

use traffic_light_sim::simulation::{
    AnalysisGroup, RunConfig, DEFAULT_HORIZON, MAX_HISTOGRAM_BUCKETS,
};

fn sample_group() -> AnalysisGroup {
    let mut group = AnalysisGroup::new("sample", 10.0, 0.0);
    group.add_event_time(1.0);
    group.add_event_time(5.0);
    group.add_event_time(12.0);
    group.add_event_separator(20.0);
    group.add_event_time(25.0);
    group
}

#[test]
fn test_finalize_computes_time_to_boundary_stats() {
    let mut group = sample_group();
    let stats = group.finalize_interval(30.0);

    assert!(group.is_finalized());
    assert_eq!(stats.name, "sample");
    assert_eq!(stats.count, 4);
    assert_eq!(stats.interval_counts, vec![3, 1]);
    assert_eq!(group.separators(), &[20.0]);
    assert_eq!(group.arrivals(), &[1.0, 5.0, 12.0, 25.0]);

    let summary = stats.summary.expect("non-empty group has a summary");
    assert_eq!(summary.min, 5.0);
    assert_eq!(summary.max, 19.0);
    assert!((summary.mean - 11.75).abs() < 1e-9);
    assert!((summary.median - 11.5).abs() < 1e-9);
    assert!((stats.arrival_rate() - 4.0 / 30.0).abs() < 1e-9);
}

#[test]
fn test_histogram_is_dense_and_sums_to_count() {
    let mut group = sample_group();
    group.finalize_interval(30.0);

    let coarse = group.histogram().unwrap();
    assert_eq!(coarse.counts, vec![2, 2]);
    assert_eq!(coarse.total(), group.count());

    // Values 5, 8, 15, 19 leave buckets 0 and 2 empty.
    let fine = group.generate_histogram(5.0).unwrap();
    assert_eq!(fine.counts, vec![0, 2, 0, 2]);
    let lower_bounds: Vec<f64> = fine.buckets().map(|(lower, _)| lower).collect();
    assert_eq!(lower_bounds, vec![0.0, 5.0, 10.0, 15.0]);
}

#[test]
fn test_histogram_buckets_are_left_closed() {
    let mut group = AnalysisGroup::new("edge", 10.0, 0.0);
    group.add_event_time(0.0);
    group.finalize_interval(10.0);
    assert_eq!(group.histogram().unwrap().counts, vec![0, 1]);
}

#[test]
fn test_histogram_refuses_too_many_buckets() {
    let mut group = AnalysisGroup::new("wide", 1.0, 0.0);
    group.add_event_time(0.0);
    group.finalize_interval(1e9);

    let err = group.generate_histogram(1.0).unwrap_err();
    assert!(err.to_string().contains("limit is"), "{}", err);
    assert!(group.generate_histogram(1e9 / (MAX_HISTOGRAM_BUCKETS as f64 - 1.0)).is_ok());
}

#[test]
fn test_empty_group_finalizes_cleanly() {
    let mut group = AnalysisGroup::new("empty", 10.0, 60.0);
    let stats = group.finalize_interval(60.0);
    assert_eq!(stats.count, 0);
    assert!(stats.summary.is_none());
    assert_eq!(stats.arrival_rate(), 0.0);

    let histogram = group.histogram().unwrap();
    assert!(histogram.counts.is_empty());
    assert_eq!(histogram.total(), 0);
}

#[test]
fn test_display_includes_counts() {
    let mut group = sample_group();
    let stats = group.finalize_interval(30.0);
    let text = stats.to_string();
    assert!(text.contains("[sample]"));
    assert!(text.contains("4 arrivals"));

    let histogram = group.histogram().unwrap().to_string();
    assert!(histogram.contains("total=4"));
}

#[test]
#[should_panic(expected = "finalize_interval called on finalized group")]
fn test_double_finalize_panics() {
    let mut group = AnalysisGroup::new("twice", 10.0, 0.0);
    group.finalize_interval(1.0);
    group.finalize_interval(2.0);
}

#[test]
#[should_panic(expected = "add_event_time called on finalized group")]
fn test_recording_after_finalize_panics() {
    let mut group = AnalysisGroup::new("closed", 10.0, 0.0);
    group.finalize_interval(1.0);
    group.add_event_time(2.0);
}

#[test]
#[should_panic(expected = "generate_histogram called on open group")]
fn test_histogram_of_open_group_panics() {
    let group = AnalysisGroup::new("open", 10.0, 0.0);
    group.histogram().unwrap();
}

#[test]
fn test_presets_and_validation() {
    assert_eq!(RunConfig::preset(1).unwrap(), RunConfig::default());
    assert_eq!(RunConfig::default().horizon, DEFAULT_HORIZON);

    let case8 = RunConfig::preset(8).unwrap();
    assert_eq!(case8.lambda, 5.0);
    assert_eq!(case8.bucket_size, 5.0);

    let err = RunConfig::preset(0).unwrap_err();
    assert!(err.to_string().contains("between 1 and 8"));
    assert!(RunConfig::preset(9).is_err());

    assert!(RunConfig::default().validate().is_ok());
    assert!(RunConfig::new(2, 0.75, 30.0, f64::NAN, 10.0).validate().is_err());
    assert!(RunConfig::new(2, 0.75, 30.0, 30.0, 0.0).validate().is_err());
    assert_eq!(RunConfig::default().cycle_length(), 60.0);
}
