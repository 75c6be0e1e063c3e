//! End-to-end analyzer tests
//!
//! These run the full pipeline on small synthetic series whose shapes
//! have unambiguous answers, plus the degenerate inputs the analyzer
//! must survive.

use trend_analysis::TrendAnalyzer;
use trend_core::{Series, TrendResult, TrendType};
use trend_segment::{DivideConquerSegmenter, ModelSearchParameters, ModelSearchSegmenter};

fn triangle_series(scale: f64) -> Series {
    let xs: Vec<i64> = (2000..=2010).collect();
    let ys: Vec<f64> = (0..=10)
        .map(|i| {
            let base = if i <= 5 { i * 10 } else { (10 - i) * 10 };
            base as f64 * scale
        })
        .collect();
    Series::new(xs, ys).unwrap()
}

fn seeded_model_search() -> TrendAnalyzer<ModelSearchSegmenter> {
    let params = ModelSearchParameters {
        seed: Some(42),
        ..Default::default()
    };
    TrendAnalyzer::with_segmenter(ModelSearchSegmenter::with_params(params))
}

fn assert_result_invariants(series: &Series, result: &TrendResult) {
    let first_x = series.first_x();
    let last_x = series.last_x();

    assert_eq!(
        result.sub_trends().len(),
        result.breakpoints().len() + 1,
        "sub-trend count must be breakpoints + 1"
    );
    assert_eq!(result.global_trend().start(), first_x);
    assert_eq!(result.global_trend().end(), last_x);

    let subs = result.sub_trends();
    assert_eq!(subs[0].start(), first_x, "first sub-trend must open the series");
    assert_eq!(
        subs[subs.len() - 1].end(),
        last_x,
        "last sub-trend must close the series"
    );
    for pair in subs.windows(2) {
        assert_eq!(
            pair[0].end(),
            pair[1].start(),
            "adjacent sub-trends must share their boundary"
        );
        assert_ne!(
            pair[0].trend_type(),
            pair[1].trend_type(),
            "adjacent sub-trends must differ in type"
        );
    }

    for (bp, sub) in result.breakpoints().iter().zip(subs.iter().skip(1)) {
        assert_eq!(*bp, sub.start(), "each breakpoint opens a sub-trend");
        assert!(*bp > first_x && *bp < last_x, "breakpoint {bp} not interior");
    }
    assert!(
        result.breakpoints().windows(2).all(|w| w[0] < w[1]),
        "breakpoints must be strictly ascending"
    );
}

#[test]
fn test_triangle_with_model_search() {
    let series = triangle_series(1.0);
    let result = seeded_model_search().analyze(&series).unwrap();
    println!("model search on triangle:\n{result}");

    assert_result_invariants(&series, &result);
    assert_eq!(result.breakpoints(), &[2005]);
    assert_eq!(result.sub_trend_count(), 2);
    assert_eq!(result.sub_trends()[0].trend_type(), TrendType::Increasing);
    assert_eq!(result.sub_trends()[1].trend_type(), TrendType::Decreasing);
    assert_eq!(result.sub_trends()[0].end(), 2005);
    // A symmetric rise and fall has no overall direction
    assert_eq!(result.global_trend().trend_type(), TrendType::None);
}

#[test]
fn test_triangle_with_divide_conquer() {
    let series = triangle_series(1.0);
    let analyzer = TrendAnalyzer::with_segmenter(DivideConquerSegmenter::new());
    let result = analyzer.analyze(&series).unwrap();
    println!("divide-conquer on triangle:\n{result}");

    assert_result_invariants(&series, &result);
    assert_eq!(result.breakpoints().len(), 1);
    assert!(
        (2005..=2007).contains(&result.breakpoints()[0]),
        "breakpoint {} far from the peak",
        result.breakpoints()[0]
    );
    assert_eq!(result.sub_trends()[0].trend_type(), TrendType::Increasing);
    assert_eq!(result.sub_trends()[1].trend_type(), TrendType::Decreasing);
}

#[test]
fn test_doubling_series_is_increasing() {
    let xs: Vec<i64> = (2000..=2009).collect();
    let ys: Vec<f64> = (0..10).map(|i| f64::powi(2.0, i)).collect();
    let series = Series::new(xs, ys).unwrap();

    let result = seeded_model_search().analyze(&series).unwrap();
    println!("doubling series:\n{result}");

    assert_result_invariants(&series, &result);
    assert_eq!(result.global_trend().trend_type(), TrendType::Increasing);
    assert!(
        result
            .sub_trends()
            .iter()
            .all(|t| t.trend_type() != TrendType::Decreasing),
        "a strictly growing series must have no decreasing interval"
    );
}

#[test]
fn test_flat_prefix_then_rise() {
    let xs: Vec<i64> = (2000..=2011).collect();
    let ys = vec![0.0, 0.0, 0.0, 0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0];
    let series = Series::new(xs, ys).unwrap();

    let result = seeded_model_search().analyze(&series).unwrap();
    println!("flat prefix then rise:\n{result}");

    assert_result_invariants(&series, &result);
    // The takeoff year is the only breakpoint: a flat interval, then growth
    assert_eq!(result.breakpoints(), &[2003]);
    assert_eq!(result.sub_trends()[0].trend_type(), TrendType::None);
    assert_eq!(result.sub_trends()[1].trend_type(), TrendType::Increasing);
    assert_eq!(result.global_trend().trend_type(), TrendType::Increasing);
}

#[test]
fn test_all_zero_series() {
    let series = Series::new((2000..=2002).collect(), vec![0.0, 0.0, 0.0]).unwrap();
    let result = seeded_model_search().analyze(&series).unwrap();

    assert_result_invariants(&series, &result);
    assert!(!result.has_breakpoints());
    assert_eq!(result.sub_trend_count(), 1);
    assert_eq!(result.global_trend().trend_type(), TrendType::None);
}

#[test]
fn test_two_point_series() {
    let series = Series::new(vec![2000, 2001], vec![1.0, 100.0]).unwrap();
    let result = seeded_model_search().analyze(&series).unwrap();

    assert_result_invariants(&series, &result);
    assert!(!result.has_breakpoints());
    assert_eq!(result.global_trend().trend_type(), TrendType::Increasing);
}

#[test]
fn test_scale_invariance() {
    let base = triangle_series(1.0);
    let scaled = triangle_series(1000.0);

    let base_result = seeded_model_search().analyze(&base).unwrap();
    let scaled_result = seeded_model_search().analyze(&scaled).unwrap();
    assert_eq!(base_result.breakpoints(), scaled_result.breakpoints());
    let base_types: Vec<_> = base_result.sub_trends().iter().map(|t| t.trend_type()).collect();
    let scaled_types: Vec<_> = scaled_result.sub_trends().iter().map(|t| t.trend_type()).collect();
    assert_eq!(base_types, scaled_types);

    let analyzer = TrendAnalyzer::with_segmenter(DivideConquerSegmenter::new());
    let base_result = analyzer.analyze(&base).unwrap();
    let scaled_result = analyzer.analyze(&scaled).unwrap();
    assert_eq!(base_result.breakpoints(), scaled_result.breakpoints());
}

#[test]
fn test_result_serialization_shape() {
    let series = triangle_series(1.0);
    let analyzer = TrendAnalyzer::with_segmenter(DivideConquerSegmenter::new());
    let result = analyzer.analyze(&series).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["breakpoints"].is_array());
    assert_eq!(json["global_trend"]["type"], "none");
    assert_eq!(json["sub_trends"][0]["type"], "increasing");
    assert_eq!(json["sub_trends"][0]["start"], 2000);

    let back: TrendResult = serde_json::from_value(json).unwrap();
    assert_eq!(&back, &result);
}
