//! Walk through the analysis pipeline on a few shapes of series
//!
//! Run with `RUST_LOG=debug` to watch the segmenters work.

use trend_analysis::TrendAnalyzer;
use trend_core::Series;
use trend_segment::{DivideConquerSegmenter, ModelSearchParameters, ModelSearchSegmenter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Trend Analysis Examples ===\n");

    // Publication counts for a topic that took off, peaked, and faded
    let years: Vec<i64> = (2000..=2015).collect();
    let counts = vec![
        2.0, 3.0, 5.0, 9.0, 18.0, 36.0, 70.0, 118.0, 160.0, 175.0, 168.0, 130.0, 95.0, 61.0,
        34.0, 19.0,
    ];
    let series = Series::new(years, counts)?;

    println!("1. Model search (default strategy)");
    let params = ModelSearchParameters {
        seed: Some(42),
        ..Default::default()
    };
    let analyzer = TrendAnalyzer::with_segmenter(ModelSearchSegmenter::with_params(params));
    let result = analyzer.analyze(&series)?;
    print!("{result}");
    println!();

    println!("2. Divide-and-conquer on the same series");
    let analyzer = TrendAnalyzer::with_segmenter(DivideConquerSegmenter::new());
    let result = analyzer.analyze(&series)?;
    print!("{result}");
    println!();

    println!("3. A series with nothing happening");
    let flat = Series::new((2000..=2006).collect(), vec![4.0; 7])?;
    let result = TrendAnalyzer::with_segmenter(DivideConquerSegmenter::new()).analyze(&flat)?;
    print!("{result}");
    println!();

    println!("4. Serialized for a downstream consumer");
    let json = serde_json::to_string_pretty(&analyzer.analyze(&series)?)?;
    println!("{json}");

    Ok(())
}
