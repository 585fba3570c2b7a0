//! Final reporting: console summary and the latency-vs-length chart.
//!
//! Pure rendering. The averages arrive fully computed and are plotted and
//! printed as-is, never re-derived or rounded here.

use std::path::Path;

use plotters::prelude::*;

use crate::bench::{BenchError, BenchmarkResult};

const CHART_SIZE: (u32, u32) = (1000, 600);

/// Dump both aligned series to the console.
pub fn print_summary(result: &BenchmarkResult) {
    println!("Lengths (seconds): {:?}", result.lengths);
    println!("Average Durations (seconds): {:?}", result.average_durations);
}

/// Render the latency-vs-length chart to `path`.
pub fn render_chart(
    result: &BenchmarkResult,
    reps_per_length: u32,
    path: &Path,
) -> Result<(), BenchError> {
    draw(result, reps_per_length, path).map_err(|source| BenchError::Render {
        path: path.to_path_buf(),
        source,
    })
}

fn draw(
    result: &BenchmarkResult,
    reps_per_length: u32,
    path: &Path,
) -> Result<(), crate::BoxError> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    // lengths is ascending, so the last entry spans the x axis.
    let x_max = result.lengths.last().copied().unwrap_or(0.0);
    let y_max = result
        .average_durations
        .iter()
        .copied()
        .fold(0.0_f64, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "Average Transcription Time vs Audio Length ({reps_per_length} reps per length)"
            ),
            ("sans-serif", 24),
        )
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..(x_max * 1.05).max(1.0), 0.0..(y_max * 1.1).max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Audio Length (seconds)")
        .y_desc("Average Transcription Time (seconds)")
        .draw()?;

    let points: Vec<(f64, f64)> = result
        .lengths
        .iter()
        .copied()
        .zip(result.average_durations.iter().copied())
        .collect();

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}
