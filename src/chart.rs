use plotters::prelude::*;
use std::error::Error;

use log::info;

use crate::parse::SeriesMap;

// 6.4in x 4.8in figure at 120 dpi.
const WIDTH: u32 = 768;
const HEIGHT: u32 = 576;

pub fn render(series: &SeriesMap, output_file: &str) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(output_file, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_max = series
        .values()
        .flatten()
        .map(|&(n, _)| n)
        .max()
        .unwrap_or(1);
    let y_max = series
        .values()
        .flatten()
        .map(|&(_, gflops)| gflops)
        .fold(0.0f64, f64::max)
        * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .caption("GEMM Benchmark (GFLOPs/s vs n)", ("sans-serif", 40).into_font())
        .margin(20)
        .x_label_area_size(35)
        .y_label_area_size(40)
        .build_cartesian_2d(0..x_max, 0f64..y_max.max(1.0))?;

    chart.configure_mesh().x_desc("n").y_desc("GFLOPs/s").draw()?;

    for (color_index, (algorithm, points)) in series.iter().enumerate() {
        let color = Palette99::pick(color_index).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), &color))?
            .label(algorithm)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        chart.draw_series(
            points
                .iter()
                .map(|&(n, gflops)| Circle::new((n, gflops), 3, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    info!("wrote chart to {}", output_file);
    Ok(())
}

#[test]
fn should_render_a_chart_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.png");

    let mut series = SeriesMap::new();
    series.insert(
        "native".to_string(),
        vec![(128, 1.0), (256, 2.0), (512, 4.0)],
    );
    series.insert(
        "eigen".to_string(),
        vec![(128, 3.0), (256, 5.0), (512, 7.0)],
    );

    render(&series, path.to_str().unwrap()).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn should_render_an_empty_series_map() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.png");

    render(&SeriesMap::new(), path.to_str().unwrap()).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
