use super::series::{ChartKind, ChartSpec};
use anyhow::Result;
use plotters::prelude::*;

pub const CHART_SIZE: (u32, u32) = (1024, 576);

/// Draws a chart spec as an SVG document.
pub fn render_svg(spec: &ChartSpec, size: (u32, u32)) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;

        let n = spec.points.len().max(1);
        let y_max = spec.points.iter().map(|p| p.y).fold(0.0_f64, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)?;

        let label_of = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => spec
                .points
                .get(*i)
                .map(|p| p.x.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(&spec.x_title)
            .y_desc(&spec.y_title)
            .x_label_formatter(&label_of)
            .draw()?;

        match spec.kind {
            ChartKind::Line => {
                chart.draw_series(LineSeries::new(
                    spec.points
                        .iter()
                        .enumerate()
                        .map(|(i, p)| (SegmentValue::CenterOf(i), p.y)),
                    &BLUE,
                ))?;
            }
            ChartKind::Bar => {
                chart.draw_series(spec.points.iter().enumerate().map(|(i, p)| {
                    Rectangle::new(
                        [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), p.y)],
                        BLUE.filled(),
                    )
                }))?;
            }
        }

        root.present()?;
    }
    Ok(svg)
}
