//! Four-panel PNG rendering of a load test run.

use crate::metrics;
use crate::model::{DerivedSeries, MetricSeries};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::full_palette::{ORANGE, PURPLE};
use std::ops::Range;
use std::path::Path;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

const IMAGE_SIZE: (u32, u32) = (2400, 1800);

/// Percentile reference lines need more than this many duration samples.
const MIN_SAMPLES_FOR_PERCENTILES: usize = 10;

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Shared x axis: seconds since the first timestamp.
struct TimeAxis {
    start: Option<OffsetDateTime>,
    xs: Vec<f64>,
    range: Range<f64>,
}

impl TimeAxis {
    fn new(series: &MetricSeries) -> Self {
        let xs = series.elapsed_secs();
        // Records are only roughly time-ordered; span the full extent.
        let lo = xs.iter().copied().reduce(f64::min).unwrap_or(0.0);
        let hi = xs.iter().copied().reduce(f64::max).unwrap_or(0.0);
        let range = if hi > lo { lo..hi } else { lo..lo + 1.0 };
        Self {
            start: series.timestamps.first().copied(),
            xs,
            range,
        }
    }

    fn label(&self, x: &f64) -> String {
        let Some(start) = self.start else {
            return String::new();
        };
        let at = start + Duration::seconds_f64(*x);
        at.format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_default()
    }

    fn points<'v>(&'v self, ys: &'v [f64]) -> impl Iterator<Item = (f64, f64)> + Clone + 'v {
        self.xs.iter().copied().zip(ys.iter().copied())
    }
}

/// y range covering `values` with some headroom; never inverted or empty.
fn y_range(values: &[f64], floor_at_zero: bool) -> Range<f64> {
    let hi = metrics::max(values).unwrap_or(0.0);
    let lo = if floor_at_zero {
        0.0
    } else {
        values.iter().copied().fold(0.0, f64::min)
    };
    let top = if hi > lo { hi + (hi - lo) * 0.1 } else { lo + 1.0 };
    lo..top
}

/// Render the chart for `series`/`derived` into `path`.
pub fn render(
    path: &Path,
    test_name: &str,
    series: &MetricSeries,
    derived: &DerivedSeries,
) -> Result<()> {
    let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        &format!("k6 Load Test Results - {test_name}"),
        ("sans-serif", 40),
    )?;

    let axis = TimeAxis::new(series);
    let panels = root.split_evenly((2, 2));

    draw_line_panel(
        &panels[0],
        &axis,
        "Requests Per Second (RPS)",
        "RPS",
        &derived.rps,
        BLUE,
        false,
    )
    .context("draw RPS panel")?;
    draw_response_time_panel(&panels[1], &axis, series).context("draw response time panel")?;
    draw_line_panel(
        &panels[2],
        &axis,
        "Error Rate (%)",
        "Error %",
        &derived.error_rate,
        RED,
        true,
    )
    .context("draw error rate panel")?;
    draw_vus_panel(&panels[3], &axis, &series.vus.values).context("draw VU panel")?;

    root.present()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn draw_line_panel(
    area: &Panel<'_>,
    axis: &TimeAxis,
    title: &str,
    y_desc: &str,
    ys: &[f64],
    color: RGBColor,
    floor_at_zero: bool,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(axis.range.clone(), y_range(ys, floor_at_zero))?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .x_desc("Time")
        .y_desc(y_desc)
        .x_label_formatter(&|x| axis.label(x))
        .draw()?;

    chart.draw_series(LineSeries::new(
        axis.points(ys),
        color.mix(0.7).stroke_width(2),
    ))?;
    Ok(())
}

fn draw_response_time_panel(
    area: &Panel<'_>,
    axis: &TimeAxis,
    series: &MetricSeries,
) -> Result<()> {
    let durations = &series.http_req_durations.values;
    let samples = &series.http_req_durations.samples;
    let mut chart = ChartBuilder::on(area)
        .caption("Response Time (ms)", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(axis.range.clone(), y_range(durations, false))?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .x_desc("Time")
        .y_desc("Milliseconds")
        .x_label_formatter(&|x| axis.label(x))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            axis.points(durations),
            GREEN.mix(0.7).stroke_width(2),
        ))?
        .label("Response Time")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    if samples.len() > MIN_SAMPLES_FOR_PERCENTILES {
        let Range { start: x_start, end: x_end } = axis.range.clone();
        for (p, color) in [(95.0, ORANGE), (99.0, RED)] {
            let Some(value) = metrics::percentile(samples, p) else {
                continue;
            };
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(x_start, value), (x_end, value)],
                    10,
                    6,
                    color.mix(0.7).stroke_width(2),
                ))?
                .label(format!("P{p:.0} ≈ {value:.0}ms"))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_vus_panel(area: &Panel<'_>, axis: &TimeAxis, vus: &[f64]) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption("Virtual Users (VUs)", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(axis.range.clone(), y_range(vus, true))?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .x_desc("Time")
        .y_desc("VUs")
        .x_label_formatter(&|x| axis.label(x))
        .draw()?;

    chart.draw_series(
        AreaSeries::new(axis.points(vus), 0.0, PURPLE.mix(0.2))
            .border_style(PURPLE.mix(0.7).stroke_width(3)),
    )?;
    Ok(())
}
