//! Pareto chart of the standardized sensitivities

use color_eyre::eyre::eyre;
use dgsa_core::SensitivityReport;
use plotters::prelude::*;

/// Default chart size in pixels
pub const DEFAULT_SIZE: (u32, u32) = (900, 500);

const BAR_HALF_HEIGHT: f64 = 0.35;
const WHISKER_HALF_HEIGHT: f64 = 0.12;

/// Render the ranked sensitivities as horizontal bars, most sensitive on top.
///
/// Sensitive parameters are drawn red, the rest blue. Confidence half-widths
/// become error bars and the significance threshold of 1 a vertical line.
pub fn render_pareto_svg(
    report: &SensitivityReport,
    size: (u32, u32),
) -> color_eyre::Result<String> {
    let ranked = report.ranked();
    if ranked.is_empty() {
        return Err(eyre!("Cannot chart an empty sensitivity report"));
    }

    let n = ranked.len();
    // Bar for rank r sits at y = n - 1 - r
    let names: Vec<String> = ranked.iter().rev().map(|e| e.name.clone()).collect();
    let x_max = ranked
        .iter()
        .map(|e| e.sensitivity + e.confidence.unwrap_or(0.0))
        .filter(|v| v.is_finite())
        .fold(1.0f64, f64::max)
        * 1.1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;

        let caption = format!(
            "DGSA sensitivities ({} over {} clusters)",
            report.output_mode().label(),
            report.n_clusters()
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(0.0..x_max, -0.5..(n as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("standardized sensitivity")
            .y_labels(n)
            .y_label_formatter(&|y| {
                let position = y.round();
                if (y - position).abs() > 1e-6 || position < 0.0 {
                    return String::new();
                }
                names.get(position as usize).cloned().unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(ranked.iter().enumerate().map(|(rank, entry)| {
            let y = (n - 1 - rank) as f64;
            let color = if entry.is_sensitive() { RED } else { BLUE };
            Rectangle::new(
                [
                    (0.0, y - BAR_HALF_HEIGHT),
                    (entry.sensitivity.max(0.0), y + BAR_HALF_HEIGHT),
                ],
                color.mix(0.7).filled(),
            )
        }))?;

        for (rank, entry) in ranked.iter().enumerate() {
            let Some(half_width) = entry.confidence else {
                continue;
            };
            let y = (n - 1 - rank) as f64;
            let lo = (entry.sensitivity - half_width).max(0.0);
            let hi = entry.sensitivity + half_width;
            chart.draw_series([
                PathElement::new(vec![(lo, y), (hi, y)], BLACK),
                PathElement::new(
                    vec![(lo, y - WHISKER_HALF_HEIGHT), (lo, y + WHISKER_HALF_HEIGHT)],
                    BLACK,
                ),
                PathElement::new(
                    vec![(hi, y - WHISKER_HALF_HEIGHT), (hi, y + WHISKER_HALF_HEIGHT)],
                    BLACK,
                ),
            ])?;
        }

        chart.draw_series(std::iter::once(PathElement::new(
            vec![(1.0, -0.5), (1.0, n as f64 - 0.5)],
            BLACK.mix(0.6),
        )))?;

        root.present()?;
    }

    Ok(svg)
}
