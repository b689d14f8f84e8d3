use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, RichText, ScrollArea, Sense, Shape, Stroke, Ui,
    vec2,
};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::analysis::Dashboard;
use crate::analysis::series::{AttritionSplit, DerivedSeries};
use crate::color::{attrition_color, gender_color, generate_palette};
use crate::data::model::{Education, YesNo};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 240.0;
const AGE_BIN_WIDTH: u32 = 5;
const DENSITY_SAMPLES: usize = 120;
/// Where the first pie slice starts, in degrees counter-clockwise from 3 o'clock.
const PIE_START_DEG: f32 = 140.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current selection in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let dashboard = match &state.dashboard {
        Some(d) => d,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open an HR dataset to begin  (File → Open…)");
            });
            return;
        }
    };

    ui.heading(dashboard.title());
    ui.separator();

    if dashboard.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new("No data for this department").italics());
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols: &mut [Ui]| {
                chart_card(&mut cols[0], "Attrition Counts", |ui| {
                    attrition_counts(ui, &dashboard.attrition_counts)
                });
                chart_card(&mut cols[1], "Attrition Rate by Total Working Years", |ui| {
                    tenure_line(ui, &dashboard.attrition_rate_by_tenure)
                });
            });
            ui.add_space(8.0);
            ui.columns(2, |cols: &mut [Ui]| {
                chart_card(&mut cols[0], "Gender Counts", |ui| {
                    gender_counts(ui, &dashboard.gender_counts)
                });
                chart_card(&mut cols[1], "Attrition Rate by Education", |ui| {
                    education_rates(ui, &dashboard.attrition_rate_by_education)
                });
            });
            ui.add_space(8.0);
            ui.columns(2, |cols: &mut [Ui]| {
                chart_card(&mut cols[0], "Age Distribution by Attrition", |ui| {
                    age_histogram(ui, &dashboard.age_distribution)
                });
                chart_card(&mut cols[1], "Overtime Effect on Attrition", |ui| {
                    overtime_effect(ui, &dashboard.overtime_effect)
                });
            });
            ui.add_space(8.0);
            ui.columns(2, |cols: &mut [Ui]| {
                chart_card(&mut cols[0], "Attrition by Education Field", |ui| {
                    education_field_pie(ui, dashboard.education_field_share.as_ref())
                });
                chart_card(&mut cols[1], "Attrition by Job Role", |ui| {
                    job_role_bars(ui, &dashboard.attrition_by_job_role)
                });
            });
            ui.add_space(8.0);
            chart_card(ui, "Job Roles", |ui| job_role_table(ui, dashboard));
        });
}

fn chart_card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    ui.group(|ui: &mut Ui| {
        ui.strong(title);
        add_contents(ui);
    });
}

// -- Axis helpers --

/// Axis formatter that prints `labels[i]` at integer position `i` and
/// nothing between categories.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let nearest = mark.value.round();
        if (mark.value - nearest).abs() > 1e-6 || nearest < 0.0 {
            return String::new();
        }
        labels.get(nearest as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn attrition_counts(ui: &mut Ui, counts: &DerivedSeries<YesNo, usize>) {
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (value, n))| {
            Bar::new(i as f64, *n as f64)
                .name(value.as_str())
                .fill(attrition_color(*value))
                .width(0.6)
        })
        .collect();
    let labels = counts.keys().map(ToString::to_string).collect();

    Plot::new("attrition_counts")
        .height(CHART_HEIGHT)
        .x_axis_label("Attrition")
        .y_axis_label("Count")
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Attrition"));
            for (i, (_, n)) in counts.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, *n as f64), format!(" {n}"))
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

fn tenure_line(ui: &mut Ui, rates: &DerivedSeries<u32, f64>) {
    let points: Vec<[f64; 2]> = rates
        .iter()
        .map(|(years, rate)| [*years as f64, *rate])
        .collect();

    Plot::new("attrition_by_tenure")
        .height(CHART_HEIGHT)
        .x_axis_label("Total Working Years")
        .y_axis_label("Average Attrition Rate")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(Color32::LIGHT_BLUE)
                    .radius(3.0),
            );
        });
}

fn gender_counts(ui: &mut Ui, counts: &DerivedSeries<String, usize>) {
    let n = counts.len();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (gender, count))| {
            Bar::new(i as f64, *count as f64)
                .name(gender)
                .fill(gender_color(i, n))
                .width(0.6)
        })
        .collect();
    let labels = counts.keys().cloned().collect();

    Plot::new("gender_counts")
        .height(CHART_HEIGHT)
        .x_axis_label("Gender")
        .y_axis_label("Count")
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Gender"));
            for (i, (_, count)) in counts.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, *count as f64), format!(" {count}"))
                        .anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

fn education_rates(ui: &mut Ui, rates: &DerivedSeries<Education, f64>) {
    let bars: Vec<Bar> = rates
        .iter()
        .enumerate()
        .map(|(i, (level, rate))| Bar::new(i as f64, *rate).name(level.label()).width(0.6))
        .collect();
    let labels = rates.keys().map(|level| level.label().to_string()).collect();

    Plot::new("attrition_by_education")
        .height(CHART_HEIGHT)
        .x_axis_label("Education Level")
        .y_axis_label("Attrition Rate (%)")
        .x_axis_formatter(category_axis(labels))
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(0x1f, 0x77, 0xb4)));
        });
}

fn age_histogram(ui: &mut Ui, ages: &DerivedSeries<YesNo, Vec<u32>>) {
    let groups: Vec<&[u32]> = ages.values().map(Vec::as_slice).collect();
    let bins = shared_bins(&groups, AGE_BIN_WIDTH);
    let width = AGE_BIN_WIDTH as f64;

    let mut charts: Vec<BarChart> = Vec::new();
    for (g, value) in ages.keys().enumerate() {
        let bars = bins
            .iter()
            .map(|(start, counts)| {
                Bar::new(*start as f64 + width / 2.0, counts[g] as f64).width(width)
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(value.as_str())
            .color(attrition_color(*value))
            .stack_on(&below);
        charts.push(chart);
    }

    // Density curves sit on count scale so they follow the bar heights.
    let curves: Vec<Line> = ages
        .iter()
        .map(|(value, group)| (value, density_curve(group, AGE_BIN_WIDTH, DENSITY_SAMPLES)))
        .filter(|(_, curve)| !curve.is_empty())
        .map(|(value, curve)| {
            Line::new(PlotPoints::from(curve))
                .color(attrition_color(*value))
                .width(2.0)
        })
        .collect();

    Plot::new("age_distribution")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Age")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
            for curve in curves {
                plot_ui.line(curve);
            }
        });
}

fn overtime_effect(ui: &mut Ui, matrix: &DerivedSeries<YesNo, AttritionSplit>) {
    let offsets = [(YesNo::No, -0.2), (YesNo::Yes, 0.2)];
    let labels = matrix.keys().map(ToString::to_string).collect();

    Plot::new("overtime_effect")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("OverTime")
        .y_axis_label("Count")
        .x_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            for (attrition, offset) in offsets {
                let bars = matrix
                    .iter()
                    .enumerate()
                    .map(|(i, (_, split))| {
                        let n = match attrition {
                            YesNo::No => split.no,
                            YesNo::Yes => split.yes,
                        };
                        Bar::new(i as f64 + offset, n as f64).width(0.4)
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(attrition.as_str())
                        .color(attrition_color(attrition)),
                );
            }
        });
}

fn job_role_bars(ui: &mut Ui, roles: &DerivedSeries<String, AttritionSplit>) {
    let stayed: Vec<Bar> = roles
        .iter()
        .enumerate()
        .map(|(i, (_, split))| Bar::new(i as f64, split.no as f64).width(0.7))
        .collect();
    let left: Vec<Bar> = roles
        .iter()
        .enumerate()
        .map(|(i, (_, split))| Bar::new(i as f64, split.yes as f64).width(0.7))
        .collect();

    let stayed = BarChart::new(stayed)
        .name(YesNo::No.as_str())
        .color(attrition_color(YesNo::No))
        .horizontal();
    let left = BarChart::new(left)
        .name(YesNo::Yes.as_str())
        .color(attrition_color(YesNo::Yes))
        .horizontal()
        .stack_on(&[&stayed]);
    let labels = roles.keys().cloned().collect();

    Plot::new("attrition_by_job_role")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Number of Employees")
        .y_axis_label("Job Role")
        .y_axis_formatter(category_axis(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(stayed);
            plot_ui.bar_chart(left);
        });
}

fn education_field_pie(ui: &mut Ui, share: Option<&DerivedSeries<String, usize>>) {
    let Some(share) = share else {
        ui.allocate_ui(vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No Data Available");
            });
        });
        return;
    };

    let colors = generate_palette(share.len());
    let total: usize = share.values().sum();

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(vec2(CHART_HEIGHT, CHART_HEIGHT), Sense::hover());
        let center = response.rect.center();
        let radius = CHART_HEIGHT * 0.45;
        let text_color = ui.visuals().strong_text_color();

        let mut labels = Vec::new();
        let mut angle = PIE_START_DEG.to_radians();
        for ((_, n), color) in share.iter().zip(&colors) {
            if *n == 0 {
                continue;
            }
            let sweep = *n as f32 / total as f32 * TAU;
            wedge(&painter, center, radius, angle, sweep, *color);

            let mid = angle + sweep / 2.0;
            let pos = center + radius * 0.85 * vec2(mid.cos(), -mid.sin());
            labels.push((pos, *n as f32 / total as f32 * 100.0));
            angle += sweep;
        }

        // Donut hole, then labels on the ring.
        painter.circle_filled(center, radius * 0.70, ui.visuals().panel_fill);
        for (pos, pct) in labels {
            painter.text(
                pos,
                Align2::CENTER_CENTER,
                format!("{pct:.1}%"),
                FontId::proportional(11.0),
                text_color,
            );
        }

        ui.vertical(|ui: &mut Ui| {
            for ((field, n), color) in share.iter().zip(&colors) {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(*color));
                    ui.label(format!("{field} ({n})"));
                });
            }
        });
    });
}

/// Fill a pie slice as a fan of small triangles so slices wider than half
/// the circle still tessellate as convex shapes.
fn wedge(painter: &Painter, center: Pos2, radius: f32, start: f32, sweep: f32, color: Color32) {
    let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
    let point = |a: f32| center + radius * vec2(a.cos(), -a.sin());
    for s in 0..steps {
        let a0 = start + sweep * s as f32 / steps as f32;
        let a1 = start + sweep * (s + 1) as f32 / steps as f32;
        painter.add(Shape::convex_polygon(
            vec![center, point(a1), point(a0)],
            color,
            Stroke::NONE,
        ));
    }
}

fn job_role_table(ui: &mut Ui, dashboard: &Dashboard) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(180.0))
        .columns(Column::auto().at_least(70.0), 4)
        .header(20.0, |mut header| {
            for title in ["Job Role", "Stayed", "Left", "Total", "Attrition %"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (role, split) in &dashboard.attrition_by_job_role {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(role);
                    });
                    for cell in [
                        split.no.to_string(),
                        split.yes.to_string(),
                        split.total().to_string(),
                        format!("{:.1}", split.yes_percent()),
                    ] {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram binning
// ---------------------------------------------------------------------------

/// Bin several groups of values on one shared grid of `width`-wide bins,
/// aligned to multiples of `width`. Returns `(bin_start, count per group)`.
pub fn shared_bins(groups: &[&[u32]], width: u32) -> Vec<(u32, Vec<usize>)> {
    let width = width.max(1);
    let all = groups.iter().flat_map(|g| g.iter().copied());
    let (Some(lo), Some(hi)) = (all.clone().min(), all.max()) else {
        return Vec::new();
    };
    let first = lo / width * width;
    let n_bins = ((hi - first) / width + 1) as usize;

    let mut bins: Vec<(u32, Vec<usize>)> = (0..n_bins)
        .map(|b| (first + b as u32 * width, vec![0; groups.len()]))
        .collect();
    for (g, values) in groups.iter().enumerate() {
        for v in values.iter() {
            let b = ((v - first) / width) as usize;
            bins[b].1[g] += 1;
        }
    }
    bins
}

/// Gaussian kernel density estimate of `values` with Silverman's
/// bandwidth, sampled at `samples` evenly spaced points from
/// `min - 3h` to `max + 3h`.
///
/// The density is multiplied by `values.len() * bin_width`, so the curve
/// lines up with a histogram of that bin width. Empty input gives no points.
pub fn density_curve(values: &[u32], bin_width: u32, samples: usize) -> Vec<[f64; 2]> {
    let mut sorted: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    sorted.sort_by(f64::total_cmp);
    let (Some(&lo), Some(&hi)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std_dev = if sorted.len() > 1 {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);
    let spread = match std_dev.min(iqr / 1.34) {
        s if s > 0.0 => s,
        _ if std_dev > 0.0 => std_dev,
        _ => 1.0,
    };
    let h = 0.9 * spread * n.powf(-0.2);

    let scale = bin_width.max(1) as f64 / (h * std::f64::consts::TAU.sqrt());
    let (start, end) = (lo - 3.0 * h, hi + 3.0 * h);
    let samples = samples.max(2);
    let step = (end - start) / (samples - 1) as f64;

    (0..samples)
        .map(|i| {
            let x = start + i as f64 * step;
            let sum: f64 = sorted
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum();
            [x, sum * scale]
        })
        .collect()
}

/// Linearly interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let below = pos.floor() as usize;
    let above = pos.ceil() as usize;
    sorted[below] + (sorted[above] - sorted[below]) * (pos - below as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_are_shared_across_groups() {
        let stayed: &[u32] = &[22, 23, 31];
        let left: &[u32] = &[29, 36];
        let bins = shared_bins(&[stayed, left], 5);

        assert_eq!(
            bins,
            vec![
                (20, vec![2, 0]),
                (25, vec![0, 1]),
                (30, vec![1, 0]),
                (35, vec![0, 1]),
            ]
        );
    }

    #[test]
    fn no_values_means_no_bins() {
        let empty: &[u32] = &[];
        assert!(shared_bins(&[empty, empty], 5).is_empty());
    }

    fn area(curve: &[[f64; 2]]) -> f64 {
        curve
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum()
    }

    #[test]
    fn density_area_matches_group_size() {
        let ages: &[u32] = &[22, 25, 28, 31, 31, 34, 38, 41, 45, 52, 58];
        let curve = density_curve(ages, 5, 200);

        let counted = area(&curve) / 5.0;
        assert!((counted - ages.len() as f64).abs() < 0.1, "{counted}");
        assert!(curve.first().unwrap()[0] < 22.0);
        assert!(curve.last().unwrap()[0] > 58.0);
    }

    #[test]
    fn density_of_identical_values_still_has_width() {
        let curve = density_curve(&[40, 40, 40], 5, 50);
        assert!(curve.iter().all(|[_, y]| y.is_finite()));
        assert!((area(&curve) / 5.0 - 3.0).abs() < 0.05);
    }

    #[test]
    fn empty_group_has_no_density() {
        assert!(density_curve(&[], 5, 100).is_empty());
    }

    #[test]
    fn category_axis_labels_only_integer_marks() {
        let fmt = category_axis(vec!["No".to_string(), "Yes".to_string()]);
        let mark = |value| GridMark { value, step_size: 0.5 };
        assert_eq!(fmt(mark(1.0), &(0.0..=1.0)), "Yes");
        assert_eq!(fmt(mark(0.5), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(4.0), &(0.0..=1.0)), "");
    }
}
