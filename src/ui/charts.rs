use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

use crate::color::TypeColorMap;
use crate::data::model::type_short;
use crate::data::summary::Summary;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 220.0;
const BAR_COLOR: Color32 = Color32::from_rgb(0x2e, 0x8b, 0x6e);

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// The four dashboard charts in a 2×2 grid.
pub fn charts_grid(ui: &mut Ui, state: &AppState) {
    let summary = &state.summary;
    ui.columns(2, |cols| {
        chart_frame(&mut cols[0], "Registrations by model year", state.loading, |ui| {
            vehicles_by_year(ui, summary);
        });
        chart_frame(&mut cols[1], "Top makes", state.loading, |ui| {
            top_makes(ui, summary);
        });
    });
    ui.columns(2, |cols| {
        chart_frame(&mut cols[0], "Vehicle types", state.loading, |ui| {
            type_breakdown(ui, summary, &state.type_colors);
        });
        chart_frame(&mut cols[1], "Electric range (mi)", state.loading, |ui| {
            range_histogram(ui, summary);
        });
    });
}

fn chart_frame(ui: &mut Ui, title: &str, loading: bool, add_chart: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).strong());
        if loading {
            ui.add_space(CHART_HEIGHT / 2.0 - 12.0);
            ui.vertical_centered(|ui: &mut Ui| {
                ui.spinner();
            });
            ui.add_space(CHART_HEIGHT / 2.0 - 12.0);
        } else {
            add_chart(ui);
        }
    });
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn vehicles_by_year(ui: &mut Ui, summary: &Summary) {
    let bars: Vec<Bar> = summary
        .by_year
        .iter()
        .map(|y| {
            Bar::new(f64::from(y.year), y.count as f64)
                .width(0.7)
                .name(y.year.to_string())
        })
        .collect();

    Plot::new("by_year")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(|mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            // Years only; suppress fractional grid marks.
            if mark.value.fract() == 0.0 {
                format!("{}", mark.value as i64)
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

fn top_makes(ui: &mut Ui, summary: &Summary) {
    // Highest count at the top: bar at position p shows make n-1-p.
    let n = summary.top_makes.len();
    let labels: Vec<String> = summary
        .top_makes
        .iter()
        .rev()
        .map(|m| m.make.clone())
        .collect();
    let bars: Vec<Bar> = summary
        .top_makes
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Bar::new((n - 1 - i) as f64, m.count as f64)
                .width(0.6)
                .name(&m.make)
        })
        .collect();

    Plot::new("top_makes")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            index_label(&labels, mark)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).horizontal());
        });
}

fn type_breakdown(ui: &mut Ui, summary: &Summary, colors: &TypeColorMap) {
    let n = summary.by_type.len();
    let labels: Vec<String> = summary
        .by_type
        .iter()
        .rev()
        .map(|t| type_short(&t.type_name))
        .collect();

    Plot::new("by_type")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            index_label(&labels, mark)
        })
        .show(ui, |plot_ui| {
            // One chart per type so each gets its own colour and legend row.
            for (i, t) in summary.by_type.iter().enumerate() {
                let bar = Bar::new((n - 1 - i) as f64, t.count as f64).width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .color(colors.color_for(&t.type_name))
                        .name(&t.type_name)
                        .horizontal(),
                );
            }
        });
}

fn range_histogram(ui: &mut Ui, summary: &Summary) {
    let labels: Vec<String> = summary
        .range_buckets
        .iter()
        .map(|b| b.label.clone())
        .collect();
    let bars: Vec<Bar> = summary
        .range_buckets
        .iter()
        .enumerate()
        .map(|(i, b)| Bar::new(i as f64, b.count as f64).width(0.8).name(&b.label))
        .collect();

    Plot::new("range_histogram")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            index_label(&labels, mark)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

/// Map an integer grid mark to its category label, hiding fractional marks.
fn index_label(labels: &[String], mark: GridMark) -> String {
    let idx = mark.value.round();
    if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .cloned()
        .unwrap_or_default()
}
