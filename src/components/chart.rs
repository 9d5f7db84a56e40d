//! Growth Chart Component
//!
//! Weight-for-age chart with WHO percentile reference lines, drawn on an
//! HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::growth::percentile::Band;
use crate::growth::series::{assemble, ChartData, Timeline};
use crate::state::global::GlobalState;

/// Line color for the measured weights
const MEASUREMENT_COLOR: &str = "rgb(0, 122, 51)";

fn band_color(band: Band) -> &'static str {
    match band {
        Band::P3 | Band::P97 => "rgba(255, 99, 132, 0.6)",
        Band::P15 | Band::P85 => "rgba(255, 159, 64, 0.6)",
        Band::P50 => "rgba(54, 162, 235, 0.7)",
    }
}

/// Growth chart with legend and timeline note
#[component]
pub fn GrowthChart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    let state_for_data = state.clone();
    let chart_data = create_memo(move |_| {
        let records = state_for_data.records.get();
        let birth_date = state_for_data.birth_date();
        let curve = state_for_data.curve.get();
        assemble(&records, birth_date, curve.as_ref())
    });

    // Redraw whenever the assembled series change
    create_effect(move |_| {
        let data = chart_data.get();
        if let Some(canvas) = canvas_ref.get() {
            draw_chart(&canvas, &data);
        }
    });

    view! {
        <div class="relative">
            <canvas
                node_ref=canvas_ref
                width="800"
                height="400"
                class="w-full h-64 md:h-96 rounded-lg"
            />

            <ChartLegend chart_data=chart_data />

            {move || {
                (chart_data.get().timeline == Timeline::Relative
                    && !chart_data.get().is_empty())
                .then(|| view! {
                    <p class="text-sm text-gray-400 mt-2">
                        "No birth date on file - the axis shows months since the first record, \
                         so reference curves are hidden."
                    </p>
                })
            }}
        </div>
    }
}

/// Legend showing the measurement series and any reference bands
#[component]
fn ChartLegend(chart_data: Memo<ChartData>) -> impl IntoView {
    view! {
        <div class="flex justify-center flex-wrap gap-4 mt-4">
            <LegendEntry color=MEASUREMENT_COLOR label="Weight" />
            {move || {
                chart_data.get()
                    .bands
                    .iter()
                    .map(|series| {
                        view! {
                            <LegendEntry
                                color=band_color(series.band)
                                label=series.band.label()
                            />
                        }
                    })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}

#[component]
fn LegendEntry(color: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <div class="flex items-center space-x-2">
            <div
                class="w-3 h-3 rounded-full"
                style=format!("background-color: {}", color)
            />
            <span class="text-sm text-gray-300">{label}</span>
        </div>
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement, data: &ChartData) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    // Margins
    let margin_left = 60.0;
    let margin_right = 20.0;
    let margin_top = 20.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    // Clear canvas
    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, width, height);

    if data.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text(
            "No records yet - add the first measurement",
            width / 2.0 - 130.0,
            height / 2.0,
        );
        return;
    }

    // Domains cover measurements and reference lines together
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for point in &data.measurements {
        x_min = x_min.min(point.age_months);
        x_max = x_max.max(point.age_months);
        y_min = y_min.min(point.weight_kg);
        y_max = y_max.max(point.weight_kg);
    }
    for series in &data.bands {
        for (age, value) in &series.points {
            x_min = x_min.min(*age);
            x_max = x_max.max(*age);
            y_min = y_min.min(*value);
            y_max = y_max.max(*value);
        }
    }

    if x_max - x_min < 1.0 {
        x_min -= 0.5;
        x_max += 0.5;
    }

    let y_range = y_max - y_min;
    let y_padding = if y_range > 0.0 { y_range * 0.1 } else { 1.0 };
    y_min -= y_padding;
    y_max += y_padding;

    let to_x = |age: f64| margin_left + (age - x_min) / (x_max - x_min) * chart_width;
    let to_y = |value: f64| margin_top + (y_max - value) / (y_max - y_min) * chart_height;

    // Draw grid lines
    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);

    // Horizontal grid lines (5 lines) with kg labels
    for i in 0..=5 {
        let y = margin_top + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = y_max - (i as f64 / 5.0) * (y_max - y_min);
        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        ctx.set_font("12px sans-serif");
        let _ = ctx.fill_text(&format!("{:.1}", value), 5.0, y + 4.0);
    }

    // X-axis labels in months
    ctx.set_fill_style(&"#9ca3af".into());
    ctx.set_font("12px sans-serif");

    let num_labels = 6;
    for i in 0..=num_labels {
        let age = x_min + (i as f64 / num_labels as f64) * (x_max - x_min);
        let x = to_x(age);
        let _ = ctx.fill_text(&format!("{:.1}", age), x - 10.0, height - 22.0);
    }

    let axis_label = match data.timeline {
        Timeline::Age => "Age (months)",
        Timeline::Relative => "Months since first record",
    };
    let _ = ctx.fill_text(axis_label, margin_left + chart_width / 2.0 - 50.0, height - 6.0);
    let _ = ctx.fill_text("kg", 5.0, margin_top - 6.0);

    // Percentile reference lines, median drawn solid
    for series in &data.bands {
        if series.points.is_empty() {
            continue;
        }

        ctx.set_stroke_style(&band_color(series.band).into());
        if series.band == Band::P50 {
            ctx.set_line_width(2.0);
            let _ = ctx.set_line_dash(&js_sys::Array::new());
        } else {
            ctx.set_line_width(1.5);
            let _ = ctx.set_line_dash(&js_sys::Array::of2(&5.0.into(), &5.0.into()));
        }

        ctx.begin_path();
        for (i, (age, value)) in series.points.iter().enumerate() {
            let x = to_x(*age);
            let y = to_y(*value);
            if i == 0 {
                ctx.move_to(x, y);
            } else {
                ctx.line_to(x, y);
            }
        }
        ctx.stroke();
    }
    let _ = ctx.set_line_dash(&js_sys::Array::new());

    // Measured weights on top
    ctx.set_stroke_style(&MEASUREMENT_COLOR.into());
    ctx.set_line_width(3.0);
    ctx.begin_path();
    for (i, point) in data.measurements.iter().enumerate() {
        let x = to_x(point.age_months);
        let y = to_y(point.weight_kg);
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&MEASUREMENT_COLOR.into());
    for point in &data.measurements {
        let x = to_x(point.age_months);
        let y = to_y(point.weight_kg);

        ctx.begin_path();
        let _ = ctx.arc(x, y, 4.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }
}
