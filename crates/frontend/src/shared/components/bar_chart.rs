//! Horizontal bar chart drawn with plain divs

use contracts::dashboards::d400_production_report::aggregation::ChartPoint;
use contracts::domain::a004_color::aggregate::FALLBACK_HEX;
use contracts::shared::format::format_weight;
use leptos::prelude::*;

/// Bar length of each point as a percentage of the largest value
pub fn bar_percentages(points: &[ChartPoint]) -> Vec<f64> {
    let max = points
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    points
        .iter()
        .map(|p| {
            if max > 0.0 && p.value.is_finite() && p.value > 0.0 {
                p.value / max * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

#[component]
pub fn BarChart(
    #[prop(into)]
    points: Signal<Vec<ChartPoint>>,
    #[prop(optional, into)]
    title: Option<String>,
) -> impl IntoView {
    let bars = move || {
        let points = points.get();
        let widths = bar_percentages(&points);
        points
            .into_iter()
            .zip(widths)
            .map(|(point, width)| {
                let color = point.color.unwrap_or_else(|| FALLBACK_HEX.to_string());
                let style = format!("width: {:.2}%; background: {};", width, color);
                view! {
                    <div class="bar-chart__row">
                        <div class="bar-chart__label" title=point.label.clone()>{point.label.clone()}</div>
                        <div class="bar-chart__track">
                            <div class="bar-chart__bar" style=style></div>
                        </div>
                        <div class="bar-chart__value">{format_weight(point.value)}</div>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <div class="bar-chart">
            {title.map(|t| view! { <h3 class="bar-chart__title">{t}</h3> })}
            {bars}
        </div>
    }
}
