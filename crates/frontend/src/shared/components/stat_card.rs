use crate::shared::icons::icon;
use contracts::shared::indicators::{IndicatorStatus, ValueFormat};
use leptos::prelude::*;

/// Dashboard indicator: icon, label and a formatted value. `None` shows a dash.
#[component]
pub fn StatCard(
    #[prop(into)]
    label: String,
    /// Name for `icons::icon`
    #[prop(into)]
    icon_name: String,
    #[prop(into)]
    value: Signal<Option<f64>>,
    format: ValueFormat,
    #[prop(into, optional)]
    status: MaybeProp<IndicatorStatus>,
    #[prop(into, optional)]
    subtitle: MaybeProp<String>,
) -> impl IntoView {
    let status_class = move || match status.get().unwrap_or(IndicatorStatus::Neutral) {
        IndicatorStatus::Good => "stat-card stat-card--success",
        IndicatorStatus::Bad => "stat-card stat-card--error",
        IndicatorStatus::Warning => "stat-card stat-card--warning",
        IndicatorStatus::Neutral => "stat-card",
    };

    let formatted = move || match value.get() {
        Some(v) => format.format(v),
        None => "-".to_string(),
    };

    view! {
        <div class=status_class>
            <div class="stat-card__icon">{icon(&icon_name)}</div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{formatted}</div>
                {move || subtitle.get().map(|s| view! { <div class="stat-card__subtitle">{s}</div> })}
            </div>
        </div>
    }
}
