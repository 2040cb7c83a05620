use crate::shared::date_utils::{iso_pair, month_bounds, previous_month_bounds, today};
use contracts::domain::common::lenient::parse_iso_date;
use leptos::prelude::*;
use thaw::*;

/// Two ISO date inputs plus month shortcuts. Every change reports the full `(from, to)` pair.
#[component]
pub fn DateRangePicker(
    #[prop(into)]
    date_from: Signal<String>,
    #[prop(into)]
    date_to: Signal<String>,
    on_change: Callback<(String, String)>,
    #[prop(optional, into)]
    label: Option<String>,
) -> impl IntoView {
    let current_month = move |_| on_change.run(iso_pair(month_bounds(today())));

    // steps back from the selected start, or from today when nothing is selected
    let previous_month = move |_| {
        let anchor = parse_iso_date(&date_from.get_untracked()).unwrap_or_else(today);
        on_change.run(iso_pair(previous_month_bounds(anchor)));
    };

    let clear = move |_| on_change.run((String::new(), String::new()));

    view! {
        <Flex vertical=true gap=FlexGap::Small>
            {label.map(|l| view! { <Label>{l}</Label> })}
            <Flex class="date-range-picker" align=FlexAlign::Center gap=FlexGap::Small>
                <input
                    type="date"
                    class="date-range-picker__input"
                    prop:value=date_from
                    on:input=move |ev| on_change.run((event_target_value(&ev), date_to.get_untracked()))
                />
                <span>"a"</span>
                <input
                    type="date"
                    class="date-range-picker__input"
                    prop:value=date_to
                    on:input=move |ev| on_change.run((date_from.get_untracked(), event_target_value(&ev)))
                />
                <ButtonGroup>
                    <Button size=ButtonSize::Small on_click=current_month>"Mês atual"</Button>
                    <Button size=ButtonSize::Small on_click=previous_month>"Mês anterior"</Button>
                    <Button size=ButtonSize::Small on_click=clear>"Limpar"</Button>
                </ButtonGroup>
            </Flex>
        </Flex>
    }
}
