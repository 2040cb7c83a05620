//! Inputs shared by the intake form and the edit modal

use crate::shared::components::form_field::FormField;
use crate::shared::data::ReferenceData;
use contracts::domain::a002_entry::EntryForm;
use contracts::domain::a004_color::Color;
use contracts::shared::format::format_money;
use contracts::shared::validation::FieldErrors;
use leptos::prelude::*;

/// `(code, label)` of the producers selectable for an entry: active ones,
/// plus the entry's current producer when it is no longer active
pub fn producer_options(reference: &ReferenceData, current_code: &str) -> Vec<(String, String)> {
    let mut options: Vec<(String, String)> = reference
        .active_producers()
        .into_iter()
        .map(|p| (p.code.clone(), p.display_label()))
        .collect();
    if !current_code.is_empty() && !options.iter().any(|(code, _)| code == current_code) {
        let label = reference
            .producers
            .iter()
            .find(|p| p.code == current_code)
            .map(|p| p.display_label())
            .unwrap_or_else(|| current_code.to_string());
        options.insert(0, (current_code.to_string(), label));
    }
    options
}

/// `(code, name)` of the color classes ordered by code; an unknown current
/// code stays selectable
pub fn color_options(colors: &[Color], current_code: &str) -> Vec<(String, String)> {
    let mut sorted: Vec<&Color> = colors.iter().collect();
    sorted.sort_by_key(|c| c.code);
    let mut options: Vec<(String, String)> = sorted
        .into_iter()
        .map(|c| (c.code.to_string(), c.name.clone()))
        .collect();
    let current = current_code.trim();
    if !current.is_empty() && !options.iter().any(|(code, _)| code == current) {
        options.push((current.to_string(), format!("Cor {}", current)));
    }
    options
}

fn field_error(errors: RwSignal<FieldErrors>, field: &'static str) -> Signal<Option<String>> {
    Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
}

#[allow(clippy::too_many_arguments)]
fn text_input(
    form: RwSignal<EntryForm>,
    errors: RwSignal<FieldErrors>,
    disabled: Signal<bool>,
    field: &'static str,
    label: &'static str,
    required: bool,
    input_type: &'static str,
    get: fn(&EntryForm) -> String,
    set: fn(&mut EntryForm, String),
) -> impl IntoView {
    view! {
        <FormField label=label error=field_error(errors, field) required=required>
            <input
                type=input_type
                id=field
                prop:value=move || form.with(get)
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                disabled=move || disabled.get()
            />
        </FormField>
    }
}

/// Decimal inputs accept `12,5` as well as `12.5`
#[allow(clippy::too_many_arguments)]
fn decimal_input(
    form: RwSignal<EntryForm>,
    errors: RwSignal<FieldErrors>,
    disabled: Signal<bool>,
    field: &'static str,
    label: &'static str,
    required: bool,
    get: fn(&EntryForm) -> String,
    set: fn(&mut EntryForm, String),
) -> impl IntoView {
    view! {
        <FormField label=label error=field_error(errors, field) required=required>
            <input
                type="text"
                inputmode="decimal"
                id=field
                prop:value=move || form.with(get)
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                disabled=move || disabled.get()
            />
        </FormField>
    }
}

#[component]
pub fn EntryFormFields(
    form: RwSignal<EntryForm>,
    errors: RwSignal<FieldErrors>,
    #[prop(into)]
    reference: Signal<ReferenceData>,
    #[prop(into)]
    disabled: Signal<bool>,
) -> impl IntoView {
    let on_producer_change = move |code: String| {
        reference.with_untracked(|r| {
            match r.producers.iter().find(|p| p.code == code) {
                Some(producer) => form.update(|f| f.select_producer(producer)),
                None => form.update(|f| {
                    f.producer_id = code;
                    f.producer_name.clear();
                }),
            }
        });
    };

    let live_total = move || match form.with(EntryForm::live_total) {
        Some(total) => format_money(total),
        None => "-".to_string(),
    };

    view! {
        <div class="details-form entry-form">
            <div class="form-row">
                {text_input(form, errors, disabled, "date", "Data", true, "date", |f| f.date.clone(), |f, v| f.date = v)}

                <FormField label="Produtor" error=field_error(errors, "producer_id") required=true>
                    <select
                        id="producer_id"
                        prop:value=move || form.with(|f| f.producer_id.clone())
                        on:change=move |ev| on_producer_change(event_target_value(&ev))
                        disabled=move || disabled.get()
                    >
                        <option value="">"Selecione o produtor..."</option>
                        {move || {
                            let current = form.with(|f| f.producer_id.clone());
                            reference
                                .with(|r| producer_options(r, &current))
                                .into_iter()
                                .map(|(code, label)| view! { <option value=code>{label}</option> })
                                .collect_view()
                        }}
                    </select>
                </FormField>
            </div>

            <div class="form-row form-row--muted">
                <div class="form-group">
                    <label>"Município"</label>
                    <input type="text" readonly=true prop:value=move || form.with(|f| f.municipality.clone()) />
                </div>
                <div class="form-group">
                    <label>"Comunidade"</label>
                    <input type="text" readonly=true prop:value=move || form.with(|f| f.community.clone()) />
                </div>
            </div>

            <div class="form-row">
                {decimal_input(form, errors, disabled, "gross_weight", "Peso bruto (kg)", true, |f| f.gross_weight.clone(), |f, v| {
                    f.gross_weight = v;
                    f.fill_net_weight();
                })}
                {decimal_input(form, errors, disabled, "tare", "Tara (kg)", false, |f| f.tare.clone(), |f, v| {
                    f.tare = v;
                    f.fill_net_weight();
                })}
                {decimal_input(form, errors, disabled, "net_weight", "Peso líquido (kg)", true, |f| f.net_weight.clone(), |f, v| f.net_weight = v)}
            </div>

            <div class="form-row">
                {decimal_input(form, errors, disabled, "unit_value", "Valor unitário (R$/kg)", true, |f| f.unit_value.clone(), |f, v| f.unit_value = v)}
                <div class="form-group">
                    <label>"Valor total"</label>
                    <div class="form-group__computed">{live_total}</div>
                </div>
            </div>

            <div class="form-row">
                <FormField label="Cor" error=field_error(errors, "color_code") required=true>
                    <select
                        id="color_code"
                        prop:value=move || form.with(|f| f.color_code.clone())
                        on:change=move |ev| form.update(|f| f.color_code = event_target_value(&ev))
                        disabled=move || disabled.get()
                    >
                        <option value="">"Selecione a cor..."</option>
                        {move || {
                            let current = form.with(|f| f.color_code.clone());
                            reference
                                .with(|r| color_options(&r.colors, &current))
                                .into_iter()
                                .map(|(code, name)| view! { <option value=code>{name}</option> })
                                .collect_view()
                        }}
                    </select>
                </FormField>
                {decimal_input(form, errors, disabled, "humidity", "Umidade (%)", false, |f| f.humidity.clone(), |f, v| f.humidity = v)}
            </div>

            <div class="form-row">
                {text_input(form, errors, disabled, "lot", "Lote", false, "text", |f| f.lot.clone(), |f, v| f.lot = v)}
                {text_input(form, errors, disabled, "contract", "Contrato", false, "text", |f| f.contract.clone(), |f, v| f.contract = v)}
                {text_input(form, errors, disabled, "invoice_number", "Nota fiscal", false, "text", |f| f.invoice_number.clone(), |f, v| f.invoice_number = v)}
            </div>

            {text_input(form, errors, disabled, "analysis_date", "Data da análise", false, "text", |f| f.analysis_date.clone(), |f, v| f.analysis_date = v)}

            <FormField label="Observações">
                <textarea
                    id="notes"
                    rows="2"
                    prop:value=move || form.with(|f| f.notes.clone())
                    on:input=move |ev| form.update(|f| f.notes = event_target_value(&ev))
                    disabled=move || disabled.get()
                />
            </FormField>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_producer::Producer;
    use serde_json::json;

    fn producer(id: i64, code: &str, name: &str, status: &str) -> Producer {
        serde_json::from_value(json!({
            "id": id,
            "codigo": code,
            "nome": name,
            "municipio": "Picos",
            "status": status
        }))
        .unwrap()
    }

    fn color(code: i32, name: &str) -> Color {
        Color {
            code,
            name: name.into(),
            hex: String::new(),
        }
    }

    #[test]
    fn test_producer_options_keep_inactive_current() {
        let reference = ReferenceData {
            producers: vec![
                producer(1, "P002", "Bia", "ativo"),
                producer(2, "P001", "Ana", "ativo"),
                producer(3, "P003", "Caio", "inativo"),
            ],
            ..Default::default()
        };

        let codes: Vec<String> = producer_options(&reference, "")
            .into_iter()
            .map(|(code, _)| code)
            .collect();
        assert_eq!(codes, vec!["P001", "P002"]);

        let options = producer_options(&reference, "P003");
        assert_eq!(options[0], ("P003".to_string(), "P003 - Caio".to_string()));
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn test_color_options_sorted_and_unknown_kept() {
        let colors = vec![color(3, "Âmbar"), color(1, "Branco")];
        let options = color_options(&colors, "9");
        assert_eq!(
            options,
            vec![
                ("1".to_string(), "Branco".to_string()),
                ("3".to_string(), "Âmbar".to_string()),
                ("9".to_string(), "Cor 9".to_string()),
            ]
        );
        assert_eq!(color_options(&colors, "3").len(), 2);
    }
}
