use super::view_model::{community_options, municipality_options, ProducerDetailsViewModel};
use crate::shared::components::form_field::FormField;
use crate::shared::icons::icon;
use crate::shared::state::LoadState;
use contracts::domain::a001_producer::{ProducerForm, ProducerStatus};
use leptos::prelude::*;
use thaw::*;

fn text_field(
    vm: ProducerDetailsViewModel,
    field: &'static str,
    label: &'static str,
    required: bool,
    input_type: &'static str,
    get: fn(&ProducerForm) -> String,
    set: fn(&mut ProducerForm, String),
) -> impl IntoView {
    view! {
        <FormField label=label error=vm.field_error(field) required=required>
            <input
                type=input_type
                id=field
                prop:value=move || vm.form.with(get)
                on:input=move |ev| vm.form.update(|f| set(f, event_target_value(&ev)))
                disabled=move || vm.is_busy()
            />
        </FormField>
    }
}

#[component]
pub fn ProducerDetails(
    id: Option<i64>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = ProducerDetailsViewModel::new(id);
    vm.load();

    view! {
        <div class="details-container producer-details">
            <div class="details-header">
                <h3>
                    {move || {
                        if !vm.is_edit_mode() {
                            "Novo produtor".to_string()
                        } else {
                            vm.original.with(|p| match p {
                                Some(p) => format!("Produtor: {}", p.display_label()),
                                None => "Produtor".to_string(),
                            })
                        }
                    }}
                </h3>
            </div>

            {move || vm.load_state.with(|s| s.error().map(|e| view! {
                <div class="alert alert--error">
                    <span>{e.to_string()}</span>
                    <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small on_click=move |_| vm.load()>
                        {icon("refresh")}
                        " Tentar novamente"
                    </Button>
                </div>
            }))}

            <div class="details-form">
                <div class="form-row">
                    {text_field(vm, "code", "Código", true, "text", |f| f.code.clone(), |f, v| f.code = v)}
                    {text_field(vm, "name", "Nome", true, "text", |f| f.name.clone(), |f, v| f.name = v)}
                </div>

                <div class="form-row">
                    {text_field(vm, "cpf", "CPF", true, "text", |f| f.cpf.clone(), |f, v| f.cpf = v)}
                    {text_field(
                        vm,
                        "affiliation_date",
                        "Data de filiação",
                        false,
                        "date",
                        |f| f.affiliation_date.clone(),
                        |f, v| f.affiliation_date = v,
                    )}
                </div>

                <div class="form-row">
                    <FormField label="Município" error=vm.field_error("municipality") required=true>
                        <select
                            id="municipality"
                            prop:value=move || vm.form.with(|f| f.municipality.clone())
                            on:change=move |ev| vm.set_municipality(event_target_value(&ev))
                            disabled=move || vm.is_busy()
                        >
                            <option value="">"Selecione..."</option>
                            {move || {
                                let current = vm.form.with(|f| f.municipality.clone());
                                vm.reference
                                    .with(|r| municipality_options(r, &current))
                                    .into_iter()
                                    .map(|name| {
                                        let value = name.clone();
                                        view! { <option value=value>{name}</option> }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </FormField>

                    <FormField label="Comunidade">
                        <select
                            id="community"
                            prop:value=move || vm.form.with(|f| f.community.clone())
                            on:change=move |ev| vm.form.update(|f| f.community = event_target_value(&ev))
                            disabled=move || vm.is_busy()
                        >
                            <option value="">"Sem comunidade"</option>
                            {move || {
                                let municipality = vm.form.with(|f| f.municipality.clone());
                                vm.reference
                                    .with(|r| community_options(r, &municipality))
                                    .into_iter()
                                    .map(|name| {
                                        let value = name.clone();
                                        view! { <option value=value>{name}</option> }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </FormField>
                </div>

                <div class="form-row">
                    <FormField label="Situação">
                        <select
                            id="status"
                            prop:value=move || vm.form.with(|f| f.status.as_str())
                            on:change=move |ev| {
                                let status = ProducerStatus::from_str_or_default(&event_target_value(&ev));
                                vm.form.update(|f| f.status = status);
                            }
                            disabled=move || vm.is_busy()
                        >
                            {ProducerStatus::ALL
                                .iter()
                                .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                                .collect_view()}
                        </select>
                    </FormField>
                    {text_field(
                        vm,
                        "hive_count",
                        "Número de colmeias",
                        false,
                        "number",
                        |f| f.hive_count.clone(),
                        |f, v| f.hive_count = v,
                    )}
                </div>

                <div class="form-row">
                    {text_field(vm, "phone", "Telefone", false, "tel", |f| f.phone.clone(), |f, v| f.phone = v)}
                    {text_field(vm, "email", "E-mail", false, "email", |f| f.email.clone(), |f, v| f.email = v)}
                </div>

                {text_field(
                    vm,
                    "certifications",
                    "Certificações (separadas por vírgula)",
                    false,
                    "text",
                    |f| f.certifications.clone(),
                    |f, v| f.certifications = v,
                )}

                <FormField label="Observações">
                    <textarea
                        id="notes"
                        rows="3"
                        prop:value=move || vm.form.with(|f| f.notes.clone())
                        on:input=move |ev| vm.form.update(|f| f.notes = event_target_value(&ev))
                        disabled=move || vm.is_busy()
                    />
                </FormField>
            </div>

            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save_command(on_saved)
                    disabled=Signal::derive(move || !vm.can_save())
                >
                    {icon("save")}
                    {move || if vm.save_state.with(LoadState::is_loading) { " Salvando..." } else { " Salvar" }}
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Cancelar"
                </Button>
            </div>
        </div>
    }
}
