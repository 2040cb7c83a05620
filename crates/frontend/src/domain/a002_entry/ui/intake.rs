//! Honey intake: one delivery per submit. The form stays open and is cleared
//! for the next delivery, keeping the date.

use super::form_fields::EntryFormFields;
use crate::shared::browser::alert;
use crate::shared::data::services::register_entry;
use crate::shared::data::{use_repository, ReferenceData, SaveError};
use crate::shared::date_utils::today_iso;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::shared::state::{use_shared_tables, LoadState, LoadStateSignal};
use contracts::domain::a002_entry::EntryForm;
use contracts::shared::format::{format_money, format_weight};
use contracts::shared::validation::FieldErrors;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn EntryIntakeForm(on_close: Callback<()>) -> impl IntoView {
    let repo = use_repository();
    let tables = use_shared_tables();
    let form = RwSignal::new(EntryForm::new_for_date(&today_iso()));
    let errors = RwSignal::new(FieldErrors::new());
    let reference = RwSignal::new(ReferenceData::default());
    let load_state = RwSignal::new(LoadState::Idle);
    let save_state = RwSignal::new(LoadState::Idle);
    let (last_saved, set_last_saved) = signal::<Option<String>>(None);

    let load_reference = {
        let repo = repo.clone();
        move || {
            if !load_state.try_begin() {
                return;
            }
            let repo = repo.clone();
            spawn_local(async move {
                match ReferenceData::load(repo.as_ref()).await {
                    Ok(data) => {
                        reference.set(data);
                        load_state.succeed();
                    }
                    Err(e) => load_state.fail(format!("Não foi possível carregar os cadastros: {}", e)),
                }
            });
        }
    };
    load_reference();

    let busy = Signal::derive(move || {
        load_state.with(LoadState::is_loading) || save_state.with(LoadState::is_loading)
    });

    let submit = move |_| {
        let current = form.get_untracked();
        let row = match current.validate() {
            Ok(row) => row,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::new());
        if !save_state.try_begin() {
            return;
        }
        let repo = repo.clone();
        spawn_local(async move {
            match register_entry(repo.as_ref(), &current).await {
                Ok(entries) => {
                    tables.entries.set(entries);
                    save_state.succeed();
                    set_last_saved.set(Some(format!(
                        "Entrada registrada: {} · {} · {}",
                        row.producer_name,
                        format_weight(row.net_weight),
                        format_money(row.total_value)
                    )));
                    form.set(EntryForm::new_for_date(&current.date));
                }
                Err(SaveError::Invalid(field_errors)) => {
                    errors.set(field_errors);
                    save_state.fail("Corrija os campos destacados".to_string());
                }
                Err(SaveError::Data(e)) => {
                    log::error!("entry insert failed: {}", e);
                    save_state.fail(e.to_string());
                    alert(&format!("Erro ao registrar entrada: {}", e));
                }
            }
        });
    };

    let retry = load_reference.clone();

    view! {
        <PageFrame page_id="a002_entry--intake" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Registrar entrada de mel"</h1>
                </div>
            </div>

            <div class="page__content">
                {move || load_state.with(|s| s.error().map(|e| {
                    let retry = retry.clone();
                    view! {
                        <div class="alert alert--error">
                            <span>{e.to_string()}</span>
                            <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small on_click=move |_| retry()>
                                {icon("refresh")}
                                " Tentar novamente"
                            </Button>
                        </div>
                    }
                }))}
                {move || last_saved.get().map(|message| view! { <div class="alert alert--success">{message}</div> })}

                <EntryFormFields form=form errors=errors reference=reference disabled=busy />

                <div class="details-actions">
                    <Button appearance=ButtonAppearance::Primary on_click=submit disabled=busy>
                        {icon("save")}
                        {move || if save_state.with(LoadState::is_loading) { " Registrando..." } else { " Registrar" }}
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        "Fechar"
                    </Button>
                </div>
            </div>
        </PageFrame>
    }
}
