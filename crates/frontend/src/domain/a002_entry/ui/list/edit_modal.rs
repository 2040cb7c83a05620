use crate::domain::a002_entry::ui::form_fields::EntryFormFields;
use crate::shared::browser::alert;
use crate::shared::data::services::save_entry_changes;
use crate::shared::data::{use_repository, ReferenceData, SaveError};
use crate::shared::modal::Modal;
use crate::shared::state::{LoadState, LoadStateSignal};
use contracts::domain::a002_entry::{Entry, EntryForm};
use contracts::shared::format::format_date_br;
use contracts::shared::validation::FieldErrors;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Edits one entry. Only changed columns are written; the total follows
/// weight and price as the user types.
#[component]
pub fn EditEntryModal(
    entry: Entry,
    #[prop(into)]
    reference: Signal<ReferenceData>,
    on_close: Callback<()>,
    on_saved: Callback<Vec<Entry>>,
) -> impl IntoView {
    let repo = use_repository();
    let form = RwSignal::new(EntryForm::from_entry(&entry));
    let errors = RwSignal::new(FieldErrors::new());
    let saving = RwSignal::new(LoadState::Idle);
    let title = format!(
        "Editar entrada de {} ({})",
        entry.producer_name,
        format_date_br(&entry.date)
    );

    let on_save = move |_| {
        let edited = form.get_untracked();
        if let Err(field_errors) = edited.validate() {
            errors.set(field_errors);
            return;
        }
        errors.set(FieldErrors::new());
        if !saving.try_begin() {
            return;
        }
        let repo = repo.clone();
        let original = entry.clone();
        spawn_local(async move {
            match save_entry_changes(repo.as_ref(), &original, &edited).await {
                Ok(entries) => {
                    saving.succeed();
                    on_saved.run(entries);
                }
                Err(SaveError::Invalid(field_errors)) => {
                    errors.set(field_errors);
                    saving.fail("Corrija os campos destacados".to_string());
                }
                Err(SaveError::Data(e)) => {
                    log::error!("entry {} update failed: {}", original.id, e);
                    saving.fail(e.to_string());
                    alert(&format!("Erro ao salvar entrada: {}", e));
                }
            }
        });
    };

    let busy = Signal::derive(move || saving.with(LoadState::is_loading));

    view! {
        <Modal title=title on_close=on_close>
            <EntryFormFields form=form errors=errors reference=reference disabled=busy />
            <div class="details-actions">
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(()) disabled=busy>
                    "Cancelar"
                </Button>
                <Button appearance=ButtonAppearance::Primary on_click=on_save disabled=busy>
                    {move || if busy.get() { "Salvando..." } else { "Salvar" }}
                </Button>
            </div>
        </Modal>
    }
}
