use crate::shared::browser::alert;
use crate::shared::data::services::{register_producer, save_producer_changes};
use crate::shared::data::{use_repository, ReferenceData, SaveError, SharedRepository};
use crate::shared::state::{use_shared_tables, LoadState, LoadStateSignal, SharedTables};
use contracts::domain::a001_producer::{Producer, ProducerForm};
use contracts::domain::a005_community::of_municipality;
use contracts::shared::validation::FieldErrors;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Options of the community selector: the communities of the chosen
/// municipality, or every community when the municipality is unknown
pub fn community_options(reference: &ReferenceData, municipality: &str) -> Vec<String> {
    let mut names: Vec<String> = match reference
        .municipalities
        .iter()
        .find(|m| m.name == municipality)
    {
        Some(m) => of_municipality(&reference.communities, m.id)
            .into_iter()
            .map(|c| c.name.clone())
            .collect(),
        None => reference.communities.iter().map(|c| c.name.clone()).collect(),
    };
    names.sort();
    names.dedup();
    names
}

/// Known municipalities, keeping a legacy value of the loaded row selectable
pub fn municipality_options(reference: &ReferenceData, current: &str) -> Vec<String> {
    let mut names = reference.municipality_names();
    if !current.is_empty() && !names.iter().any(|n| n == current) {
        names.insert(0, current.to_string());
    }
    names
}

/// ViewModel of the producer form
#[derive(Clone, Copy)]
pub struct ProducerDetailsViewModel {
    pub form: RwSignal<ProducerForm>,
    /// Row as loaded, the base of the partial update
    pub original: RwSignal<Option<Producer>>,
    pub errors: RwSignal<FieldErrors>,
    pub reference: RwSignal<ReferenceData>,
    pub load_state: RwSignal<LoadState>,
    pub save_state: RwSignal<LoadState>,
    editing_id: Option<i64>,
    repo: StoredValue<SharedRepository>,
    tables: SharedTables,
}

impl ProducerDetailsViewModel {
    pub fn new(id: Option<i64>) -> Self {
        Self {
            form: RwSignal::new(ProducerForm::default()),
            original: RwSignal::new(None),
            errors: RwSignal::new(FieldErrors::new()),
            reference: RwSignal::new(ReferenceData::default()),
            load_state: RwSignal::new(LoadState::Idle),
            save_state: RwSignal::new(LoadState::Idle),
            editing_id: id,
            repo: StoredValue::new(use_repository()),
            tables: use_shared_tables(),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.load_state.with(LoadState::is_loading) || self.save_state.with(LoadState::is_loading)
    }

    /// Edits need the loaded row; a failed load must not turn into an insert
    pub fn can_save(&self) -> bool {
        !self.is_busy() && (!self.is_edit_mode() || self.original.with(Option::is_some))
    }

    pub fn field_error(&self, field: &'static str) -> Signal<Option<String>> {
        let errors = self.errors;
        Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
    }

    /// Fetch the lookup tables and, in edit mode, the row being edited
    pub fn load(&self) {
        if !self.load_state.try_begin() {
            return;
        }
        let vm = *self;
        let repo = self.repo.get_value();
        spawn_local(async move {
            let reference = match ReferenceData::load(repo.as_ref()).await {
                Ok(reference) => reference,
                Err(e) => {
                    vm.load_state
                        .fail(format!("Não foi possível carregar os dados: {}", e));
                    return;
                }
            };

            if let Some(id) = vm.editing_id {
                match reference.producers.iter().find(|p| p.id == id) {
                    Some(producer) => {
                        vm.form.set(ProducerForm::from_producer(producer));
                        vm.original.set(Some(producer.clone()));
                    }
                    None => {
                        vm.reference.set(reference);
                        vm.load_state
                            .fail(format!("Produtor {} não encontrado", id));
                        return;
                    }
                }
            }

            vm.reference.set(reference);
            vm.load_state.succeed();
        });
    }

    /// Changing the municipality drops a community that does not belong to it
    pub fn set_municipality(&self, municipality: String) {
        let options = self
            .reference
            .with_untracked(|r| community_options(r, &municipality));
        self.form.update(|f| {
            if !f.community.is_empty() && !options.contains(&f.community) {
                f.community.clear();
            }
            f.municipality = municipality;
        });
    }

    /// Validate, write, publish the refetched list and hand control back
    pub fn save_command(&self, on_saved: Callback<()>) {
        let form = self.form.get_untracked();
        if let Err(errors) = form.validate() {
            self.errors.set(errors);
            return;
        }
        self.errors.set(FieldErrors::new());

        if !self.save_state.try_begin() {
            return;
        }
        let vm = *self;
        let repo = self.repo.get_value();
        let original = self.original.get_untracked();
        spawn_local(async move {
            let result = match &original {
                Some(original) => save_producer_changes(repo.as_ref(), original, &form).await,
                None => register_producer(repo.as_ref(), &form).await,
            };
            match result {
                Ok(producers) => {
                    vm.tables.producers.set(producers);
                    vm.save_state.succeed();
                    on_saved.run(());
                }
                Err(SaveError::Invalid(errors)) => {
                    vm.errors.set(errors);
                    vm.save_state.fail("Corrija os campos destacados".to_string());
                }
                Err(SaveError::Data(e)) => {
                    log::error!("producer save failed: {}", e);
                    vm.save_state.fail(e.to_string());
                    alert(&format!("Erro ao salvar produtor: {}", e));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a003_municipality::Municipality;
    use contracts::domain::a005_community::Community;

    fn reference() -> ReferenceData {
        ReferenceData {
            municipalities: vec![
                Municipality {
                    id: 1,
                    name: "Picos".into(),
                    region: "Sertão".into(),
                },
                Municipality {
                    id: 2,
                    name: "Oeiras".into(),
                    region: "Sertão".into(),
                },
            ],
            communities: vec![
                Community {
                    id: 10,
                    name: "Baixa Grande".into(),
                    municipality_id: Some(1),
                },
                Community {
                    id: 11,
                    name: "Angical".into(),
                    municipality_id: Some(1),
                },
                Community {
                    id: 12,
                    name: "Morrinhos".into(),
                    municipality_id: Some(2),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_community_options_follow_municipality() {
        let r = reference();
        assert_eq!(community_options(&r, "Picos"), vec!["Angical", "Baixa Grande"]);
        assert_eq!(community_options(&r, "Oeiras"), vec!["Morrinhos"]);
        assert_eq!(community_options(&r, "").len(), 3);
    }

    #[test]
    fn test_municipality_options_keep_legacy_value() {
        let r = reference();
        assert_eq!(municipality_options(&r, "Picos"), vec!["Oeiras", "Picos"]);
        assert_eq!(
            municipality_options(&r, "Jaicós"),
            vec!["Jaicós", "Oeiras", "Picos"]
        );
    }
}
