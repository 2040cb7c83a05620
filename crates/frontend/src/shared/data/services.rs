//! Save flows shared by the forms: validate, write once, refetch.

use super::{DataError, Repository};
use contracts::domain::a001_producer::{Producer, ProducerForm};
use contracts::domain::a002_entry::{Entry, EntryForm};
use contracts::shared::validation::FieldErrors;
use contracts::system::users::{UserAccount, UserAccountPatch, UserRole};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaveError {
    #[error("{0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Data(#[from] DataError),
}

impl From<FieldErrors> for SaveError {
    fn from(errors: FieldErrors) -> Self {
        SaveError::Invalid(errors)
    }
}

impl SaveError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SaveError::Invalid(errors) => Some(errors),
            SaveError::Data(_) => None,
        }
    }
}

/// Write only the fields that changed, then reload the list.
/// An unchanged form issues no update.
pub async fn save_producer_changes(
    repo: &dyn Repository,
    original: &Producer,
    edited: &ProducerForm,
) -> Result<Vec<Producer>, SaveError> {
    let patch = edited.diff(original)?;
    if patch.is_empty() {
        log::debug!("producer {} unchanged, skipping update", original.id);
    } else {
        repo.update_producer(original.id, &patch).await?;
    }
    Ok(repo.fetch_producers().await?)
}

pub async fn register_producer(
    repo: &dyn Repository,
    form: &ProducerForm,
) -> Result<Vec<Producer>, SaveError> {
    let row = form.validate()?;
    repo.insert_producer(&row).await?;
    Ok(repo.fetch_producers().await?)
}

/// Same contract as [`save_producer_changes`]; the patch carries the
/// recomputed total whenever weight or price moved.
pub async fn save_entry_changes(
    repo: &dyn Repository,
    original: &Entry,
    edited: &EntryForm,
) -> Result<Vec<Entry>, SaveError> {
    let patch = edited.diff(original)?;
    if patch.is_empty() {
        log::debug!("entry {} unchanged, skipping update", original.id);
    } else {
        repo.update_entry(original.id, &patch).await?;
    }
    Ok(repo.fetch_entries().await?)
}

pub async fn register_entry(
    repo: &dyn Repository,
    form: &EntryForm,
) -> Result<Vec<Entry>, SaveError> {
    let row = form.validate()?;
    repo.insert_entry(&row).await?;
    Ok(repo.fetch_entries().await?)
}

pub async fn save_user_changes(
    repo: &dyn Repository,
    original: &UserAccount,
    role: UserRole,
    active: bool,
) -> Result<Vec<UserAccount>, DataError> {
    let patch = UserAccountPatch::between(original, role, active);
    if !patch.is_empty() {
        repo.update_user(original.id, &patch).await?;
    }
    repo.fetch_users().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::memory::{InMemoryRepository, RepoCall};
    use futures::executor::block_on;
    use serde_json::json;

    fn producer() -> Producer {
        serde_json::from_value(json!({
            "id": 7,
            "codigo": "P007",
            "nome": "João Lima",
            "cpf": "529.982.247-25",
            "municipio": "Picos",
            "status": "ativo",
        }))
        .unwrap()
    }

    fn entry() -> Entry {
        serde_json::from_value(json!({
            "id": 3,
            "data": "2024-01-10",
            "produtor_id": "P007",
            "produtor_nome": "João Lima",
            "municipio": "Picos",
            "peso_bruto": 110,
            "peso_liquido": 100,
            "tara": 10,
            "valor_unitario": 12,
            "valor_total": 1200,
            "cor_codigo": 2,
            "umidade": 18,
        }))
        .unwrap()
    }

    fn account() -> UserAccount {
        serde_json::from_value(json!({
            "id": "6f1c1c1e-8b0a-4d4e-9b35-1f2f7f0a9a01",
            "email": "ana@coop.org",
            "nome": "Ana",
            "perfil": "usuario",
            "ativo": true,
        }))
        .unwrap()
    }

    #[test]
    fn test_name_edit_sends_one_patch_then_refetches() {
        let original = producer();
        let repo = InMemoryRepository::new().with_producers(vec![original.clone()]);
        let mut form = ProducerForm::from_producer(&original);
        form.name = "João Lima Neto".into();

        let producers = block_on(save_producer_changes(&repo, &original, &form)).unwrap();

        assert_eq!(
            repo.calls(),
            vec![
                RepoCall::Update {
                    table: "produtores",
                    id: "7".into(),
                    body: json!({"nome": "João Lima Neto"}),
                },
                RepoCall::Fetch("produtores"),
            ]
        );
        assert_eq!(producers[0].name, "João Lima Neto");
    }

    #[test]
    fn test_unchanged_producer_skips_update() {
        let original = producer();
        let repo = InMemoryRepository::new().with_producers(vec![original.clone()]);
        let form = ProducerForm::from_producer(&original);

        block_on(save_producer_changes(&repo, &original, &form)).unwrap();

        assert_eq!(repo.calls(), vec![RepoCall::Fetch("produtores")]);
    }

    #[test]
    fn test_invalid_form_writes_nothing() {
        let original = producer();
        let repo = InMemoryRepository::new().with_producers(vec![original.clone()]);
        let mut form = ProducerForm::from_producer(&original);
        form.cpf = "111.111.111-11".into();

        let err = block_on(save_producer_changes(&repo, &original, &form)).unwrap_err();

        assert!(err.field_errors().and_then(|e| e.get("cpf")).is_some());
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_write_error_propagates() {
        let original = producer();
        let repo = InMemoryRepository::new()
            .with_producers(vec![original.clone()])
            .failing(DataError::Http {
                status: 500,
                message: "boom".into(),
            });
        let mut form = ProducerForm::from_producer(&original);
        form.name = "Outro".into();

        let err = block_on(save_producer_changes(&repo, &original, &form)).unwrap_err();

        assert!(matches!(err, SaveError::Data(DataError::Http { status: 500, .. })));
        assert_eq!(repo.calls().len(), 1);
    }

    #[test]
    fn test_register_producer_inserts_then_refetches() {
        let repo = InMemoryRepository::new();
        let form = ProducerForm {
            code: "P010".into(),
            name: "Maria".into(),
            cpf: "52998224725".into(),
            municipality: "Oeiras".into(),
            ..Default::default()
        };

        let producers = block_on(register_producer(&repo, &form)).unwrap();

        assert_eq!(producers.len(), 1);
        assert_eq!(producers[0].cpf, "529.982.247-25");
        assert_eq!(repo.calls()[1], RepoCall::Fetch("produtores"));
        assert!(matches!(repo.calls()[0], RepoCall::Insert { table: "produtores", .. }));
    }

    #[test]
    fn test_entry_edit_recomputes_total() {
        let original = entry();
        let repo = InMemoryRepository::new().with_entries(vec![original.clone()]);
        let mut form = EntryForm::from_entry(&original);
        form.net_weight = "50".into();

        let entries = block_on(save_entry_changes(&repo, &original, &form)).unwrap();

        assert_eq!(
            repo.calls()[0],
            RepoCall::Update {
                table: "entradas",
                id: "3".into(),
                body: json!({"peso_liquido": 50.0, "valor_total": 600.0}),
            }
        );
        assert_eq!(entries[0].total_value, entries[0].computed_total());
        assert_eq!(entries[0].total_value, 600.0);
    }

    #[test]
    fn test_register_entry() {
        let repo = InMemoryRepository::new();
        let mut form = EntryForm::from_entry(&entry());
        form.net_weight = "80".into();

        let entries = block_on(register_entry(&repo, &form)).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_value, 960.0);
    }

    #[test]
    fn test_user_role_change() {
        let original = account();
        let repo = InMemoryRepository::new().with_users(vec![original.clone()]);

        let users = block_on(save_user_changes(&repo, &original, UserRole::Gestor, true)).unwrap();

        assert_eq!(users[0].role, UserRole::Gestor);
        assert_eq!(
            repo.calls()[0],
            RepoCall::Update {
                table: "usuarios",
                id: original.id.to_string(),
                body: json!({"perfil": "gestor"}),
            }
        );
    }
}
