use super::DataError;
use async_trait::async_trait;
use contracts::domain::a001_producer::{NewProducer, Producer, ProducerPatch};
use contracts::domain::a002_entry::{Entry, EntryPatch, NewEntry};
use contracts::domain::a003_municipality::Municipality;
use contracts::domain::a004_color::Color;
use contracts::domain::a005_community::Community;
use contracts::system::users::{UserAccount, UserAccountPatch};
use leptos::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

/// One full-table fetch per entity, partial updates by primary key and the
/// two inserts. Nothing is filtered, sorted or paginated server-side.
#[async_trait(?Send)]
pub trait Repository: Send + Sync {
    async fn fetch_producers(&self) -> Result<Vec<Producer>, DataError>;
    async fn fetch_entries(&self) -> Result<Vec<Entry>, DataError>;
    async fn fetch_municipalities(&self) -> Result<Vec<Municipality>, DataError>;
    async fn fetch_colors(&self) -> Result<Vec<Color>, DataError>;
    async fn fetch_communities(&self) -> Result<Vec<Community>, DataError>;
    async fn fetch_users(&self) -> Result<Vec<UserAccount>, DataError>;

    async fn update_producer(&self, id: i64, patch: &ProducerPatch) -> Result<(), DataError>;
    async fn update_entry(&self, id: i64, patch: &EntryPatch) -> Result<(), DataError>;
    async fn update_user(&self, id: Uuid, patch: &UserAccountPatch) -> Result<(), DataError>;

    async fn insert_producer(&self, row: &NewProducer) -> Result<(), DataError>;
    async fn insert_entry(&self, row: &NewEntry) -> Result<(), DataError>;
}

pub type SharedRepository = Arc<dyn Repository>;

/// Repository injected by `App`
pub fn use_repository() -> SharedRepository {
    use_context::<SharedRepository>().expect("Repository not provided in context")
}
