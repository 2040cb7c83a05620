//! In-memory repository for tests. Applies patches to its own rows and
//! records every call so tests can assert on the exact traffic.

use super::{DataError, Repository};
use async_trait::async_trait;
use contracts::domain::a001_producer::{NewProducer, Producer, ProducerPatch};
use contracts::domain::a002_entry::{Entry, EntryPatch, NewEntry};
use contracts::domain::a003_municipality::Municipality;
use contracts::domain::a004_color::Color;
use contracts::domain::a005_community::Community;
use contracts::system::users::{UserAccount, UserAccountPatch};
use serde_json::Value;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall {
    Fetch(&'static str),
    Update {
        table: &'static str,
        id: String,
        body: Value,
    },
    Insert {
        table: &'static str,
        body: Value,
    },
}

#[derive(Default)]
struct State {
    producers: Vec<Producer>,
    entries: Vec<Entry>,
    municipalities: Vec<Municipality>,
    colors: Vec<Color>,
    communities: Vec<Community>,
    users: Vec<UserAccount>,
    calls: Vec<RepoCall>,
    fail_with: Option<DataError>,
}

#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_producers(self, producers: Vec<Producer>) -> Self {
        self.state.lock().unwrap().producers = producers;
        self
    }

    pub fn with_entries(self, entries: Vec<Entry>) -> Self {
        self.state.lock().unwrap().entries = entries;
        self
    }

    pub fn with_municipalities(self, municipalities: Vec<Municipality>) -> Self {
        self.state.lock().unwrap().municipalities = municipalities;
        self
    }

    pub fn with_colors(self, colors: Vec<Color>) -> Self {
        self.state.lock().unwrap().colors = colors;
        self
    }

    pub fn with_communities(self, communities: Vec<Community>) -> Self {
        self.state.lock().unwrap().communities = communities;
        self
    }

    pub fn with_users(self, users: Vec<UserAccount>) -> Self {
        self.state.lock().unwrap().users = users;
        self
    }

    /// Every following call fails with `error`
    pub fn failing(self, error: DataError) -> Self {
        self.state.lock().unwrap().fail_with = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn producers(&self) -> Vec<Producer> {
        self.state.lock().unwrap().producers.clone()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.state.lock().unwrap().entries.clone()
    }

    fn record(&self, call: RepoCall) -> Result<std::sync::MutexGuard<'_, State>, DataError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match &state.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(state),
        }
    }
}

fn body<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

#[async_trait(?Send)]
impl Repository for InMemoryRepository {
    async fn fetch_producers(&self) -> Result<Vec<Producer>, DataError> {
        Ok(self.record(RepoCall::Fetch("produtores"))?.producers.clone())
    }

    async fn fetch_entries(&self) -> Result<Vec<Entry>, DataError> {
        Ok(self.record(RepoCall::Fetch("entradas"))?.entries.clone())
    }

    async fn fetch_municipalities(&self) -> Result<Vec<Municipality>, DataError> {
        Ok(self.record(RepoCall::Fetch("municipios"))?.municipalities.clone())
    }

    async fn fetch_colors(&self) -> Result<Vec<Color>, DataError> {
        Ok(self.record(RepoCall::Fetch("cores"))?.colors.clone())
    }

    async fn fetch_communities(&self) -> Result<Vec<Community>, DataError> {
        Ok(self.record(RepoCall::Fetch("comunidades"))?.communities.clone())
    }

    async fn fetch_users(&self) -> Result<Vec<UserAccount>, DataError> {
        Ok(self.record(RepoCall::Fetch("usuarios"))?.users.clone())
    }

    async fn update_producer(&self, id: i64, patch: &ProducerPatch) -> Result<(), DataError> {
        let mut state = self.record(RepoCall::Update {
            table: "produtores",
            id: id.to_string(),
            body: body(patch),
        })?;
        if let Some(row) = state.producers.iter_mut().find(|p| p.id == id) {
            patch.apply_to(row);
        }
        Ok(())
    }

    async fn update_entry(&self, id: i64, patch: &EntryPatch) -> Result<(), DataError> {
        let mut state = self.record(RepoCall::Update {
            table: "entradas",
            id: id.to_string(),
            body: body(patch),
        })?;
        if let Some(row) = state.entries.iter_mut().find(|e| e.id == id) {
            patch.apply_to(row);
        }
        Ok(())
    }

    async fn update_user(&self, id: Uuid, patch: &UserAccountPatch) -> Result<(), DataError> {
        let mut state = self.record(RepoCall::Update {
            table: "usuarios",
            id: id.to_string(),
            body: body(patch),
        })?;
        if let Some(row) = state.users.iter_mut().find(|u| u.id == id) {
            patch.apply_to(row);
        }
        Ok(())
    }

    async fn insert_producer(&self, row: &NewProducer) -> Result<(), DataError> {
        let mut state = self.record(RepoCall::Insert {
            table: "produtores",
            body: body(row),
        })?;
        let id = state.producers.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        state.producers.push(row.clone().into_producer(id));
        Ok(())
    }

    async fn insert_entry(&self, row: &NewEntry) -> Result<(), DataError> {
        let mut state = self.record(RepoCall::Insert {
            table: "entradas",
            body: body(row),
        })?;
        let id = state.entries.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        state.entries.push(row.clone().into_entry(id));
        Ok(())
    }
}
