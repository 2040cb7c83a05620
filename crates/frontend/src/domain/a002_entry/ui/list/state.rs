use crate::shared::list_utils::ListQuery;
use crate::shared::state::persist;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

const STORAGE_KEY: &str = "a002_entry_list_state";

/// Entry list selection: search/sort/page plus the delivery date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryListState {
    pub query: ListQuery,
    pub date_from: String,
    pub date_to: String,
}

impl Default for EntryListState {
    fn default() -> Self {
        Self {
            query: ListQuery::sorted_by("date", false),
            date_from: String::new(),
            date_to: String::new(),
        }
    }
}

pub fn create_state() -> RwSignal<EntryListState> {
    let state = RwSignal::new(persist::load(STORAGE_KEY).unwrap_or_default());
    Effect::new(move |_| state.with(|s| persist::save(STORAGE_KEY, s)));
    state
}
