//! Loaded tables shared between tabs.
//!
//! Lists and forms stay mounted while hidden, so a save in one tab publishes
//! the refetched table here and every other tab re-renders from it.

use contracts::domain::a001_producer::Producer;
use contracts::domain::a002_entry::Entry;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct SharedTables {
    pub producers: RwSignal<Vec<Producer>>,
    pub entries: RwSignal<Vec<Entry>>,
}

impl SharedTables {
    pub fn new() -> Self {
        Self {
            producers: RwSignal::new(Vec::new()),
            entries: RwSignal::new(Vec::new()),
        }
    }
}

impl Default for SharedTables {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_shared_tables() -> SharedTables {
    expect_context::<SharedTables>()
}
