use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

use super::tabs::tab_label_for_key;

/// Tab opened when the URL names none
pub const HOME_TAB: &str = "d401_overview";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
}

/// Open tabs, the active one and the sidebar toggle
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Append `key` unless it is already open. Returns whether a tab was added.
pub fn push_tab(tabs: &mut Vec<Tab>, key: &str, title: &str) -> bool {
    if tabs.iter().any(|t| t.key == key) {
        return false;
    }
    tabs.push(Tab {
        key: key.to_string(),
        title: title.to_string(),
    });
    true
}

/// Tab to activate after `closed` was removed from `remaining`: the right
/// neighbour of the closed one, else the new last tab
pub fn next_active(remaining: &[Tab], closed_index: usize) -> Option<String> {
    remaining
        .get(closed_index)
        .or_else(|| remaining.last())
        .map(|t| t.key.clone())
}

/// `active` parameter of a location search string (`?active=a001_producer`)
pub fn active_from_query(search: &str) -> Option<String> {
    let params: HashMap<String, String> =
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
    params.get("active").filter(|k| !k.is_empty()).cloned()
}

pub fn query_for_active(key: &str) -> String {
    let query = serde_qs::to_string(&HashMap::from([("active", key)])).unwrap_or_default();
    format!("?{}", query)
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(vec![]),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
        }
    }

    /// Open the tab named in the URL (or the home tab) and keep the URL in
    /// step with the active tab from then on
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let initial = active_from_query(&search).unwrap_or_else(|| HOME_TAB.to_string());
        self.open_tab(&initial, &tab_label_for_key(&initial));

        let this = *self;
        Effect::new(move |_| {
            let Some(active_key) = this.active.get() else {
                return;
            };
            let new_url = query_for_active(&active_key);
            let Some(w) = window() else {
                return;
            };
            if w.location().search().ok().as_deref() == Some(new_url.as_str()) {
                return;
            }
            if let Ok(history) = w.history() {
                let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&new_url));
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        let mut added = false;
        self.opened.update(|tabs| added = push_tab(tabs, key, title));
        if added {
            log::debug!("tab opened: {}", key);
        }
        self.activate_tab(key);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    pub fn close_tab(&self, key: &str) {
        let mut closed_index = None;
        self.opened.update(|tabs| {
            closed_index = tabs.iter().position(|t| t.key == key);
            tabs.retain(|t| t.key != key);
        });
        let was_active = self
            .active
            .with_untracked(|active| active.as_deref() == Some(key));
        if let (true, Some(index)) = (was_active, closed_index) {
            let next = self.opened.with_untracked(|tabs| next_active(tabs, index));
            self.active.set(next);
        }
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|open| *open = !*open);
    }
}
