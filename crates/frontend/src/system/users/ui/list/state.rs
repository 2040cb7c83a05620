use crate::shared::list_utils::ListQuery;
use crate::shared::state::persist;
use leptos::prelude::*;

const STORAGE_KEY: &str = "sys_users_list_state";

pub fn create_state() -> RwSignal<ListQuery> {
    let state = RwSignal::new(
        persist::load(STORAGE_KEY).unwrap_or_else(|| ListQuery::sorted_by("full_name", true)),
    );
    Effect::new(move |_| state.with(|q| persist::save(STORAGE_KEY, q)));
    state
}
