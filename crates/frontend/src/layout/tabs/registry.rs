//! Tab key to view. Every tab key the app knows is listed here.

use super::tab_labels::PRODUCER_DETAIL_PREFIX;
use crate::dashboards::d400_production_report::ProductionReportPage;
use crate::dashboards::d401_overview::OverviewDashboard;
use crate::domain::a001_producer::ui::details::ProducerDetails;
use crate::domain::a001_producer::ui::list::ProducerList;
use crate::domain::a002_entry::ui::intake::EntryIntakeForm;
use crate::domain::a002_entry::ui::list::EntryList;
use crate::layout::global_context::AppGlobalContext;
use crate::system::users::ui::list::UsersListPage;
use contracts::domain::common::AggregateId;
use leptos::prelude::*;

/// Content of the tab `key`. `tabs_store` lets form tabs close themselves.
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    let key_for_close = key.to_string();
    let close_self = Callback::new(move |_| tabs_store.close_tab(&key_for_close));

    match key {
        "d401_overview" => view! { <OverviewDashboard /> }.into_any(),
        "d400_production_report" => view! { <ProductionReportPage /> }.into_any(),

        "a001_producer" => view! { <ProducerList /> }.into_any(),
        "a001_producer_new" => {
            view! { <ProducerDetails id=None on_saved=close_self on_cancel=close_self /> }.into_any()
        }
        k if k.starts_with(PRODUCER_DETAIL_PREFIX) => {
            match i64::from_string(&k[PRODUCER_DETAIL_PREFIX.len()..]) {
                Ok(id) => view! {
                    <ProducerDetails id=Some(id) on_saved=close_self on_cancel=close_self />
                }
                .into_any(),
                Err(e) => {
                    log::warn!("bad producer tab key {}: {}", k, e);
                    view! { <div class="placeholder">"Produtor não encontrado"</div> }.into_any()
                }
            }
        }

        "a002_entry" => view! { <EntryList /> }.into_any(),
        "a002_entry_new" => view! { <EntryIntakeForm on_close=close_self /> }.into_any(),

        "sys_users" => view! { <UsersListPage /> }.into_any(),

        _ => {
            log::warn!("unknown tab key: {}", key);
            view! { <div class="placeholder">"Página não encontrada"</div> }.into_any()
        }
    }
}
