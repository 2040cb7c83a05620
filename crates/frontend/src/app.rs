use crate::app_shell::AppShell;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::config::AppConfig;
use crate::shared::data::{BaasClient, SharedRepository};
use crate::shared::state::SharedTables;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;
use std::sync::Arc;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let repository: SharedRepository = Arc::new(BaasClient::new(config.clone()));

    provide_context(config);
    provide_context(repository);
    provide_context(AppGlobalContext::new());
    provide_context(SharedTables::new());

    view! {
        <AuthProvider>
            <AppShell />
        </AuthProvider>
    }
}
