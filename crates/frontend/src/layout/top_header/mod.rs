//! Application top bar: sidebar toggle, brand, signed-in user and logout

use crate::layout::global_context::AppGlobalContext;
use crate::shared::config::AppConfig;
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let config = expect_context::<AppConfig>();
    let (auth_state, set_auth_state) = use_auth();

    let logout = move |_| {
        let config = config.clone();
        spawn_local(async move {
            do_logout(&config, set_auth_state).await;
        });
    };

    let is_sidebar_visible = move || ctx.left_open.get();

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if is_sidebar_visible() { "Ocultar menu" } else { "Mostrar menu" }
                >
                    {icon("menu")}
                </button>
                {icon("hive")}
                <span class="top-header__title">"Colmeia"</span>
            </div>

            <div class="top-header__actions">
                <div class="top-header__user">
                    {icon("users")}
                    <span>{move || auth_state.with(|s| s.display_name())}</span>
                    {move || auth_state.with(|s| s.account.as_ref().map(|a| {
                        view! { <span class="top-header__role">{a.role.label()}</span> }
                    }))}
                </div>
                <button class="top-header__icon-btn" on:click=logout title="Sair">
                    {icon("logout")}
                </button>
            </div>
        </div>
    }
}
