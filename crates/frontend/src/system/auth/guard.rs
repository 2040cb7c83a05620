use leptos::prelude::*;

use super::context::use_auth;

/// Renders `children` for an active admin, a notice otherwise
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.with(|s| s.is_authenticated() && s.is_admin())
            fallback=|| view! {
                <div class="alert alert--error">"Acesso restrito a administradores."</div>
            }
        >
            {children()}
        </Show>
    }
}
