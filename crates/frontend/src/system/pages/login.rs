use crate::shared::config::AppConfig;
use crate::shared::data::use_repository;
use crate::shared::icons::icon;
use crate::shared::state::load_state::{LoadState, LoadStateSignal};
use crate::system::auth::context::{do_login, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let state = RwSignal::new(LoadState::Idle);

    let (_, set_auth_state) = use_auth();
    let config = expect_context::<AppConfig>();
    let repo = use_repository();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !state.try_begin() {
            return;
        }

        let config = config.clone();
        let repo = repo.clone();
        let email_val = email.get_untracked().trim().to_string();
        let password_val = password.get_untracked();

        spawn_local(async move {
            match do_login(&config, repo.as_ref(), email_val, password_val).await {
                Ok(auth) => {
                    state.succeed();
                    // switches the shell to the main layout
                    set_auth_state.set(auth);
                }
                Err(message) => state.fail(message),
            }
        });
    };

    let is_loading = move || state.with(LoadState::is_loading);

    view! {
        <div class="login-container">
            <div class="login-box">
                <div class="login-box__brand">{icon("hive")}<h1>"Colmeia"</h1></div>
                <h2>"Acesso ao sistema da cooperativa"</h2>

                {move || state.with(|s| s.error().map(|message| view! {
                    <div class="error-message">{message.to_string()}</div>
                }))}

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="email">"E-mail"</label>
                        <input
                            type="email"
                            id="email"
                            autocomplete="username"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                            required
                            disabled=is_loading
                        />
                    </div>

                    <div class="form-group">
                        <label for="password">"Senha"</label>
                        <input
                            type="password"
                            id="password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                            required
                            disabled=is_loading
                        />
                    </div>

                    <button type="submit" class="btn-primary" disabled=is_loading>
                        {move || if is_loading() { "Entrando..." } else { "Entrar" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
