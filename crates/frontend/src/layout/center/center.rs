use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

/// Tab strip above the content area
#[component]
fn TabStrip() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <div class="tabs-bar">
            <For
                each=move || tabs_store.opened.get()
                key=|tab| tab.key.clone()
                children=move |tab| {
                    let key_active = tab.key.clone();
                    let key_click = tab.key.clone();
                    let key_close = tab.key.clone();
                    view! {
                        <div
                            class="tabs-bar__tab"
                            class:tabs-bar__tab--active=move || {
                                tabs_store.active.with(|a| a.as_deref() == Some(key_active.as_str()))
                            }
                            on:click=move |_| tabs_store.activate_tab(&key_click)
                        >
                            <span class="tabs-bar__title">{tab.title}</span>
                            <button
                                class="tabs-bar__close"
                                title="Fechar"
                                on:click=move |ev: ev::MouseEvent| {
                                    ev.stop_propagation();
                                    tabs_store.close_tab(&key_close);
                                }
                            >
                                {icon("x")}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[component]
pub fn Center(children: Children) -> impl IntoView {
    view! {
        <div data-zone="center" class="app-tabs">
            <TabStrip />
            <div class="app-tabs__content">{children()}</div>
        </div>
    }
}
