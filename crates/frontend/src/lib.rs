pub mod app;
pub mod app_shell;
pub mod dashboards;
pub mod domain;
pub mod layout;
pub mod shared;
pub mod system;

use leptos::prelude::*;
use shared::config::AppConfig;
use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen(start)]
pub fn start() {
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    // a bundle built without the BaaS settings cannot do anything useful
    let config = match AppConfig::from_build_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration error: {}", e);
            wasm_bindgen::throw_str(&e.to_string());
        }
    };
    log::info!("Colmeia starting against {}", config.baas_url);

    leptos::mount::mount_to_body(move || view! { <app::App config=config.clone() /> });
}
