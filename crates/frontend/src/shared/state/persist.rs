//! JSON snapshots of UI state in `localStorage`

use serde::{de::DeserializeOwned, Serialize};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Stored value under `key`; missing or unreadable snapshots are `None`
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = local_storage()?.get_item(key).ok()??;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding stored state {}: {}", key, e);
            None
        }
    }
}

pub fn save<T: Serialize>(key: &str, value: &T) {
    let Some(storage) = local_storage() else {
        return;
    };
    match serde_json::to_string(value) {
        Ok(json) => {
            let _ = storage.set_item(key, &json);
        }
        Err(e) => log::warn!("state {} not saved: {}", key, e),
    }
}
