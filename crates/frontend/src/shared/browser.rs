//! Blocking browser dialogs

/// `window.alert`; used for failed writes so the user cannot miss them
pub fn alert(message: &str) {
    match web_sys::window() {
        Some(window) => {
            if window.alert_with_message(message).is_err() {
                log::error!("alert failed: {}", message);
            }
        }
        None => log::error!("{}", message),
    }
}
