//! Session Persistence
//!
//! Keeps the auth session in local storage so a reload stays signed in.

use notes_core::config::SESSION_STORAGE_KEY;
use notes_core::Session;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Session saved by an earlier visit, if it still parses
pub fn load() -> Option<Session> {
    let raw = storage()?.get_item(SESSION_STORAGE_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("Discarding unreadable stored session: {}", e);
            clear();
            None
        }
    }
}

pub fn save(session: &Session) {
    let Some(storage) = storage() else {
        return;
    };
    match serde_json::to_string(session) {
        Ok(raw) => {
            if storage.set_item(SESSION_STORAGE_KEY, &raw).is_err() {
                log::warn!("Could not persist session");
            }
        }
        Err(e) => log::warn!("Could not serialize session: {}", e),
    }
}

pub fn clear() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(SESSION_STORAGE_KEY);
    }
}

/// Mirror a session change into storage.
pub fn persist(session: Option<&Session>) {
    match session {
        Some(session) => save(session),
        None => clear(),
    }
}
