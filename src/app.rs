//! The live store for this browser session.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The module stays loaded for the whole page session, so the store
//! persists across `handle_request` calls.

use std::cell::RefCell;
use tracing::info;

use crate::clock::SystemClock;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::logging;
use crate::progress::ProgressStore;
use crate::storage::KeyValueStore;

thread_local! {
    static STORE: RefCell<ProgressStore> = RefCell::new(session_store(StoreConfig::default()));
}

#[cfg(target_arch = "wasm32")]
fn default_storage() -> Box<dyn KeyValueStore> {
    Box::new(crate::storage::LocalStorage)
}

#[cfg(not(target_arch = "wasm32"))]
fn default_storage() -> Box<dyn KeyValueStore> {
    Box::new(crate::storage::MemoryStorage::new())
}

fn session_store(config: StoreConfig) -> ProgressStore {
    ProgressStore::new(default_storage(), Box::new(SystemClock), config)
}

/// Execute a closure with read access to the store.
pub fn with_store<F, R>(f: F) -> R
where
    F: FnOnce(&ProgressStore) -> R,
{
    STORE.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the store.
pub fn with_store_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut ProgressStore) -> R,
{
    STORE.with(|s| f(&mut s.borrow_mut()))
}

/// True once `boot` (or a test) has restored the store from storage.
pub fn is_booted() -> bool {
    with_store(|store| store.is_initialized())
}

/// Swap in a different store (tests, or a reboot with new config).
pub fn replace_store(store: ProgressStore) {
    STORE.with(|s| {
        *s.borrow_mut() = store;
    });
}

/// Page startup: parse config, install logging, build the session store on
/// browser storage and restore the persisted snapshot.
///
/// A store that was already restored is kept as is, so a second boot from
/// the same page cannot roll progress back to what is on disk.
pub fn boot(config_json: &str) -> Result<()> {
    let config = StoreConfig::from_json(config_json)?;
    logging::init(&config.log_filter);

    if is_booted() {
        info!("boot skipped, session store already restored");
        return Ok(());
    }

    let mut store = session_store(config);
    store.restore();
    replace_store(store);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_is_shared_across_calls() {
        replace_store(ProgressStore::in_memory());
        with_store_mut(|s| s.add_xp(15));
        assert_eq!(with_store(|s| s.state().xp), 15);
        replace_store(ProgressStore::in_memory());
    }

    #[test]
    fn boot_restores_once() {
        replace_store(ProgressStore::in_memory());
        boot(r#"{"log_filter":"warn"}"#).unwrap();
        assert!(with_store(|s| s.is_initialized()));
        assert_eq!(with_store(|s| s.config().log_filter.clone()), "warn");

        with_store_mut(|s| s.add_xp(5));
        boot("").unwrap();
        assert_eq!(with_store(|s| s.state().xp), 5);
        replace_store(ProgressStore::in_memory());
    }

    #[test]
    fn boot_rejects_bad_config() {
        replace_store(ProgressStore::in_memory());
        assert!(boot("{nope").is_err());
        assert!(!is_booted());
    }
}
