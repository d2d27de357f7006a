//! Key-value persistence slot for progress snapshots.
//!
//! The browser build talks to `window.localStorage` directly through
//! wasm-bindgen imports; native builds and tests use an in-memory map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;

/// Synchronous, client-local blob storage keyed by string.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, blob: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// In-memory slot. Clones share the same map, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`, bypassing the trait.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Seed a raw value, e.g. a snapshot written by an older session.
    pub fn insert(&self, key: &str, blob: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
    }
}

impl KeyValueStore for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<()> {
        self.insert(key, blob);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::prelude::*;

    use super::KeyValueStore;
    use crate::error::{ProgressError, Result};

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(catch, js_namespace = localStorage, js_name = getItem)]
        fn get_item(key: &str) -> std::result::Result<Option<String>, JsValue>;

        #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
        fn set_item(key: &str, value: &str) -> std::result::Result<(), JsValue>;

        #[wasm_bindgen(catch, js_namespace = localStorage, js_name = removeItem)]
        fn remove_item(key: &str) -> std::result::Result<(), JsValue>;
    }

    fn storage_error(e: JsValue) -> ProgressError {
        ProgressError::Storage(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
    }

    /// `window.localStorage`. Only usable on the main thread; a Web Worker has
    /// no localStorage and every call will come back as `Storage` errors.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStorage;

    impl KeyValueStore for LocalStorage {
        fn read(&self, key: &str) -> Result<Option<String>> {
            get_item(key).map_err(storage_error)
        }

        fn write(&mut self, key: &str, blob: &str) -> Result<()> {
            set_item(key, blob).map_err(storage_error)
        }

        fn delete(&mut self, key: &str) -> Result<()> {
            remove_item(key).map_err(storage_error)
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_roundtrip() {
        let mut storage = LocalStorage;
        storage.write("momo-test", "{\"xp\":1}").unwrap();
        assert_eq!(storage.read("momo-test").unwrap().as_deref(), Some("{\"xp\":1}"));
        storage.delete("momo-test").unwrap();
        assert_eq!(storage.read("momo-test").unwrap(), None);
    }
}
