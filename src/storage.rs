//! Key-value storage backends
//!
//! `LocalStorage` wraps the browser's `window.localStorage` (wasm32 only).
//! `MemoryStorage` keeps everything in a shared map and backs native builds
//! and tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;

/// Synchronous string key-value store, modelled on the Web Storage API
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory storage. Clones share the same contents, so a store built over
/// a clone sees every write made through the original.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod local {
    use wasm_bindgen::{JsCast, JsValue};

    use super::KeyValueStorage;
    use crate::error::{Result, StoreError};

    /// Browser `window.localStorage`
    #[derive(Debug, Clone)]
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        /// Open the origin's LocalStorage. Fails outside a window context or
        /// when storage is disabled (private browsing, blocked cookies).
        pub fn open() -> Result<Self> {
            let window =
                web_sys::window().ok_or_else(|| StoreError::Storage("no window".to_string()))?;
            let storage = window
                .local_storage()
                .map_err(js_error)?
                .ok_or_else(|| StoreError::Storage("localStorage unavailable".to_string()))?;
            Ok(Self { storage })
        }
    }

    impl KeyValueStorage for LocalStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.storage.get_item(key).map_err(js_error)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            self.storage.set_item(key, value).map_err(js_error)
        }

        fn remove_item(&self, key: &str) -> Result<()> {
            self.storage.remove_item(key).map_err(js_error)
        }
    }

    fn js_error(err: JsValue) -> StoreError {
        let message = err
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| err.as_string())
            .unwrap_or_else(|| format!("{:?}", err));
        StoreError::Storage(message)
    }
}
