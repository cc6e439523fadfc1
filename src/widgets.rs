//! Widget list store
//!
//! Holds the dashboard's widget list in a [`Writable`] and mirrors it to a
//! key-value backend under a single key as a JSON array.

use std::fmt;
use std::rc::Rc;

use crate::error::{Result, StoreError};
use crate::storage::KeyValueStorage;
use crate::store::{Subscription, Writable};
use crate::widget::{WidgetList, reindex};

/// Storage key for the persisted widget list
pub const WIDGETS_KEY: &str = "widgets";

/// Reactive widget list backed by persistent storage
#[derive(Clone)]
pub struct WidgetStore {
    storage: Rc<dyn KeyValueStorage>,
    key: String,
    list: Writable<WidgetList>,
}

impl WidgetStore {
    /// Create a store over `storage` using the default key. The list starts
    /// empty until [`WidgetStore::load`] runs.
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self::with_key(storage, WIDGETS_KEY)
    }

    pub fn with_key(storage: impl KeyValueStorage + 'static, key: impl Into<String>) -> Self {
        Self {
            storage: Rc::new(storage),
            key: key.into(),
            list: Writable::new(WidgetList::new()),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Read the list from storage, re-index ids to array positions and
    /// publish it.
    ///
    /// An absent key yields an empty list. Malformed content returns
    /// [`StoreError::Parse`] and leaves the published list untouched.
    pub fn load(&self) -> Result<WidgetList> {
        let list = match self.storage.get_item(&self.key)? {
            Some(raw) => {
                let mut list: WidgetList = serde_json::from_str(&raw).map_err(StoreError::Parse)?;
                reindex(&mut list);
                list
            }
            None => WidgetList::new(),
        };

        log::info!("Loaded {} widgets from '{}'", list.len(), self.key);
        self.list.set(list.clone());
        Ok(list)
    }

    /// Persist `list` as given, overwriting prior content, then publish it.
    /// Nothing is published if the write fails.
    pub fn save(&self, list: WidgetList) -> Result<()> {
        let json = serde_json::to_string(&list).map_err(StoreError::Serialize)?;
        self.storage.set_item(&self.key, &json)?;
        log::info!("Widgets saved ({} entries)", list.len());
        self.list.set(list);
        Ok(())
    }

    /// Remove the persisted list and publish an empty one
    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(&self.key)?;
        log::info!("Widgets cleared");
        self.list.set(WidgetList::new());
        Ok(())
    }

    /// Latest published list
    pub fn get(&self) -> WidgetList {
        self.list.get()
    }

    pub fn len(&self) -> usize {
        self.list.with(|l| l.len())
    }

    pub fn is_empty(&self) -> bool {
        self.list.with(|l| l.is_empty())
    }

    /// Subscribe to published lists; called immediately with the current one
    pub fn subscribe(&self, f: impl FnMut(&WidgetList) + 'static) -> Subscription {
        self.list.subscribe(f)
    }
}

impl fmt::Debug for WidgetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetStore")
            .field("key", &self.key)
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}
