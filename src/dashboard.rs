//! Process-wide dashboard state
//!
//! Groups the widget list and the current page. Created once at startup;
//! `init` loads the persisted widgets before anything subscribes.

use crate::error::{Result, StoreError};
use crate::page::CurrentPage;
use crate::storage::KeyValueStorage;
use crate::widgets::WidgetStore;

#[derive(Debug, Clone)]
pub struct Dashboard {
    widgets: WidgetStore,
    current_page: CurrentPage,
}

impl Dashboard {
    /// Build the stores over `storage` and load the widget list
    pub fn init(storage: impl KeyValueStorage + 'static) -> Result<Self> {
        let widgets = WidgetStore::new(storage);
        widgets.load()?;
        Ok(Self {
            widgets,
            current_page: CurrentPage::new(),
        })
    }

    /// Like [`Dashboard::init`], but unreadable stored widgets start the
    /// dashboard empty. The stored value stays until the next save.
    pub fn init_or_empty(storage: impl KeyValueStorage + 'static) -> Result<Self> {
        let widgets = WidgetStore::new(storage);
        match widgets.load() {
            Ok(_) => {}
            Err(StoreError::Parse(e)) => {
                log::warn!("Ignoring unreadable widgets: {}", e);
            }
            Err(e) => return Err(e),
        }
        Ok(Self {
            widgets,
            current_page: CurrentPage::new(),
        })
    }

    pub fn widgets(&self) -> &WidgetStore {
        &self.widgets
    }

    pub fn current_page(&self) -> &CurrentPage {
        &self.current_page
    }
}
