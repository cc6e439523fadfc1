//! Widget Deck - dashboard widget state
//!
//! Core modules:
//! - `store`: Reactive value container with synchronous subscribers
//! - `storage`: Key-value backends (LocalStorage on web, in-memory elsewhere)
//! - `widget`: Widget record passed through as open JSON
//! - `widgets`: Widget list store persisted under the `widgets` key
//! - `page`: Current page number
//! - `dashboard`: Both stores together, loaded at startup

pub mod dashboard;
pub mod error;
pub mod page;
pub mod storage;
pub mod store;
pub mod widget;
pub mod widgets;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use dashboard::Dashboard;
pub use error::{Result, StoreError};
pub use page::{CurrentPage, DEFAULT_PAGE};
pub use storage::{KeyValueStorage, MemoryStorage};
pub use store::{Subscription, Writable};
pub use widget::{Widget, WidgetList};
pub use widgets::{WIDGETS_KEY, WidgetStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
