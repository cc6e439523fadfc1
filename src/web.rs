//! Browser bindings
//!
//! Exposes the dashboard state to JavaScript. Widget lists cross the
//! boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::dashboard::Dashboard;
use crate::error::StoreError;
use crate::storage::LocalStorage;
use crate::store::Subscription;
use crate::widget::WidgetList;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A host page may have installed a logger already
    let _ = console_log::init_with_level(log::Level::Info);
}

fn to_js(err: StoreError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn encode(list: &WidgetList) -> Result<String, JsValue> {
    serde_json::to_string(list).map_err(|e| to_js(StoreError::Serialize(e)))
}

/// Dashboard state backed by `window.localStorage`
#[wasm_bindgen]
pub struct WidgetDashboard {
    inner: Dashboard,
}

#[wasm_bindgen]
impl WidgetDashboard {
    /// Open LocalStorage and load the stored widgets. Unreadable content
    /// starts the dashboard empty.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WidgetDashboard, JsValue> {
        let storage = LocalStorage::open().map_err(to_js)?;
        let inner = Dashboard::init_or_empty(storage).map_err(to_js)?;
        Ok(Self { inner })
    }

    /// Reload from storage and return the list as JSON
    pub fn load(&self) -> Result<String, JsValue> {
        let list = self.inner.widgets().load().map_err(to_js)?;
        encode(&list)
    }

    /// Replace the list with the JSON array `json` and persist it
    pub fn save(&self, json: &str) -> Result<(), JsValue> {
        let list: WidgetList =
            serde_json::from_str(json).map_err(|e| to_js(StoreError::Parse(e)))?;
        self.inner.widgets().save(list).map_err(to_js)
    }

    pub fn clear(&self) -> Result<(), JsValue> {
        self.inner.widgets().clear().map_err(to_js)
    }

    /// Current list as JSON
    pub fn widgets(&self) -> Result<String, JsValue> {
        encode(&self.inner.widgets().get())
    }

    /// Call `callback` with the list JSON now and on every change. Free the
    /// returned handle to unsubscribe.
    #[wasm_bindgen(js_name = subscribeWidgets)]
    pub fn subscribe_widgets(&self, callback: js_sys::Function) -> WidgetSubscription {
        let subscription = self.inner.widgets().subscribe(move |list| {
            let json = match serde_json::to_string(list) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("Failed to encode widgets for subscriber: {}", e);
                    return;
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log::warn!("Widget subscriber threw: {:?}", e);
            }
        });
        WidgetSubscription {
            _subscription: subscription,
        }
    }

    /// JS numbers are f64; the fractional part is dropped
    #[wasm_bindgen(js_name = currentPage)]
    pub fn current_page(&self) -> f64 {
        self.inner.current_page().get() as f64
    }

    #[wasm_bindgen(js_name = setCurrentPage)]
    pub fn set_current_page(&self, page: f64) {
        self.inner.current_page().set(page as i64);
    }
}

/// Live widget subscription; `free()` it from JS to unsubscribe
#[wasm_bindgen]
pub struct WidgetSubscription {
    _subscription: Subscription,
}
