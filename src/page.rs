//! Current page store
//!
//! In-memory only. No bounds are enforced, any `i64` is a valid page.

use crate::store::{Subscription, Writable};

/// Page shown when the dashboard starts
pub const DEFAULT_PAGE: i64 = 1;

/// Reactive current page number
#[derive(Debug, Clone)]
pub struct CurrentPage {
    page: Writable<i64>,
}

impl CurrentPage {
    pub fn new() -> Self {
        Self {
            page: Writable::new(DEFAULT_PAGE),
        }
    }

    pub fn get(&self) -> i64 {
        self.page.get()
    }

    pub fn set(&self, page: i64) {
        self.page.set(page);
    }

    pub fn update(&self, f: impl FnOnce(i64) -> i64) {
        self.page.update(|p| f(*p));
    }

    pub fn subscribe(&self, mut f: impl FnMut(i64) + 'static) -> Subscription {
        self.page.subscribe(move |p| f(*p))
    }
}

impl Default for CurrentPage {
    fn default() -> Self {
        Self::new()
    }
}
