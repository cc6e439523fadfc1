//! Widget Deck native entry point
//!
//! The browser build is driven from `widget_deck::web`. Natively this runs a
//! save/reload walkthrough against in-memory storage.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Widget Deck (native) starting...");

    if let Err(e) = run_demo() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run_demo() -> widget_deck::Result<()> {
    use widget_deck::{Dashboard, MemoryStorage, Widget};

    let storage = MemoryStorage::new();
    let dashboard = Dashboard::init(storage.clone())?;

    let _log = dashboard.widgets().subscribe(|list| {
        log::info!("Subscriber saw {} widgets", list.len());
    });

    // Stale ids on purpose, the reload below replaces them
    dashboard.widgets().save(vec![
        Widget {
            id: Some(5),
            ..Widget::new().with_field("name", "Clock")
        },
        Widget::new().with_field("name", "Weather"),
    ])?;
    dashboard.current_page().set(2);

    let reloaded = Dashboard::init(storage)?;
    for widget in reloaded.widgets().get() {
        println!(
            "{}",
            serde_json::to_string(&widget).map_err(widget_deck::StoreError::Serialize)?
        );
    }
    println!(
        "page before reload: {}, after reload: {}",
        dashboard.current_page().get(),
        reloaded.current_page().get()
    );
    Ok(())
}
