use crate::dom::Listener;
use flight_core::{scroll_progress, ScrollSignal};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Normalized document scroll right now, 0 at the top and 1 at the bottom.
pub fn read_document_scroll() -> f32 {
    let Some(window) = web::window() else {
        return 0.0;
    };
    let scroll_top = window.scroll_y().unwrap_or(0.0);
    let client_height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let scroll_height = window
        .document()
        .and_then(|d| d.document_element())
        .map(|el| el.scroll_height() as f64)
        .unwrap_or(0.0);
    scroll_progress(scroll_top, scroll_height, client_height)
}

/// Keeps `signal` in sync with the page scroll until dropped.
pub struct ScrollBinding {
    _scroll: Listener,
    _resize: Listener,
}

impl ScrollBinding {
    pub fn attach(signal: &ScrollSignal) -> Option<Self> {
        let window = web::window()?;
        let target: &web::EventTarget = window.unchecked_ref();
        signal.set(read_document_scroll());
        let on_scroll = signal.clone();
        let on_resize = signal.clone();
        Some(Self {
            _scroll: Listener::new(target, "scroll", move || {
                on_scroll.set(read_document_scroll())
            }),
            _resize: Listener::new(target, "resize", move || {
                on_resize.set(read_document_scroll())
            }),
        })
    }
}
