use crate::constants::{LOADING_OVERLAY_ID, LOADING_STATUS_SELECTOR, PROGRESS_ATTRIBUTE, PROGRESS_EVENT};
use flight_core::LoadProgress;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Report loading progress to the host page.
///
/// Updates `#loading-overlay` (attribute plus status text) when present and
/// always dispatches a `flight-progress` event on `window` carrying the
/// percentage, so pages without the overlay can still listen.
pub fn publish_progress(document: &web::Document, progress: &LoadProgress) {
    let percent = progress.percent().round();
    if let Some(el) = document.get_element_by_id(LOADING_OVERLAY_ID) {
        _ = el.set_attribute(PROGRESS_ATTRIBUTE, &format!("{}", percent));
        if let Ok(Some(status)) = el.query_selector(LOADING_STATUS_SELECTOR) {
            status.set_text_content(Some(&progress.status_text()));
        }
        let cl = el.class_list();
        if progress.is_done() {
            _ = cl.add_1("done");
        } else {
            _ = cl.remove_1("done");
        }
    }
    dispatch(percent);
}

fn dispatch(percent: f32) {
    let Some(window) = web::window() else {
        return;
    };
    let init = web::CustomEventInit::new();
    init.set_detail(&JsValue::from_f64(percent as f64));
    match web::CustomEvent::new_with_event_init_dict(PROGRESS_EVENT, &init) {
        Ok(ev) => {
            _ = window.dispatch_event(&ev);
        }
        Err(e) => log::warn!("[mount] progress event error: {:?}", e),
    }
}
