use crate::constants::{LOADER_ID, UI_CONTAINER_ID};
use web_sys as web;

/// Slide the loading overlay away once the scene has something to show.
#[inline]
pub fn hide_loader(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADER_ID) {
        let _ = el.set_attribute("style", "transform: translateY(-100%)");
    }
}

#[inline]
pub fn reveal_ui(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(UI_CONTAINER_ID) {
        let _ = el.class_list().remove_1("hidden");
    }
}
