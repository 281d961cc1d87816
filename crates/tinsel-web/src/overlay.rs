use web_sys as web;

// The start overlay holds the "begin" button; it is hidden once the
// experience starts and never shown again.

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("start-overlay") {
        let _ = el.set_attribute("style", "display:none");
    }
}
