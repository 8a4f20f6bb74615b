//! Page Chrome: Back-To-Top, Copy Link, Paragraph Marking
//!
//! Small behaviors shared by every regulation page: the back-to-top
//! button that appears once the reader scrolls past a threshold, the
//! copy-page-link buttons, and the `only-one-par` class that restyles
//! articles holding exactly one paragraph. Visibility and marking rules
//! are pure; the facades apply them to the DOM.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use web_sys::{Element, ScrollBehavior, ScrollToOptions};

use crate::notify::Notice;

/// Scroll offset in pixels past which the back-to-top button shows
pub const SCROLL_TOP_THRESHOLD_PX: f64 = 250.0;

/// ID of the back-to-top button
pub const SCROLL_TO_TOP_BTN_ID: &str = "scrollToTopBtn";

/// Class toggled on the back-to-top button to show it
pub const SHOW_CLASS: &str = "show";

/// Class added to the sole paragraph of a single-paragraph article
pub const ONLY_ONE_PAR_CLASS: &str = "only-one-par";

// =============================================================================
// Rules
// =============================================================================

/// True when the back-to-top button should be visible at this offset
pub fn back_to_top_visible(scroll_offset: f64) -> bool {
    scroll_offset > SCROLL_TOP_THRESHOLD_PX
}

/// True when an article's sole paragraph gets the single-paragraph class
pub fn marks_single_paragraph(par_count: usize) -> bool {
    par_count == 1
}

// =============================================================================
// WASM facade
// =============================================================================

/// Sync the back-to-top button with the current scroll offset; the page
/// glue calls this from its scroll handler. Returns the resulting
/// visibility. A missing button degrades to a no-op.
#[wasm_bindgen(js_name = updateScrollTopButton)]
pub fn update_scroll_top_button() -> Result<bool, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let button = match window
        .document()
        .and_then(|d| d.get_element_by_id(SCROLL_TO_TOP_BTN_ID))
    {
        Some(el) => el,
        None => return Ok(false),
    };

    let offset = window.scroll_y().unwrap_or(0.0);
    let visible = back_to_top_visible(offset);
    if visible {
        let _ = button.class_list().add_1(SHOW_CLASS);
    } else {
        let _ = button.class_list().remove_1(SHOW_CLASS);
    }
    Ok(visible)
}

/// Smooth-scroll the window back to the top
#[wasm_bindgen(js_name = scrollToTop)]
pub fn scroll_to_top() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let opts = ScrollToOptions::new();
    opts.set_top(0.0);
    opts.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&opts);
    Ok(())
}

/// Walk all `.art-data` articles and keep the `only-one-par` class in
/// sync: added to the first paragraph when it is the only one, removed
/// otherwise. Returns the number of articles marked.
#[wasm_bindgen(js_name = markSingleParagraphArticles)]
pub fn mark_single_paragraph_articles() -> Result<usize, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let articles = document
        .query_selector_all(".art-data")
        .map_err(|_| JsValue::from_str("invalid article selector"))?;

    let mut marked = 0;
    for i in 0..articles.length() {
        let article: Element = match articles.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            Some(el) => el,
            None => continue,
        };

        let pars = article
            .query_selector_all(".par")
            .map_err(|_| JsValue::from_str("invalid paragraph selector"))?;
        let first = match article.query_selector(".par").ok().flatten() {
            Some(el) => el,
            None => continue,
        };

        if marks_single_paragraph(pars.length() as usize) {
            let _ = first.class_list().add_1(ONLY_ONE_PAR_CLASS);
            marked += 1;
        } else {
            let _ = first.class_list().remove_1(ONLY_ONE_PAR_CLASS);
        }
    }
    Ok(marked)
}

/// Copy the current page URL to the clipboard. Resolves to a [`Notice`]
/// the page glue can toast: success or the manual-copy fallback message.
#[wasm_bindgen(js_name = copyPageLink)]
pub async fn copy_page_link() -> Result<JsValue, JsValue> {
    let notice = match copy_page_link_inner().await {
        Ok(()) => Notice::LinkCopied,
        Err(err) => {
            web_sys::console::error_1(&format!("[Page] copy link failed: {}", err).into());
            Notice::CopyFailed
        }
    };
    serde_wasm_bindgen::to_value(&notice).map_err(|e| JsValue::from_str(&e.to_string()))
}

async fn copy_page_link_inner() -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
    let href = window
        .location()
        .href()
        .map_err(|_| "failed to read location.href".to_string())?;

    let clipboard = window.navigator().clipboard();
    JsFuture::from(clipboard.write_text(&href))
        .await
        .map_err(|e| format!("clipboard write rejected: {:?}", e))?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
