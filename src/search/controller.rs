//! SearchController: DOM Binding for the Search Engine
//!
//! Thin `#[wasm_bindgen]` facade that owns a [`SearchEngine`] and a
//! content container element. It writes transformed markup back through
//! `innerHTML`, re-queries the highlight markers, moves the
//! `current-match` class and smooth-scrolls the focused marker to the
//! viewport center.
//!
//! The page glue wires UI events to these methods explicitly (click on
//! the search trigger and Enter in the input both call `search`; the
//! panel toggle calls `setPanelVisible`). The controller installs no
//! listeners of its own.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use serde::{Deserialize, Serialize};
use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::notify::{self, ConsoleSink, Notice, NotificationSink};
use crate::search::engine::{FocusedMatch, SearchEngine, SearchOutcome, CURRENT_MATCH_CLASS, HIGHLIGHT_CLASS};

/// Default selector for the searchable legal text
pub const CONTENT_SELECTOR: &str = "article.regulation-content";

// =============================================================================
// Types
// =============================================================================

/// Search result returned to the page glue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Number of matches found
    pub count: usize,
    /// 1-based position of the focused match, if any
    pub position: Option<usize>,
    /// Toast message in site copy
    pub message: String,
    /// Counter label for the result-count display
    pub label: String,
}

// =============================================================================
// SearchController
// =============================================================================

/// Binds the search state machine to one content container
#[wasm_bindgen]
pub struct SearchController {
    engine: SearchEngine,
    container: Option<Element>,
    /// Marker elements of the active pass, in document order
    marks: Vec<Element>,
    sink: ConsoleSink,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SearchController {
    /// Create a controller bound to the default content selector.
    /// A missing container degrades to a no-op controller.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_selector(CONTENT_SELECTOR)
    }

    /// Create a controller bound to a custom selector
    #[wasm_bindgen(js_name = withSelector)]
    pub fn with_selector(selector: &str) -> Self {
        let container = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(selector).ok().flatten());

        if container.is_none() {
            web_sys::console::warn_1(
                &format!("[SearchController] no element matches \"{}\"", selector).into(),
            );
        }

        Self {
            engine: SearchEngine::new(),
            container,
            marks: Vec::new(),
            sink: ConsoleSink,
        }
    }

    /// True when a content container was found at construction
    #[wasm_bindgen(js_name = hasContainer)]
    pub fn has_container(&self) -> bool {
        self.container.is_some()
    }

    /// Number of matches of the active pass
    #[wasm_bindgen(js_name = matchCount)]
    pub fn match_count(&self) -> usize {
        self.engine.match_count()
    }

    /// True while a highlight pass is applied
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    /// Run a search and apply highlighting. Returns a [`SearchReport`].
    pub fn search(&mut self, query: &str) -> Result<JsValue, JsValue> {
        let container = match &self.container {
            Some(el) => el.clone(),
            None => return Ok(JsValue::NULL),
        };

        let outcome = self
            .engine
            .search(query, &container.inner_html())
            .map_err(|e| JsValue::from_str(&e))?;

        let report = match outcome {
            SearchOutcome::EmptyQuery { restore } => {
                if let Some(markup) = restore {
                    container.set_inner_html(&markup);
                }
                self.marks.clear();
                let notice = Notice::EmptyQuery;
                self.sink.notify(&notice);
                SearchReport {
                    count: 0,
                    position: None,
                    message: notice.message(),
                    label: String::new(),
                }
            }
            SearchOutcome::NoResults { restore } => {
                if let Some(markup) = restore {
                    container.set_inner_html(&markup);
                }
                self.marks.clear();
                let notice = Notice::NoResults;
                self.sink.notify(&notice);
                SearchReport {
                    count: 0,
                    position: None,
                    message: notice.message(),
                    label: notify::count_label(0),
                }
            }
            SearchOutcome::Results {
                markup,
                count,
                first,
            } => {
                container.set_inner_html(&markup);
                self.marks = collect_mark_elements(&container, query.trim());
                self.apply_focus(&first);
                let notice = Notice::Results { count };
                self.sink.notify(&notice);
                SearchReport {
                    count,
                    position: Some(first.position),
                    message: notice.message(),
                    label: notify::count_label(count),
                }
            }
        };

        serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Focus the next match, wrapping past the end
    #[wasm_bindgen(js_name = navigateNext)]
    pub fn navigate_next(&mut self) -> Result<JsValue, JsValue> {
        self.navigate(1)
    }

    /// Focus the previous match, wrapping past the start
    #[wasm_bindgen(js_name = navigatePrev)]
    pub fn navigate_prev(&mut self) -> Result<JsValue, JsValue> {
        self.navigate(-1)
    }

    /// Step the cursor by `direction`; returns the new counter label,
    /// or null when no search is active
    pub fn navigate(&mut self, direction: i32) -> Result<JsValue, JsValue> {
        match self.engine.navigate(direction) {
            Some(focused) => {
                self.apply_focus(&focused);
                Ok(JsValue::from_str(&notify::position_label(
                    focused.position,
                    focused.total,
                )))
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// Remove the active highlight pass and restore the original markup
    #[wasm_bindgen(js_name = clearHighlights)]
    pub fn clear_highlights(&mut self) {
        if let Some(markup) = self.engine.clear_highlights() {
            if let Some(container) = &self.container {
                container.set_inner_html(&markup);
            }
        }
        self.marks.clear();
    }

    /// Input-change hook: an emptied input while a pass is active clears it
    #[wasm_bindgen(js_name = inputChanged)]
    pub fn input_changed(&mut self, value: &str) {
        if value.trim().is_empty() && self.engine.is_active() {
            self.clear_highlights();
        }
    }

    /// Panel visibility hook. Hiding the panel always clears highlighting;
    /// returns true when the page glue must also blank the input field.
    #[wasm_bindgen(js_name = setPanelVisible)]
    pub fn set_panel_visible(&mut self, visible: bool) -> bool {
        if !visible {
            self.clear_highlights();
            return true;
        }
        false
    }
}

impl SearchController {
    /// Move the current-match class and scroll the focused marker into view
    fn apply_focus(&self, focused: &FocusedMatch) {
        if let Some(previous) = focused.previous {
            if let Some(el) = self.marks.get(previous) {
                let _ = el.class_list().remove_1(CURRENT_MATCH_CLASS);
            }
        }

        if let Some(el) = self.marks.get(focused.index) {
            let _ = el.class_list().add_1(CURRENT_MATCH_CLASS);

            let opts = ScrollIntoViewOptions::new();
            opts.set_behavior(ScrollBehavior::Smooth);
            // Centered vertically so the match is easy to spot
            opts.set_block(ScrollLogicalPosition::Center);
            el.scroll_into_view_with_scroll_into_view_options(&opts);
        }
    }
}

/// Query the container for highlight markers in document order. Marker
/// elements authored into the page (rather than inserted by the current
/// pass) carry different text and are skipped, keeping DOM indices
/// aligned with the engine's match set.
fn collect_mark_elements(container: &Element, query: &str) -> Vec<Element> {
    let selector = format!("mark.{}", HIGHLIGHT_CLASS);
    let query_lower = query.to_lowercase();
    let mut marks = Vec::new();

    if let Ok(nodes) = container.query_selector_all(&selector) {
        for i in 0..nodes.length() {
            if let Some(node) = nodes.item(i) {
                if let Ok(el) = node.dyn_into::<Element>() {
                    let text = el.text_content().unwrap_or_default();
                    if text.to_lowercase() == query_lower {
                        marks.push(el);
                    }
                }
            }
        }
    }

    marks
}
