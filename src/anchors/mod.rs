//! Article Anchors: Deep Links for Legal Articles
//!
//! Every article marker (`span.art`) gets a deterministic anchor ID
//! derived from its label. `第12條` becomes `article-12`, `第12條之3`
//! becomes `article-12-3`; labels that don't follow the pattern fall back
//! to a positional ID so deep links stay stable within a page revision.

use regex::Regex;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

/// Selector for article markers
pub const ARTICLE_SPAN_SELECTOR: &str = "span.art";

/// Class carried by the injected anchor link
pub const ANCHOR_LINK_CLASS: &str = "law-btn-anchor";

/// Display text of the injected anchor link
pub const ANCHOR_LINK_TEXT: &str = "＃";

// =============================================================================
// Types
// =============================================================================

/// An anchor ID assignment for one article marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorAssignment {
    /// The generated anchor ID
    pub anchor_id: String,
    /// True when the label matched the article pattern; false for the
    /// positional fallback
    pub from_label: bool,
}

// =============================================================================
// AnchorGenerator
// =============================================================================

/// Derives anchor IDs from article labels
pub struct AnchorGenerator {
    article_re: Regex,
}

impl Default for AnchorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorGenerator {
    pub fn new() -> Self {
        Self {
            article_re: Regex::new(r"^第(\d+)條(?:之(\d+))?$").unwrap(),
        }
    }

    /// Anchor ID for an article label. `position` is the zero-based index
    /// of the marker in document order, used for the fallback ID.
    pub fn anchor_id(&self, label: &str, position: usize) -> AnchorAssignment {
        let trimmed = label.trim();

        if let Some(caps) = self.article_re.captures(trimmed) {
            let n = &caps[1];
            let anchor_id = match caps.get(2) {
                Some(m) => format!("article-{}-{}", n, m.as_str()),
                None => format!("article-{}", n),
            };
            return AnchorAssignment {
                anchor_id,
                from_label: true,
            };
        }

        AnchorAssignment {
            anchor_id: format!("article-no-{}", position + 1),
            from_label: false,
        }
    }
}

// =============================================================================
// WASM facade
// =============================================================================

/// Walk all `span.art` markers: assign anchor IDs and prepend a `＃`
/// link pointing at the marker itself. Returns the number of markers
/// decorated. Markers that already carry an ID keep it.
#[wasm_bindgen(js_name = decorateArticleAnchors)]
pub fn decorate_article_anchors() -> Result<usize, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let spans = document
        .query_selector_all(ARTICLE_SPAN_SELECTOR)
        .map_err(|_| JsValue::from_str("invalid article selector"))?;

    let generator = AnchorGenerator::new();
    let mut decorated = 0;

    for i in 0..spans.length() {
        let span: Element = match spans.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            Some(el) => el,
            None => continue,
        };

        let label = span.text_content().unwrap_or_default();
        let assignment = generator.anchor_id(&label, i as usize);
        if !assignment.from_label {
            web_sys::console::warn_1(
                &format!(
                    "[Anchors] \"{}\" does not match the article pattern, using {}",
                    label.trim(),
                    assignment.anchor_id
                )
                .into(),
            );
        }

        let anchor = document
            .create_element("a")
            .map_err(|_| JsValue::from_str("failed to create anchor element"))?;
        anchor
            .set_attribute("href", &format!("#{}", assignment.anchor_id))
            .map_err(|_| JsValue::from_str("failed to set anchor href"))?;
        let _ = anchor.class_list().add_1(ANCHOR_LINK_CLASS);
        anchor.set_text_content(Some(ANCHOR_LINK_TEXT));

        match span.first_child() {
            Some(first) => {
                span.insert_before(&anchor, Some(&first))
                    .map_err(|_| JsValue::from_str("failed to insert anchor"))?;
            }
            None => {
                span.append_child(&anchor)
                    .map_err(|_| JsValue::from_str("failed to append anchor"))?;
            }
        }

        if span.id().is_empty() {
            span.set_id(&assignment.anchor_id);
        }
        decorated += 1;
    }

    web_sys::console::log_1(&format!("[Anchors] decorated {} article markers", decorated).into());
    Ok(decorated)
}

/// Smooth-scroll to the element named by `location.hash`, if any.
/// Returns true when a target was found and scrolled to.
#[wasm_bindgen(js_name = scrollToHashTarget)]
pub fn scroll_to_hash_target() -> Result<bool, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let hash = window
        .location()
        .hash()
        .map_err(|_| JsValue::from_str("failed to read location.hash"))?;
    if hash.is_empty() || hash == "#" {
        return Ok(false);
    }

    match document.query_selector(&hash).ok().flatten() {
        Some(target) => {
            let opts = ScrollIntoViewOptions::new();
            opts.set_behavior(ScrollBehavior::Smooth);
            opts.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&opts);
            Ok(true)
        }
        None => {
            web_sys::console::warn_1(&format!("[Anchors] no element for {}", hash).into());
            Ok(false)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
