//! LexCore: Regulation Site Engine
//!
//! A Rust/WASM implementation of the interactive layer of a static
//! multi-page legal-document site (organizational statutes/regulations).
//!
//! # Architecture
//!
//! ## Search (the core)
//! - `search/engine.rs` - SearchEngine: literal case-insensitive highlight
//!   search over serialized markup, match set, wrapping cursor navigation
//! - `search/controller.rs` - SearchController: DOM binding, marker class
//!   management, smooth scroll, panel/input contract
//!
//! ## Page collaborators
//! - `fragments` - shared header/footer/button-bar injection, footer info
//! - `anchors` - deterministic `第N條[之M]` article anchors and hash scroll
//! - `theme` - theme persistence via localStorage / `data-theme`
//! - `cache` - versioned offline cache manifest for the service worker
//! - `page` - back-to-top button, copy-link, single-paragraph marking
//! - `notify` - user-facing notices and sinks
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { SearchController, loadStandardFragments, decorateArticleAnchors } from 'lexcore';
//!
//! await init();
//!
//! await loadStandardFragments();
//! decorateArticleAnchors();
//!
//! const search = new SearchController();
//! searchButton.addEventListener('click', () => {
//!   const report = search.search(searchInput.value);
//!   searchCount.textContent = report.label;
//! });
//! nextBtn.addEventListener('click', () => {
//!   searchCount.textContent = search.navigateNext() ?? '';
//! });
//! toggleBtn.addEventListener('click', () => {
//!   if (search.setPanelVisible(panelHidden)) searchInput.value = '';
//! });
//! ```

pub mod anchors;
pub mod cache;
pub mod fragments;
pub mod notify;
pub mod page;
pub mod search;
pub mod theme;

pub use anchors::*;
pub use cache::*;
pub use fragments::*;
pub use notify::*;
pub use page::*;
pub use search::*;
pub use theme::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("lexcore v{}", env!("CARGO_PKG_VERSION"))
}
