//! Fragment Loader: Shared Header/Footer/Button-Bar Injection
//!
//! Static pages share HTML fragments that are fetched at load time and
//! injected into named placeholders. All standard fragments are loaded
//! "wait for all, regardless of individual failure": one failed fetch
//! paints an inline error block in its placeholder and never blocks the
//! others. Fragment loading is fully independent of the search subsystem.
//!
//! Pure helpers (specs, reports, error block, footer timestamp) stay
//! `web_sys`-free for native testing.

use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Document, Response};

/// Placeholder ID of the footer year span
pub const CURRENT_YEAR_SPAN_ID: &str = "current-year";

/// Placeholder ID of the footer last-updated span
pub const LAST_UPDATED_SPAN_ID: &str = "last-updated";

/// Placeholder ID of the footer container
pub const FOOTER_PLACEHOLDER_ID: &str = "main-footer";

// =============================================================================
// Types
// =============================================================================

/// One fragment to load: source URL, target placeholder, display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSpec {
    pub url: String,
    pub placeholder_id: String,
    /// Descriptive name used in error blocks and logs
    pub name: String,
}

impl FragmentSpec {
    pub fn new(url: &str, placeholder_id: &str, name: &str) -> Self {
        Self {
            url: url.to_string(),
            placeholder_id: placeholder_id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Per-fragment load result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentReport {
    pub name: String,
    pub url: String,
    pub ok: bool,
    /// Failure detail, absent on success
    pub detail: Option<String>,
}

/// Aggregate result of a load pass over several fragments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadSummary {
    pub reports: Vec<FragmentReport>,
}

impl LoadSummary {
    /// Fold per-fragment reports into a summary, preserving request order
    pub fn from_reports(reports: Vec<FragmentReport>) -> Self {
        Self { reports }
    }

    pub fn loaded_count(&self) -> usize {
        self.reports.iter().filter(|r| r.ok).count()
    }

    pub fn failed_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.ok).count()
    }

    /// True when the named fragment loaded successfully
    pub fn succeeded(&self, name: &str) -> bool {
        self.reports.iter().any(|r| r.name == name && r.ok)
    }
}

/// The three fragments every page loads
pub fn standard_fragments() -> Vec<FragmentSpec> {
    vec![
        FragmentSpec::new("../components/header.html", "main-header", "頁首"),
        FragmentSpec::new("../components/footer.html", FOOTER_PLACEHOLDER_ID, "頁尾"),
        FragmentSpec::new("../components/buttons.html", "button-container", "功能列表"),
    ]
}

/// Inline error block painted into a placeholder when its fetch fails
pub fn error_block(name: &str) -> String {
    format!(
        "<p style=\"color:red; text-align:center;\">{} 載入失敗！請檢查檔案路徑或網路連線。</p>",
        name
    )
}

/// Footer timestamp, local time, minute precision
pub fn footer_timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M").to_string()
}

// =============================================================================
// WASM facade
// =============================================================================

fn document() -> Result<Document, String> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document".to_string())
}

/// Fetch a URL and return its body text
async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "no window".to_string())?;

    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("fetch failed: {:?}", e))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "fetch did not yield a Response".to_string())?;

    if !resp.ok() {
        return Err(format!("網路回應錯誤: {} {}", resp.status(), resp.status_text()));
    }

    let text = JsFuture::from(resp.text().map_err(|e| format!("body read failed: {:?}", e))?)
        .await
        .map_err(|e| format!("body read failed: {:?}", e))?;
    text.as_string()
        .ok_or_else(|| "response body was not text".to_string())
}

/// Load one fragment and inject it into its placeholder
async fn load_one(spec: &FragmentSpec) -> FragmentReport {
    let placeholder = match document()
        .ok()
        .and_then(|d| d.get_element_by_id(&spec.placeholder_id))
    {
        Some(el) => el,
        None => {
            web_sys::console::warn_1(
                &format!("[Fragments] placeholder \"{}\" not found", spec.placeholder_id).into(),
            );
            return FragmentReport {
                name: spec.name.clone(),
                url: spec.url.clone(),
                ok: false,
                detail: Some("placeholder missing".to_string()),
            };
        }
    };

    match fetch_text(&spec.url).await {
        Ok(html) => {
            placeholder.set_inner_html(&html);
            web_sys::console::log_1(
                &format!("[Fragments] {} ({}) loaded", spec.name, spec.url).into(),
            );
            FragmentReport {
                name: spec.name.clone(),
                url: spec.url.clone(),
                ok: true,
                detail: None,
            }
        }
        Err(err) => {
            web_sys::console::error_1(
                &format!("[Fragments] {} ({}) failed: {}", spec.name, spec.url, err).into(),
            );
            placeholder.set_inner_html(&error_block(&spec.name));
            FragmentReport {
                name: spec.name.clone(),
                url: spec.url.clone(),
                ok: false,
                detail: Some(err),
            }
        }
    }
}

/// Load a single fragment by URL into the given placeholder
#[wasm_bindgen(js_name = loadFragment)]
pub async fn load_fragment(
    url: String,
    placeholder_id: String,
    name: String,
) -> Result<JsValue, JsValue> {
    let report = load_one(&FragmentSpec::new(&url, &placeholder_id, &name)).await;
    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Load header, footer and button bar. Every fragment is attempted; the
/// footer info is refreshed only when the footer itself loaded. Returns a
/// [`LoadSummary`].
#[wasm_bindgen(js_name = loadStandardFragments)]
pub async fn load_standard_fragments() -> Result<JsValue, JsValue> {
    // All three fetches are issued up front and settled together; a slow
    // or failing fragment never blocks the others. Each inner future
    // resolves to a report even on fetch failure, so the join sees no
    // rejections and every placeholder is accounted for.
    let promises = js_sys::Array::new();
    for spec in standard_fragments() {
        promises.push(&future_to_promise(async move {
            let report = load_one(&spec).await;
            serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
        }));
    }

    let settled = JsFuture::from(js_sys::Promise::all(&promises)).await?;
    let values: js_sys::Array = settled
        .dyn_into()
        .map_err(|_| JsValue::from_str("fragment join did not yield an array"))?;

    let mut reports = Vec::with_capacity(values.length() as usize);
    for value in values.iter() {
        let report: FragmentReport = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        reports.push(report);
    }
    let summary = LoadSummary::from_reports(reports);

    if summary.succeeded("頁尾") {
        update_footer_info()?;
    }

    web_sys::console::log_1(
        &format!(
            "[Fragments] load pass complete: {} ok, {} failed",
            summary.loaded_count(),
            summary.failed_count()
        )
        .into(),
    );

    serde_wasm_bindgen::to_value(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Refresh the dynamic footer spans: current year and last-updated stamp
#[wasm_bindgen(js_name = updateFooterInfo)]
pub fn update_footer_info() -> Result<(), JsValue> {
    let document = document().map_err(|e| JsValue::from_str(&e))?;
    let footer = match document.get_element_by_id(FOOTER_PLACEHOLDER_ID) {
        Some(el) => el,
        None => return Ok(()),
    };

    let now = Local::now();

    match footer
        .query_selector(&format!("#{}", CURRENT_YEAR_SPAN_ID))
        .ok()
        .flatten()
    {
        Some(span) => span.set_text_content(Some(&now.year().to_string())),
        None => web_sys::console::warn_1(
            &format!("[Fragments] footer span \"{}\" not found", CURRENT_YEAR_SPAN_ID).into(),
        ),
    }

    match footer
        .query_selector(&format!("#{}", LAST_UPDATED_SPAN_ID))
        .ok()
        .flatten()
    {
        Some(span) => span.set_text_content(Some(&footer_timestamp(&now))),
        None => web_sys::console::warn_1(
            &format!("[Fragments] footer span \"{}\" not found", LAST_UPDATED_SPAN_ID).into(),
        ),
    }

    Ok(())
}

/// Load the search panel fragment and insert it right after the content
/// container. Returns false when the container is missing.
#[wasm_bindgen(js_name = loadSearchPanel)]
pub async fn load_search_panel(url: String) -> Result<bool, JsValue> {
    let document = document().map_err(|e| JsValue::from_str(&e))?;
    let target = match document
        .query_selector(crate::search::CONTENT_SELECTOR)
        .ok()
        .flatten()
    {
        Some(el) => el,
        None => {
            web_sys::console::warn_1(
                &format!(
                    "[Fragments] no {} to insert the search panel after",
                    crate::search::CONTENT_SELECTOR
                )
                .into(),
            );
            return Ok(false);
        }
    };

    let html = match fetch_text(&url).await {
        Ok(html) => html,
        Err(err) => {
            web_sys::console::error_1(
                &format!("[Fragments] search panel ({}) failed: {}", url, err).into(),
            );
            return Ok(false);
        }
    };

    let holder = document
        .create_element("div")
        .map_err(|_| JsValue::from_str("failed to create holder element"))?;
    holder.set_inner_html(&html);

    let parent = target
        .parent_node()
        .ok_or_else(|| JsValue::from_str("content container has no parent"))?;
    let after = target.next_sibling();

    // Move the parsed children out of the holder, preserving order
    while let Some(child) = holder.first_child() {
        parent
            .insert_before(&child, after.as_ref())
            .map_err(|_| JsValue::from_str("failed to insert search panel"))?;
    }

    web_sys::console::log_1(&format!("[Fragments] search panel ({}) inserted", url).into());
    Ok(true)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_standard_fragments_targets() {
        let specs = standard_fragments();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].placeholder_id, "main-header");
        assert_eq!(specs[1].placeholder_id, FOOTER_PLACEHOLDER_ID);
        assert_eq!(specs[2].placeholder_id, "button-container");
        assert!(specs.iter().all(|s| s.url.ends_with(".html")));
    }

    #[test]
    fn test_error_block_names_fragment() {
        let block = error_block("頁首");
        assert!(block.contains("頁首 載入失敗"));
        assert!(block.starts_with("<p"));
    }

    #[test]
    fn test_footer_timestamp_shape() {
        let dt = Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(footer_timestamp(&dt), "2025-03-07 09:05");
    }

    #[test]
    fn test_summary_counts_are_failure_independent() {
        let reports: Vec<FragmentReport> = [("頁首", true), ("頁尾", false), ("功能列表", true)]
            .iter()
            .map(|(name, ok)| FragmentReport {
                name: name.to_string(),
                url: format!("../components/{}.html", name),
                ok: *ok,
                detail: (!ok).then(|| "網路回應錯誤: 404 Not Found".to_string()),
            })
            .collect();

        let summary = LoadSummary::from_reports(reports);
        assert_eq!(summary.loaded_count(), 2);
        assert_eq!(summary.failed_count(), 1);
        assert!(summary.succeeded("頁首"));
        assert!(!summary.succeeded("頁尾"));
        // Settled order follows request order, failures included
        assert_eq!(summary.reports[1].name, "頁尾");
    }
}
