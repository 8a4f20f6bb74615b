//! Theme Switcher Persistence
//!
//! The site offers several UI themes; the chosen one is kept in
//! `localStorage` and applied as the `data-theme` attribute on the root
//! element. Resolution (saved value vs. default) is pure so the decision
//! table is testable without a browser.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// localStorage key the theme is stored under
pub const THEME_STORAGE_KEY: &str = "daisyuiTheme";

/// Theme applied when nothing is stored
pub const DEFAULT_THEME: &str = "default";

// =============================================================================
// Types
// =============================================================================

/// Outcome of theme resolution at page load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeResolution {
    /// Theme name to apply
    pub theme: String,
    /// True when the theme came from storage
    pub from_storage: bool,
    /// True when the resolved theme must be written back to storage
    pub persist: bool,
}

/// Decide which theme to apply given the stored value
pub fn resolve_theme(saved: Option<&str>, default_theme: &str) -> ThemeResolution {
    match saved {
        Some(theme) if !theme.trim().is_empty() => ThemeResolution {
            theme: theme.to_string(),
            from_storage: true,
            persist: false,
        },
        _ => ThemeResolution {
            theme: default_theme.to_string(),
            from_storage: false,
            persist: true,
        },
    }
}

// =============================================================================
// ThemeManager
// =============================================================================

/// Applies and persists the UI theme
#[wasm_bindgen]
pub struct ThemeManager {
    storage_key: String,
    default_theme: String,
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ThemeManager {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            storage_key: THEME_STORAGE_KEY.to_string(),
            default_theme: DEFAULT_THEME.to_string(),
        }
    }

    /// Resolve the stored theme and apply it. Returns the applied theme
    /// name so the page glue can sync the radio buttons.
    pub fn init(&self) -> Result<String, JsValue> {
        let saved = self.read_saved();
        let resolution = resolve_theme(saved.as_deref(), &self.default_theme);

        self.apply(&resolution.theme)?;
        if resolution.persist {
            self.persist(&resolution.theme);
        }

        web_sys::console::log_1(
            &format!(
                "[Theme] applied \"{}\" ({})",
                resolution.theme,
                if resolution.from_storage {
                    "from storage"
                } else {
                    "default"
                }
            )
            .into(),
        );
        Ok(resolution.theme)
    }

    /// Apply a theme and persist the choice
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, theme: &str) -> Result<(), JsValue> {
        self.apply(theme)?;
        self.persist(theme);
        web_sys::console::log_1(&format!("[Theme] switched to \"{}\"", theme).into());
        Ok(())
    }
}

impl ThemeManager {
    fn read_saved(&self) -> Option<String> {
        web_sys::window()?
            .local_storage()
            .ok()
            .flatten()?
            .get_item(&self.storage_key)
            .ok()
            .flatten()
    }

    fn persist(&self, theme: &str) {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        match storage {
            Some(storage) => {
                if storage.set_item(&self.storage_key, theme).is_err() {
                    web_sys::console::warn_1(&"[Theme] failed to persist theme".into());
                }
            }
            None => web_sys::console::warn_1(&"[Theme] localStorage unavailable".into()),
        }
    }

    fn apply(&self, theme: &str) -> Result<(), JsValue> {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
            .ok_or_else(|| JsValue::from_str("no document element"))?;
        root.set_attribute("data-theme", theme)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_theme_wins() {
        let r = resolve_theme(Some("dracula"), DEFAULT_THEME);
        assert_eq!(r.theme, "dracula");
        assert!(r.from_storage);
        assert!(!r.persist);
    }

    #[test]
    fn test_missing_theme_falls_back_and_persists() {
        let r = resolve_theme(None, DEFAULT_THEME);
        assert_eq!(r.theme, DEFAULT_THEME);
        assert!(!r.from_storage);
        assert!(r.persist);
    }

    #[test]
    fn test_blank_stored_value_is_treated_as_missing() {
        let r = resolve_theme(Some("   "), "cupcake");
        assert_eq!(r.theme, "cupcake");
        assert!(r.persist);
    }
}
