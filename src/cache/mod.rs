//! Offline Cache Manifest
//!
//! Bookkeeping for the service worker: a versioned cache name plus an
//! explicit list of URLs to pre-cache. The worker script consumes the
//! manifest as JSON; on activate it deletes every cache whose name does
//! not match the current one. There is deliberately no invalidation
//! strategy beyond "new version, new name".

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Cache name prefix shared by all versions
pub const CACHE_NAME_PREFIX: &str = "laws-pwa-cache-v";

// =============================================================================
// CacheManifest
// =============================================================================

/// Versioned list of URLs to pre-cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    pub prefix: String,
    /// Version token, usually a content hash or build id
    pub version: String,
    pub urls: Vec<String>,
}

impl CacheManifest {
    /// Build a manifest. The version must be non-blank and every URL
    /// non-blank; duplicate URLs are rejected so the pre-cache pass
    /// stays deterministic.
    pub fn new(prefix: &str, version: &str, urls: Vec<String>) -> Result<Self, String> {
        if version.trim().is_empty() {
            return Err("cache version must not be empty".to_string());
        }
        for url in &urls {
            if url.trim().is_empty() {
                return Err("cache URL list contains an empty entry".to_string());
            }
        }
        let mut seen = std::collections::HashSet::new();
        for url in &urls {
            if !seen.insert(url.as_str()) {
                return Err(format!("duplicate cache URL: {}", url));
            }
        }

        Ok(Self {
            prefix: prefix.to_string(),
            version: version.to_string(),
            urls,
        })
    }

    /// Manifest for the site's standard page set
    pub fn site(version: &str) -> Result<Self, String> {
        let urls = [
            "../laws/",
            "../laws/index.html",
            "../laws/css/styles.css",
            "../laws/js/script.js",
            "../laws/act/act01.html",
            "../laws/act/act02.html",
            "../laws/act/act03.html",
            "../laws/act/act04.html",
            "../laws/act/act05.html",
            "../laws/act/act06.html",
            "../laws/act/act07.html",
            "../laws/act/act08.html",
            "../laws/direction/direction01.html",
            "../laws/direction/direction02.html",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self::new(CACHE_NAME_PREFIX, version, urls)
    }

    /// Full cache name for this version
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.prefix, self.version)
    }

    /// Given the caches currently present, the names to delete on
    /// activate: everything not matching the current cache name.
    pub fn stale_caches(&self, existing: &[String]) -> Vec<String> {
        let current = self.cache_name();
        existing
            .iter()
            .filter(|name| **name != current)
            .cloned()
            .collect()
    }

    /// True when the URL is part of the pre-cache list
    pub fn contains_url(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| e.to_string())
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid cache manifest: {}", e))
    }
}

// =============================================================================
// WASM facade
// =============================================================================

/// Cache manifest handle for the service worker script
#[wasm_bindgen]
pub struct OfflineCache {
    manifest: CacheManifest,
}

#[wasm_bindgen]
impl OfflineCache {
    /// Manifest for the site's standard page set at the given version
    #[wasm_bindgen(constructor)]
    pub fn new(version: &str) -> Result<OfflineCache, JsValue> {
        let manifest = CacheManifest::site(version).map_err(|e| JsValue::from_str(&e))?;
        Ok(Self { manifest })
    }

    /// Versioned cache name to open on install
    #[wasm_bindgen(js_name = cacheName)]
    pub fn cache_name(&self) -> String {
        self.manifest.cache_name()
    }

    /// URLs to pre-cache on install
    pub fn urls(&self) -> Vec<String> {
        self.manifest.urls.clone()
    }

    /// Names to delete on activate, given the caches currently present
    #[wasm_bindgen(js_name = staleCaches)]
    pub fn stale_caches(&self, existing: Vec<String>) -> Vec<String> {
        self.manifest.stale_caches(&existing)
    }

    /// The whole manifest as a plain JS object
    #[wasm_bindgen(js_name = toObject)]
    pub fn to_object(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.manifest).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> CacheManifest {
        CacheManifest::new(
            CACHE_NAME_PREFIX,
            "162574b",
            vec!["../laws/".to_string(), "../laws/index.html".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_cache_name_is_versioned() {
        assert_eq!(manifest().cache_name(), "laws-pwa-cache-v-162574b");
    }

    #[test]
    fn test_stale_caches_excludes_current() {
        let m = manifest();
        let existing = vec![
            "laws-pwa-cache-v-0a1b2c3".to_string(),
            m.cache_name(),
            "some-other-cache".to_string(),
        ];

        let stale = m.stale_caches(&existing);
        assert_eq!(stale.len(), 2);
        assert!(!stale.contains(&m.cache_name()));
    }

    #[test]
    fn test_validation_rejects_blank_version_and_urls() {
        assert!(CacheManifest::new(CACHE_NAME_PREFIX, "  ", vec![]).is_err());
        assert!(
            CacheManifest::new(CACHE_NAME_PREFIX, "v1", vec!["".to_string()]).is_err()
        );
        assert!(CacheManifest::new(
            CACHE_NAME_PREFIX,
            "v1",
            vec!["a.html".to_string(), "a.html".to_string()]
        )
        .is_err());
    }

    #[test]
    fn test_site_manifest_covers_pages() {
        let m = CacheManifest::site("v1").unwrap();
        assert!(m.contains_url("../laws/index.html"));
        assert!(m.contains_url("../laws/act/act08.html"));
        assert!(!m.contains_url("../laws/act/act99.html"));
    }

    #[test]
    fn test_json_round_trip() {
        let m = manifest();
        let parsed = CacheManifest::from_json(&m.to_json().unwrap()).unwrap();
        assert_eq!(parsed, m);
    }
}
