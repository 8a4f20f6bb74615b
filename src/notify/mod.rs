//! Notices: User-Facing Transient Messages
//!
//! The search subsystem reports outcomes ("no query", "N results",
//! "no results") as notices. Rendering produces the site's zh-TW copy;
//! the sink trait keeps the engine decoupled from whatever toast widget
//! the page uses.

use serde::{Deserialize, Serialize};

// =============================================================================
// Types
// =============================================================================

/// Severity of a notice, mapped to toast styling by the page glue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A user-visible transient message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Empty or whitespace-only query was submitted
    EmptyQuery,
    /// Search completed with at least one match
    Results { count: usize },
    /// Search completed without matches
    NoResults,
    /// A page fragment failed to load
    FragmentFailed { name: String },
    /// Page URL was copied to the clipboard
    LinkCopied,
    /// Clipboard copy was rejected or unavailable
    CopyFailed,
}

impl Notice {
    /// Severity for toast styling
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::EmptyQuery | Notice::NoResults => NoticeLevel::Info,
            Notice::Results { .. } | Notice::LinkCopied => NoticeLevel::Success,
            Notice::FragmentFailed { .. } | Notice::CopyFailed => NoticeLevel::Error,
        }
    }

    /// Site copy for this notice
    pub fn message(&self) -> String {
        match self {
            Notice::EmptyQuery => "請輸入要搜尋的關鍵字。".to_string(),
            Notice::Results { count } => format!("找到 {} 個結果。", count),
            Notice::NoResults => "找不到結果。".to_string(),
            Notice::FragmentFailed { name } => format!("{} 載入失敗！", name),
            Notice::LinkCopied => "網址已複製！".to_string(),
            Notice::CopyFailed => "複製網址失敗，請另開新視窗，或手動複製。".to_string(),
        }
    }
}

/// Counter label shown next to the navigation buttons
pub fn position_label(position: usize, total: usize) -> String {
    format!("第（{}/{}）個結果", position, total)
}

/// Counter label shown right after a search completes
pub fn count_label(count: usize) -> String {
    if count > 0 {
        format!("找到 {} 個結果", count)
    } else {
        "找不到結果".to_string()
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Destination for notices; the page supplies the real toast widget
pub trait NotificationSink {
    fn notify(&mut self, notice: &Notice);
}

/// Sink that writes to the browser console, used by the WASM facades
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&mut self, notice: &Notice) {
        let line = format!("[Notice] {}", notice.message());
        match notice.level() {
            NoticeLevel::Error => web_sys::console::error_1(&line.into()),
            _ => web_sys::console::log_1(&line.into()),
        }
    }
}

/// Sink that records notices, for tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub notices: Vec<Notice>,
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_site_copy() {
        assert_eq!(Notice::EmptyQuery.message(), "請輸入要搜尋的關鍵字。");
        assert_eq!(Notice::Results { count: 3 }.message(), "找到 3 個結果。");
        assert_eq!(Notice::NoResults.message(), "找不到結果。");
    }

    #[test]
    fn test_levels() {
        assert_eq!(Notice::EmptyQuery.level(), NoticeLevel::Info);
        assert_eq!(Notice::Results { count: 1 }.level(), NoticeLevel::Success);
        assert_eq!(Notice::NoResults.level(), NoticeLevel::Info);
        assert_eq!(Notice::LinkCopied.level(), NoticeLevel::Success);
        assert_eq!(Notice::CopyFailed.level(), NoticeLevel::Error);
        assert_eq!(
            Notice::FragmentFailed {
                name: "頁尾".to_string()
            }
            .level(),
            NoticeLevel::Error
        );
    }

    #[test]
    fn test_clipboard_messages_match_site_copy() {
        assert_eq!(Notice::LinkCopied.message(), "網址已複製！");
        assert_eq!(
            Notice::CopyFailed.message(),
            "複製網址失敗，請另開新視窗，或手動複製。"
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(position_label(2, 5), "第（2/5）個結果");
        assert_eq!(count_label(3), "找到 3 個結果");
        assert_eq!(count_label(0), "找不到結果");
    }

    #[test]
    fn test_recording_sink_collects() {
        let mut sink = RecordingSink::default();
        sink.notify(&Notice::NoResults);
        sink.notify(&Notice::Results { count: 2 });
        assert_eq!(sink.notices.len(), 2);
        assert_eq!(sink.notices[1], Notice::Results { count: 2 });
    }

    #[test]
    fn test_notice_serializes_tagged() {
        let json = serde_json::to_string(&Notice::Results { count: 4 }).unwrap();
        assert!(json.contains("\"kind\":\"results\""));
        assert!(json.contains("\"count\":4"));
    }
}
