//! SearchEngine: In-Page Text Search with Highlight Navigation
//!
//! Literal, case-insensitive matching over the serialized markup of a
//! content container. The engine owns the full search state (original
//! snapshot, match set, cursor) and stays `web_sys`-free so it can be
//! unit-tested natively; `controller.rs` binds it to the DOM.
//!
//! Matching runs over the serialized markup string, not the plain text.
//! Occurrences inside tag names or attribute values are therefore
//! matchable; callers that need a narrower surface must pre-filter.
//! The match set is recorded during the replacement pass itself, so
//! marker-shaped text already present in the authored page (or a query
//! that happens to contain the literal marker close tag) never enters it.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// CSS class carried by every highlight marker
pub const HIGHLIGHT_CLASS: &str = "highlight";

/// CSS class carried by the single focused marker
pub const CURRENT_MATCH_CLASS: &str = "current-match";

// =============================================================================
// Types
// =============================================================================

/// One highlighted occurrence, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Byte offset of the marker element in the transformed markup
    pub start: usize,
    /// Byte offset one past the marker element
    pub end: usize,
    /// The matched text, original casing preserved
    pub text: String,
}

/// Result of focusing a match: which marker loses the current class,
/// which gains it, and the 1-based position to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusedMatch {
    /// Previously focused index, if any (its current-match class is stale)
    pub previous: Option<usize>,
    /// Newly focused index, always in `[0, total)`
    pub index: usize,
    /// 1-based position for display
    pub position: usize,
    /// Total number of matches
    pub total: usize,
}

/// Outcome of a search pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query was empty after trimming. If a pass was active its restore
    /// markup is returned and must be written back to the container.
    EmptyQuery { restore: Option<String> },
    /// No occurrences. The restore markup is present only when a previous
    /// pass was still applied; a fresh zero-result search leaves the
    /// container untouched.
    NoResults { restore: Option<String> },
    /// At least one occurrence. `markup` must be written back, after which
    /// `first` identifies the focused marker.
    Results {
        markup: String,
        count: usize,
        first: FocusedMatch,
    },
}

// =============================================================================
// SearchEngine
// =============================================================================

/// Search state machine over a single content container.
///
/// Idle: no snapshot held, match set empty. Active: snapshot held, match
/// set non-empty, cursor valid. A zero-result search collapses back to
/// Idle because no replacement occurred and the markup is unchanged.
#[derive(Debug, Default)]
pub struct SearchEngine {
    /// Unmodified markup, held only while a highlight pass is applied
    original_markup: Option<String>,
    /// Markers of the most recent search, in document order
    matches: Vec<MatchSpan>,
    /// Index of the focused match, if any
    cursor: Option<usize>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matches from the most recent search
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Matches of the most recent search, in document order
    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    /// Index of the focused match, if one has been focused
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// True while a highlight pass is applied to the container
    pub fn is_active(&self) -> bool {
        self.original_markup.is_some()
    }

    /// Run a search over the container's current markup.
    ///
    /// If a previous pass is still applied it is unconditionally removed
    /// first, so the new query always scans clean markup. The query is
    /// matched as literal text: every regex metacharacter is escaped.
    pub fn search(&mut self, query: &str, current_markup: &str) -> Result<SearchOutcome, String> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(SearchOutcome::EmptyQuery {
                restore: self.clear_highlights(),
            });
        }

        // Restore-then-reapply: markers from a prior pass never feed the
        // new scan.
        let had_active = self.is_active();
        let base = match self.original_markup.take() {
            Some(saved) => saved,
            None => current_markup.to_string(),
        };
        self.matches.clear();
        self.cursor = None;

        let pattern = format!("(?i){}", regex::escape(trimmed));
        let re = Regex::new(&pattern)
            .map_err(|e| format!("failed to build search pattern: {}", e))?;

        // Replace and record in one pass. Each span is known exactly as it
        // is emitted, so pre-existing marker elements in the base markup
        // are copied through untouched and never join the match set.
        let mut highlighted = String::with_capacity(base.len());
        let mut spans: Vec<MatchSpan> = Vec::new();
        let mut tail = 0;
        for found in re.find_iter(&base) {
            highlighted.push_str(&base[tail..found.start()]);
            let start = highlighted.len();
            highlighted.push_str(&format!(
                "<mark class=\"{}\">{}</mark>",
                HIGHLIGHT_CLASS,
                found.as_str()
            ));
            spans.push(MatchSpan {
                start,
                end: highlighted.len(),
                text: found.as_str().to_string(),
            });
            tail = found.end();
        }

        if spans.is_empty() {
            // Zero matches: the markup is unchanged, so the snapshot is
            // dropped and the engine stays Idle.
            return Ok(SearchOutcome::NoResults {
                restore: had_active.then_some(base),
            });
        }
        highlighted.push_str(&base[tail..]);

        self.matches = spans;
        self.original_markup = Some(base);

        let first = self
            .focus(0)
            .ok_or_else(|| "match set empty after replacement".to_string())?;

        Ok(SearchOutcome::Results {
            markup: highlighted,
            count: self.matches.len(),
            first,
        })
    }

    /// Remove the active highlight pass, if any.
    ///
    /// Returns the original markup to write back into the container.
    /// Idempotent: with no active pass this clears nothing and returns
    /// `None`.
    pub fn clear_highlights(&mut self) -> Option<String> {
        self.matches.clear();
        self.cursor = None;
        self.original_markup.take()
    }

    /// Focus the match at `index`, wrapping with a floored modulo so any
    /// integer (negative included) lands in `[0, len)`. No-op when the
    /// match set is empty.
    pub fn focus(&mut self, index: i64) -> Option<FocusedMatch> {
        let total = self.matches.len();
        if total == 0 {
            return None;
        }

        let n = total as i64;
        let wrapped = ((index % n) + n) % n;
        let idx = wrapped as usize;

        let previous = self.cursor;
        self.cursor = Some(idx);

        Some(FocusedMatch {
            previous,
            index: idx,
            position: idx + 1,
            total,
        })
    }

    /// Step the cursor by `direction` (+1 next, -1 previous), wrapping at
    /// either end. No-op when the match set is empty.
    pub fn navigate(&mut self, direction: i32) -> Option<FocusedMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let base = match self.cursor {
            Some(cursor) => cursor as i64 + direction as i64,
            // Not yet focused: step forward lands on the first match,
            // step backward on the last.
            None => {
                if direction >= 0 {
                    0
                } else {
                    -1
                }
            }
        };
        self.focus(base)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLES: &str = "<p><span class=\"art\">第一條</span> 本法依據組織章程訂定之。</p>\
                            <p><span class=\"art\">第二條</span> 本條施行細則另定之，違反本條者依罰則處理。</p>";

    fn results(outcome: SearchOutcome) -> (String, usize, FocusedMatch) {
        match outcome {
            SearchOutcome::Results {
                markup,
                count,
                first,
            } => (markup, count, first),
            other => panic!("expected Results, got {:?}", other),
        }
    }

    // -------------------------------------------------------------------------
    // Requirement 1: Every reported match equals the query case-insensitively
    // -------------------------------------------------------------------------
    #[test]
    fn test_matches_equal_query_case_insensitive() {
        let mut engine = SearchEngine::new();
        let markup = "<p>Alpha alpha ALPHA alphabet</p>";

        let (_, count, _) = results(engine.search("alpha", markup).unwrap());
        assert_eq!(count, 4); // includes the prefix of "alphabet"
        for span in engine.matches() {
            assert_eq!(span.text.to_lowercase(), "alpha");
        }
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Clear restores the exact pre-search snapshot
    // -------------------------------------------------------------------------
    #[test]
    fn test_clear_restores_byte_equal_markup() {
        let mut engine = SearchEngine::new();

        let (highlighted, _, _) = results(engine.search("條", ARTICLES).unwrap());
        assert_ne!(highlighted, ARTICLES);

        let restored = engine.clear_highlights().unwrap();
        assert_eq!(restored, ARTICLES);
        assert!(!engine.is_active());
        assert_eq!(engine.match_count(), 0);
        assert!(engine.cursor().is_none());
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Clear with no active search is a no-op
    // -------------------------------------------------------------------------
    #[test]
    fn test_clear_idempotent() {
        let mut engine = SearchEngine::new();
        assert!(engine.clear_highlights().is_none());

        results(engine.search("條", ARTICLES).unwrap());
        assert!(engine.clear_highlights().is_some());
        assert!(engine.clear_highlights().is_none());
    }

    // -------------------------------------------------------------------------
    // Requirement 4: focus() accepts any integer and never leaves range
    // -------------------------------------------------------------------------
    #[test]
    fn test_focus_wraps_any_integer() {
        let mut engine = SearchEngine::new();
        let (_, count, _) = results(engine.search("條", ARTICLES).unwrap());
        assert!(count >= 3);

        for index in [-1_i64, -7, 0, 1, 2, 5, 1_000_003, i64::MIN + 1, i64::MAX] {
            let focused = engine.focus(index).unwrap();
            assert!(focused.index < count);
            assert_eq!(focused.position, focused.index + 1);
            assert_eq!(focused.total, count);
            assert_eq!(engine.cursor(), Some(focused.index));
        }

        // Floored modulo: -1 wraps to the tail
        assert_eq!(engine.focus(-1).unwrap().index, count - 1);
    }

    // -------------------------------------------------------------------------
    // Requirement 5: Focus on an empty match set is a no-op
    // -------------------------------------------------------------------------
    #[test]
    fn test_focus_empty_set() {
        let mut engine = SearchEngine::new();
        assert!(engine.focus(0).is_none());
        assert!(engine.focus(-3).is_none());
        assert!(engine.navigate(1).is_none());
        assert!(engine.navigate(-1).is_none());
        assert!(engine.cursor().is_none());
    }

    // -------------------------------------------------------------------------
    // Requirement 6: Navigation wraps at both ends
    // -------------------------------------------------------------------------
    #[test]
    fn test_navigation_wraps() {
        let mut engine = SearchEngine::new();
        let (_, count, first) = results(engine.search("條", ARTICLES).unwrap());
        assert_eq!(first.index, 0);

        // Walk forward to the last match
        for expected in 1..count {
            assert_eq!(engine.navigate(1).unwrap().index, expected);
        }
        // One more step wraps to 0, and the previous index is reported so
        // the caller can strip the stale current-match class
        let wrapped = engine.navigate(1).unwrap();
        assert_eq!(wrapped.index, 0);
        assert_eq!(wrapped.previous, Some(count - 1));

        // Backward from 0 wraps to the tail
        let back = engine.navigate(-1).unwrap();
        assert_eq!(back.index, count - 1);
        assert_eq!(back.previous, Some(0));
    }

    // -------------------------------------------------------------------------
    // Requirement 7: Regex metacharacters in the query match literally
    // -------------------------------------------------------------------------
    #[test]
    fn test_literal_metacharacters() {
        let mut engine = SearchEngine::new();
        let markup = "<p>依第1條(之1)規定辦理。</p>";

        let (_, count, _) = results(engine.search("第1條(之1)", markup).unwrap());
        assert_eq!(count, 1);
        assert_eq!(engine.matches()[0].text, "第1條(之1)");

        // A pattern that would be invalid regex still searches fine
        let mut fresh = SearchEngine::new();
        let outcome = fresh.search("a(b", "<p>x a(b y</p>").unwrap();
        let (_, count, _) = results(outcome);
        assert_eq!(count, 1);
    }

    // -------------------------------------------------------------------------
    // Requirement 8: Zero matches leaves Idle with markup untouched
    // -------------------------------------------------------------------------
    #[test]
    fn test_no_results_stays_idle() {
        let mut engine = SearchEngine::new();
        let markup = "<p>第一條 本法依據章程訂定。</p>";

        match engine.search("罰則", markup).unwrap() {
            SearchOutcome::NoResults { restore } => assert!(restore.is_none()),
            other => panic!("expected NoResults, got {:?}", other),
        }
        assert!(!engine.is_active());
        assert_eq!(engine.match_count(), 0);
    }

    // -------------------------------------------------------------------------
    // Requirement 9: Zero matches after an active pass restores the container
    // -------------------------------------------------------------------------
    #[test]
    fn test_no_results_after_active_restores() {
        let mut engine = SearchEngine::new();
        results(engine.search("條", ARTICLES).unwrap());
        assert!(engine.is_active());

        match engine.search("zzz-not-there", ARTICLES).unwrap() {
            SearchOutcome::NoResults { restore } => {
                assert_eq!(restore.unwrap(), ARTICLES);
            }
            other => panic!("expected NoResults, got {:?}", other),
        }
        assert!(!engine.is_active());
    }

    // -------------------------------------------------------------------------
    // Requirement 10: Three occurrences -> count 3, cursor 0
    // -------------------------------------------------------------------------
    #[test]
    fn test_three_occurrences() {
        let mut engine = SearchEngine::new();
        let markup = "<p>第一條之一。第二條。第三條。</p>";

        let (highlighted, count, first) = results(engine.search("條", markup).unwrap());
        assert_eq!(count, 3);
        assert_eq!(first.index, 0);
        assert_eq!(first.position, 1);
        assert_eq!(first.total, 3);
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(
            highlighted.matches("<mark class=\"highlight\">").count(),
            3
        );
    }

    // -------------------------------------------------------------------------
    // Requirement 11: Empty and whitespace queries clear and report
    // -------------------------------------------------------------------------
    #[test]
    fn test_empty_query() {
        let mut engine = SearchEngine::new();

        match engine.search("", ARTICLES).unwrap() {
            SearchOutcome::EmptyQuery { restore } => assert!(restore.is_none()),
            other => panic!("expected EmptyQuery, got {:?}", other),
        }

        // Whitespace-only behaves the same, and clears an active pass
        results(engine.search("條", ARTICLES).unwrap());
        match engine.search("   ", "ignored").unwrap() {
            SearchOutcome::EmptyQuery { restore } => {
                assert_eq!(restore.unwrap(), ARTICLES);
            }
            other => panic!("expected EmptyQuery, got {:?}", other),
        }
        assert!(!engine.is_active());
    }

    // -------------------------------------------------------------------------
    // Requirement 12: Re-search restores first; markers never nest
    // -------------------------------------------------------------------------
    #[test]
    fn test_research_operates_on_clean_markup() {
        let mut engine = SearchEngine::new();
        let (highlighted, _, _) = results(engine.search("條", ARTICLES).unwrap());

        // The second search receives the highlighted markup (what the
        // container currently holds) but must scan the saved original.
        let (second, count, _) = results(engine.search("本法", &highlighted).unwrap());
        assert!(!second.contains("<mark class=\"highlight\">條</mark>"));
        assert_eq!(count, 1);

        let restored = engine.clear_highlights().unwrap();
        assert_eq!(restored, ARTICLES);
    }

    // -------------------------------------------------------------------------
    // Requirement 13: Match spans are ordered by document position
    // -------------------------------------------------------------------------
    #[test]
    fn test_match_order() {
        let mut engine = SearchEngine::new();
        results(engine.search("條", ARTICLES).unwrap());

        let spans = engine.matches();
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    // -------------------------------------------------------------------------
    // Requirement 14: Authored markers never join the match set
    // -------------------------------------------------------------------------
    #[test]
    fn test_preexisting_marker_not_in_match_set() {
        let mut engine = SearchEngine::new();
        let markup = "<p><mark class=\"highlight\">foo</mark> 第一條 第二條</p>";

        let (highlighted, count, first) = results(engine.search("條", markup).unwrap());
        assert_eq!(count, 2);
        assert_eq!(first.total, 2);
        for span in engine.matches() {
            assert_eq!(span.text, "條");
        }

        // The authored marker passes through untouched and restore is exact
        assert!(highlighted.contains("<mark class=\"highlight\">foo</mark>"));
        assert_eq!(engine.clear_highlights().unwrap(), markup);
    }

    // -------------------------------------------------------------------------
    // Requirement 15: A query containing the literal marker close tag
    // -------------------------------------------------------------------------
    #[test]
    fn test_query_containing_marker_close_tag() {
        let mut engine = SearchEngine::new();
        let markup = "<p>x a</mark>b y</p>";

        let (_, count, _) = results(engine.search("a</mark>b", markup).unwrap());
        assert_eq!(count, 1);
        assert_eq!(engine.matches()[0].text, "a</mark>b");

        assert_eq!(engine.clear_highlights().unwrap(), markup);
    }
}
