//! Result extraction policy
//!
//! A completed run reports its outcome through a fixed fallback chain:
//! final result, then the last extracted content, then a canned message if
//! the run at least finished, then failure. Each tier is consulted only
//! when the previous one yields nothing.

use crate::agent::RunHistory;
use crate::core::TaskResult;

/// Reported when the run finished without producing any content
pub const DONE_WITHOUT_CONTENT: &str =
    "Task completed, but no result content was produced";

/// Reported when the run stopped without finishing
pub const NOT_COMPLETED: &str = "task not completed";

/// Produce the task result from a completed run history
pub fn resolve_outcome(query: &str, history: &dyn RunHistory) -> TaskResult {
    if let Some(final_result) = history.final_result() {
        if !final_result.trim().is_empty() {
            return TaskResult::completed(query, final_result);
        }
    }

    if let Some(last) = history.extracted_content().last() {
        return TaskResult::completed(query, last.clone());
    }

    if history.is_done() {
        return TaskResult::completed(query, DONE_WITHOUT_CONTENT);
    }

    TaskResult::failed(query, NOT_COMPLETED)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted history for exercising every tier of the fallback
    struct Scripted {
        final_result: Option<String>,
        extracted: Vec<String>,
        done: bool,
    }

    impl RunHistory for Scripted {
        fn final_result(&self) -> Option<&str> {
            self.final_result.as_deref()
        }

        fn extracted_content(&self) -> &[String] {
            &self.extracted
        }

        fn is_done(&self) -> bool {
            self.done
        }
    }

    #[test]
    fn test_final_result_wins() {
        let history = Scripted {
            final_result: Some("the summary".to_string()),
            extracted: vec!["ignored".to_string()],
            done: true,
        };
        let result = resolve_outcome("q", &history);
        assert!(result.success);
        assert_eq!(result.result, "the summary");
        assert!(result.error.is_empty());
    }

    #[test]
    fn test_last_extracted_content() {
        let history = Scripted {
            final_result: None,
            extracted: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            done: true,
        };
        let result = resolve_outcome("q", &history);
        assert!(result.success);
        assert_eq!(result.result, "c");
    }

    #[test]
    fn test_blank_final_result_falls_through() {
        let history = Scripted {
            final_result: Some("   ".to_string()),
            extracted: vec!["fallback".to_string()],
            done: true,
        };
        let result = resolve_outcome("q", &history);
        assert!(result.success);
        assert_eq!(result.result, "fallback");
    }

    #[test]
    fn test_done_without_content() {
        let history = Scripted {
            final_result: None,
            extracted: Vec::new(),
            done: true,
        };
        let result = resolve_outcome("q", &history);
        assert!(result.success);
        assert_eq!(result.result, DONE_WITHOUT_CONTENT);
    }

    #[test]
    fn test_not_completed() {
        let history = Scripted {
            final_result: None,
            extracted: Vec::new(),
            done: false,
        };
        let result = resolve_outcome("q", &history);
        assert!(!result.success);
        assert!(result.result.is_empty());
        assert_eq!(result.error, NOT_COMPLETED);
    }

    #[test]
    fn test_query_is_echoed() {
        let history = Scripted {
            final_result: Some("r".to_string()),
            extracted: Vec::new(),
            done: true,
        };
        let result = resolve_outcome("summarize the page", &history);
        assert_eq!(result.task, "summarize the page");
    }
}
