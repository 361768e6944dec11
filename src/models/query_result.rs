//! Externally observable result of a tenant query.

use serde::Serialize;

/// A document cited in a query result, with a display preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// File name of the cited document
    filename: String,
    /// Whitespace-collapsed preview of the document text
    snippet: String,
}

impl Source {
    /// Creates a new source entry.
    pub fn new(filename: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            snippet: snippet.into(),
        }
    }

    /// Returns the cited file name.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the preview text.
    pub fn snippet(&self) -> &str {
        &self.snippet
    }
}

/// Result of answering a question over one tenant's documents.
///
/// When `has_answer` is false the answer is absent and `sources` is empty;
/// `reason` then explains why. Results are only built through
/// [`QueryResult::answered`] and [`QueryResult::no_answer`], which keep those
/// fields consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    /// The answer text, present only when documents matched
    answer: Option<String>,
    /// Matched documents in rank order
    sources: Vec<Source>,
    /// True if at least one document matched the question
    has_answer: bool,
    /// Explanation when no answer could be produced
    reason: Option<String>,
}

impl QueryResult {
    /// Creates a result carrying an answer and its sources.
    pub fn answered(answer: String, sources: Vec<Source>) -> Self {
        Self {
            answer: Some(answer),
            sources,
            has_answer: true,
            reason: None,
        }
    }

    /// Creates a result indicating that nothing could be answered.
    pub fn no_answer(reason: impl Into<String>) -> Self {
        Self {
            answer: None,
            sources: Vec::new(),
            has_answer: false,
            reason: Some(reason.into()),
        }
    }

    /// Returns the answer text, if any.
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// Returns the cited sources in rank order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Returns true if documents matched and an answer was produced.
    pub fn has_answer(&self) -> bool {
        self.has_answer
    }

    /// Returns the reason no answer was produced.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_answer_has_no_answer_text_or_sources() {
        let result = QueryResult::no_answer("No relevant documents for this tenant.");
        assert!(!result.has_answer());
        assert_eq!(result.answer(), None);
        assert!(result.sources().is_empty());
        assert_eq!(result.reason(), Some("No relevant documents for this tenant."));
    }

    #[test]
    fn answered_result_has_no_reason() {
        let result = QueryResult::answered(
            "- a.txt: text".to_string(),
            vec![Source::new("a.txt", "text")],
        );
        assert!(result.has_answer());
        assert_eq!(result.answer(), Some("- a.txt: text"));
        assert_eq!(result.sources()[0].filename(), "a.txt");
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn answered_with_no_sources_still_reports_an_answer() {
        let result = QueryResult::answered("text".to_string(), Vec::new());
        assert!(result.has_answer());
        assert!(result.answer().is_some());
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn serialized_fields_agree_with_has_answer() {
        let answered = serde_json::to_value(QueryResult::answered(
            "- a.txt: text".to_string(),
            vec![Source::new("a.txt", "text")],
        ))
        .unwrap();
        assert_eq!(answered["has_answer"], true);
        assert!(answered["answer"].is_string());
        assert!(answered["reason"].is_null());

        let missed = serde_json::to_value(QueryResult::no_answer("nothing")).unwrap();
        assert_eq!(missed["has_answer"], false);
        assert!(missed["answer"].is_null());
        assert_eq!(missed["sources"], serde_json::json!([]));
    }

    #[test]
    fn serializes_absent_fields_as_null() {
        let json = serde_json::to_value(QueryResult::no_answer("nothing")).unwrap();
        assert!(json["answer"].is_null());
        assert_eq!(json["sources"], serde_json::json!([]));
        assert_eq!(json["has_answer"], false);
        assert_eq!(json["reason"], "nothing");
    }
}
