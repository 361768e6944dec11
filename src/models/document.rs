use serde::{Deserialize, Serialize};

/// A single document in a tenant's corpus.
///
/// Documents are immutable once loaded. The filename is unique within the
/// owning tenant's set; content is the full text and may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File name as shown to callers and used in citations.
    pub filename: String,
    /// Full document text.
    pub content: String,
}

impl Document {
    /// Creates a new document.
    ///
    /// # Examples
    ///
    /// ```
    /// use ragdesk::Document;
    ///
    /// let doc = Document::new("a_resiliation.txt", "Procedure resiliation.");
    /// assert_eq!(doc.filename, "a_resiliation.txt");
    /// ```
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Returns true if this document can contribute evidence.
    ///
    /// A usable document has a non-blank filename and non-blank content.
    pub fn is_usable_evidence(&self) -> bool {
        !self.filename.trim().is_empty() && !self.content.trim().is_empty()
    }
}
