//! Budgeted packing of ranked documents into a single evidence blob.

use crate::models::Document;

/// Evidence handed to the model for one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceContext {
    /// Concatenated, labeled document blocks
    text: String,
    /// Files that contributed at least a prefix, in first-use order
    used_filenames: Vec<String>,
}

impl EvidenceContext {
    /// Returns the assembled context text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the files included in the context, in first-use order.
    pub fn used_filenames(&self) -> &[String] {
        &self.used_filenames
    }

    /// Returns true if no evidence made it into the context.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Formats the labeled block for the `ordinal`-th (1-based) document.
fn format_block(ordinal: usize, document: &Document) -> String {
    format!(
        "DOC {ordinal} (filename={}):\n{}\n\n",
        document.filename,
        document.content.trim()
    )
}

/// Packs `hits`, in rank order, into at most `max_chars` characters.
///
/// Each hit becomes a labeled block. Blocks are appended whole while they
/// fit. The first block that does not fit is cut to exactly the remaining
/// budget, its file is still recorded as used, and packing stops. Once the
/// budget reaches zero nothing more is added. The final text is trimmed, so
/// it never exceeds `max_chars` characters.
///
/// # Examples
///
/// ```
/// use ragdesk::Document;
/// use ragdesk::answerer::assemble_context;
///
/// let docs = vec![Document::new("a.txt", "alpha"), Document::new("b.txt", "beta")];
/// let context = assemble_context(&docs, 8000);
///
/// assert_eq!(context.text(), "DOC 1 (filename=a.txt):\nalpha\n\nDOC 2 (filename=b.txt):\nbeta");
/// assert_eq!(context.used_filenames(), ["a.txt", "b.txt"]);
/// ```
pub fn assemble_context(hits: &[Document], max_chars: usize) -> EvidenceContext {
    let mut text = String::new();
    let mut used_filenames: Vec<String> = Vec::new();
    let mut total = 0usize;

    for (index, document) in hits.iter().enumerate() {
        let remaining = max_chars.saturating_sub(total);
        if remaining == 0 {
            break;
        }

        let block = format_block(index + 1, document);
        let block_len = block.chars().count();

        if !used_filenames.contains(&document.filename) {
            used_filenames.push(document.filename.clone());
        }

        if block_len <= remaining {
            text.push_str(&block);
            total += block_len;
        } else {
            text.extend(block.chars().take(remaining));
            break;
        }
    }

    EvidenceContext {
        text: text.trim().to_string(),
        used_filenames,
    }
}
