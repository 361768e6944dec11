use tracing::debug;

use super::Tokenizer;
use crate::models::Document;

/// A document judged relevant to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredHit<'a> {
    /// The matched document, borrowed from the tenant's corpus
    pub document: &'a Document,
    /// Number of distinct query tokens found in the document (always >= 1)
    pub score: usize,
}

/// Scores `documents` against `question` and returns the best `top_k`.
///
/// A document's score is the number of distinct question tokens that occur
/// anywhere in its lowercased content. Matching is plain substring
/// containment, so the token "car" also matches "cards". Documents scoring
/// zero are dropped. Hits are ordered by score, highest first; equal scores
/// keep their corpus order.
///
/// A question with no tokens matches nothing, whatever the corpus holds.
///
/// # Examples
///
/// ```
/// use ragdesk::Document;
/// use ragdesk::retrieval::rank;
///
/// let docs = vec![
///     Document::new("a.txt", "Procedure resiliation"),
///     Document::new("b.txt", "Procedure sinistre: declarer"),
/// ];
///
/// let hits = rank(&docs, "sinistre procedure", 3);
/// assert_eq!(hits[0].document.filename, "b.txt");
/// assert_eq!(hits[0].score, 2);
/// assert_eq!(hits[1].score, 1);
/// ```
pub fn rank<'a>(documents: &'a [Document], question: &str, top_k: usize) -> Vec<ScoredHit<'a>> {
    let query_tokens = Tokenizer::token_set(question);
    if query_tokens.is_empty() {
        debug!("question has no tokens, skipping ranking");
        return Vec::new();
    }

    let mut hits: Vec<ScoredHit<'a>> = documents
        .iter()
        .filter_map(|document| {
            let content = document.content.to_lowercase();
            let score = query_tokens
                .iter()
                .filter(|token| content.contains(token.as_str()))
                .count();
            (score > 0).then_some(ScoredHit { document, score })
        })
        .collect();

    // `sort_by` is stable: ties stay in corpus order.
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(top_k);

    debug!(
        documents = documents.len(),
        query_tokens = query_tokens.len(),
        hits = hits.len(),
        "ranked documents"
    );
    hits
}
