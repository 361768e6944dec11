use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::answerer::GroundedAnswerer;
use crate::models::{QueryResult, Source, TenantCorpus, TenantId};
use crate::retrieval::{DEFAULT_SNIPPET_LEN, rank, snippet};

/// Hits considered per query unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// Reason reported when a question matches none of the tenant's documents.
pub const NO_RELEVANT_DOCUMENTS: &str = "No relevant documents for this tenant.";

/// Service layer answering questions over a tenant's documents.
///
/// QueryService holds a read-only corpus snapshot that is loaded once and
/// shared by every query. Queries hold no mutable state, so one service can
/// be used from many threads at once.
///
/// Without a [`GroundedAnswerer`] the answer is a deterministic list of
/// excerpts; with one, the answer is generated from the ranked documents.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use ragdesk::{Document, QueryService, TenantCorpus, TenantId};
///
/// let corpus = TenantCorpus::new().with_tenant(
///     "B",
///     vec![Document::new("b_sinistre.txt", "Procedure sinistre: declarer sous 5 jours.")],
/// );
/// let service = QueryService::new(Arc::new(corpus));
///
/// let result = service.query(&TenantId::new("B"), "sinistre procedure");
/// assert!(result.has_answer());
/// assert_eq!(result.sources()[0].filename(), "b_sinistre.txt");
///
/// let result = service.query(&TenantId::new("A"), "sinistre procedure");
/// assert!(!result.has_answer());
/// ```
#[derive(Debug, Clone)]
pub struct QueryService {
    corpus: Arc<TenantCorpus>,
    answerer: Option<GroundedAnswerer>,
    top_k: usize,
}

impl QueryService {
    /// Creates a QueryService over the given corpus snapshot.
    pub fn new(corpus: Arc<TenantCorpus>) -> Self {
        Self {
            corpus,
            answerer: None,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Uses `answerer` to generate answers instead of listing excerpts.
    #[must_use]
    pub fn with_answerer(mut self, answerer: GroundedAnswerer) -> Self {
        self.answerer = Some(answerer);
        self
    }

    /// Sets the number of hits considered per query.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Returns the corpus snapshot.
    pub fn corpus(&self) -> &TenantCorpus {
        &self.corpus
    }

    /// Returns the number of documents loaded per tenant.
    pub fn document_counts(&self) -> BTreeMap<TenantId, usize> {
        self.corpus.document_counts()
    }

    /// Answers `question` using only the documents owned by `tenant`.
    ///
    /// An unknown tenant is treated as one with no documents. When nothing
    /// matches, the result has no answer and reports
    /// [`NO_RELEVANT_DOCUMENTS`]. Otherwise the sources are the ranked hits
    /// with previews, in rank order.
    pub fn query(&self, tenant: &TenantId, question: &str) -> QueryResult {
        let documents = self.corpus.documents(tenant.as_str());
        let hits = rank(documents, question, self.top_k);

        debug!(
            tenant = %tenant,
            documents = documents.len(),
            hits = hits.len(),
            grounded = self.answerer.is_some(),
            "query ranked"
        );

        if hits.is_empty() {
            return QueryResult::no_answer(NO_RELEVANT_DOCUMENTS);
        }

        let sources: Vec<Source> = hits
            .iter()
            .map(|hit| {
                Source::new(
                    hit.document.filename.as_str(),
                    snippet(&hit.document.content, DEFAULT_SNIPPET_LEN),
                )
            })
            .collect();

        let answer = match &self.answerer {
            Some(answerer) => answerer.answer(question, hits.iter().map(|hit| hit.document)),
            None => excerpt_answer(&sources),
        };

        QueryResult::answered(answer, sources)
    }
}

/// Builds the deterministic answer listing each source's preview.
fn excerpt_answer(sources: &[Source]) -> String {
    let lines: Vec<String> = sources
        .iter()
        .map(|source| format!("- {}: {}", source.filename(), source.snippet()))
        .collect();
    format!("Relevant excerpts:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests;
