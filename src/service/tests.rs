use super::*;
use crate::answerer::UNKNOWN;
use crate::models::Document;
use crate::ollama::{ChatRequest, OllamaClientTrait, OllamaError};
use std::sync::atomic::{AtomicUsize, Ordering};

struct MockOllamaClient {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl MockOllamaClient {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err("connection refused".to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OllamaClientTrait for MockOllamaClient {
    fn chat(&self, _request: &ChatRequest<'_>) -> Result<String, OllamaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(|message| OllamaError::Api { message })
    }
}

fn sample_corpus() -> Arc<TenantCorpus> {
    Arc::new(
        TenantCorpus::new()
            .with_tenant(
                "A",
                vec![
                    Document::new(
                        "a_resiliation.txt",
                        "Procedure resiliation: enregistrer dans le CRM.",
                    ),
                    Document::new(
                        "a_rcpro.txt",
                        "Produit RC Pro A: exclusion travaux hauteur plus de 3 metres.",
                    ),
                ],
            )
            .with_tenant(
                "B",
                vec![
                    Document::new(
                        "b_sinistre.txt",
                        "Procedure sinistre: declarer dans les 5 jours ouvrables.",
                    ),
                    Document::new(
                        "b_rcpro.txt",
                        "Produit RC Pro B: exclusion sous-traitance non declaree.",
                    ),
                ],
            ),
    )
}

fn tenant(id: &str) -> TenantId {
    TenantId::new(id)
}

fn source_names(result: &QueryResult) -> Vec<&str> {
    result.sources().iter().map(Source::filename).collect()
}

// --- No-answer paths ---

#[test]
fn unrelated_question_returns_no_answer() {
    let service = QueryService::new(sample_corpus());

    let result = service.query(&tenant("A"), "unrelated question");

    assert!(!result.has_answer());
    assert_eq!(result.answer(), None);
    assert!(result.sources().is_empty());
    assert_eq!(result.reason(), Some(NO_RELEVANT_DOCUMENTS));
}

#[test]
fn question_without_tokens_returns_no_answer() {
    let service = QueryService::new(sample_corpus());

    for question in ["", "   ", "rc a b", "?!"] {
        let result = service.query(&tenant("A"), question);
        assert!(!result.has_answer(), "{question:?} should not match");
    }
}

#[test]
fn unknown_tenant_is_treated_as_empty_corpus() {
    let service = QueryService::new(sample_corpus());

    let result = service.query(&tenant("Z"), "procedure");

    assert!(!result.has_answer());
    assert_eq!(result.reason(), Some(NO_RELEVANT_DOCUMENTS));
}

#[test]
fn no_hits_never_calls_the_model() {
    let mock = MockOllamaClient::replying("should not be used");
    let service = QueryService::new(sample_corpus()).with_answerer(GroundedAnswerer::new(mock.clone()));

    let result = service.query(&tenant("A"), "unrelated question");

    assert!(!result.has_answer());
    assert_eq!(mock.calls(), 0);
}

// --- Hits and excerpt answers ---

#[test]
fn matching_question_returns_sources_for_the_tenant() {
    let service = QueryService::new(sample_corpus());

    let result = service.query(&tenant("A"), "resiliation procedure");

    assert!(result.has_answer());
    assert_eq!(result.reason(), None);
    assert_eq!(source_names(&result), vec!["a_resiliation.txt"]);
    assert!(!result.answer().unwrap_or_default().is_empty());
}

#[test]
fn excerpt_answer_lists_sources_in_rank_order() {
    let service = QueryService::new(sample_corpus());

    let result = service.query(&tenant("B"), "exclusion sous traitance sinistre");

    assert_eq!(source_names(&result), vec!["b_rcpro.txt", "b_sinistre.txt"]);
    assert_eq!(
        result.answer(),
        Some(
            "Relevant excerpts:\n\
             - b_rcpro.txt: Produit RC Pro B: exclusion sous-traitance non declaree.\n\
             - b_sinistre.txt: Procedure sinistre: declarer dans les 5 jours ouvrables."
        )
    );
}

#[test]
fn sources_carry_whitespace_collapsed_snippets() {
    let corpus = TenantCorpus::new().with_tenant(
        "A",
        vec![Document::new("a.txt", format!("Procedure\n\n  {}", "x".repeat(400)))],
    );
    let service = QueryService::new(Arc::new(corpus));

    let result = service.query(&tenant("A"), "procedure");

    let snippet = result.sources()[0].snippet();
    assert!(snippet.starts_with("Procedure xxx"));
    assert!(snippet.ends_with("..."));
    assert_eq!(snippet.chars().count(), DEFAULT_SNIPPET_LEN + 3);
}

#[test]
fn at_most_three_sources_by_default() {
    let documents: Vec<Document> = (0..6)
        .map(|i| Document::new(format!("doc{i}.txt"), "shared procedure"))
        .collect();
    let service = QueryService::new(Arc::new(TenantCorpus::new().with_tenant("A", documents)));

    let result = service.query(&tenant("A"), "procedure");

    assert_eq!(source_names(&result), vec!["doc0.txt", "doc1.txt", "doc2.txt"]);
}

#[test]
fn top_k_is_configurable() {
    let documents: Vec<Document> = (0..6)
        .map(|i| Document::new(format!("doc{i}.txt"), "shared procedure"))
        .collect();
    let service = QueryService::new(Arc::new(TenantCorpus::new().with_tenant("A", documents)))
        .with_top_k(5);

    assert_eq!(service.query(&tenant("A"), "procedure").sources().len(), 5);
}

#[test]
fn zero_top_k_never_answers() {
    let service = QueryService::new(sample_corpus()).with_top_k(0);
    assert!(!service.query(&tenant("A"), "procedure").has_answer());
}

// --- Tenant isolation ---

#[test]
fn same_question_is_answered_per_tenant() {
    let service = QueryService::new(sample_corpus());

    let a = service.query(&tenant("A"), "sinistre procedure");
    let b = service.query(&tenant("B"), "sinistre procedure");

    // "procedure" occurs in A's resiliation doc, so A still answers, but only from A.
    assert!(a.sources().iter().all(|s| s.filename().starts_with("a_")));
    assert!(b.sources().iter().all(|s| s.filename().starts_with("b_")));
    assert_eq!(source_names(&b)[0], "b_sinistre.txt");
}

#[test]
fn tenant_only_answers_from_its_own_documents() {
    let corpus = TenantCorpus::new()
        .with_tenant("A", vec![Document::new("a_rcpro.txt", "Produit RC Pro A")])
        .with_tenant("B", vec![Document::new("b_sinistre.txt", "Procedure sinistre")]);
    let service = QueryService::new(Arc::new(corpus));

    let a = service.query(&tenant("A"), "sinistre procedure");
    let b = service.query(&tenant("B"), "sinistre procedure");

    assert!(!a.has_answer());
    assert!(b.has_answer());
    assert_eq!(source_names(&b), vec!["b_sinistre.txt"]);
}

// --- Grounded answers ---

#[test]
fn grounded_answer_replaces_excerpts() {
    let mock = MockOllamaClient::replying("Declare within 5 days [source: b_sinistre.txt].");
    let service = QueryService::new(sample_corpus()).with_answerer(GroundedAnswerer::new(mock.clone()));

    let result = service.query(&tenant("B"), "sinistre procedure");

    assert!(result.has_answer());
    assert_eq!(
        result.answer(),
        Some("Declare within 5 days [source: b_sinistre.txt].")
    );
    assert_eq!(source_names(&result), vec!["b_sinistre.txt"]);
    assert_eq!(mock.calls(), 1);
}

#[test]
fn grounded_answer_appends_sources_when_model_omits_citations() {
    let mock = MockOllamaClient::replying("Declare within 5 days.");
    let service = QueryService::new(sample_corpus()).with_answerer(GroundedAnswerer::new(mock));

    let result = service.query(&tenant("B"), "sinistre procedure");

    assert_eq!(
        result.answer(),
        Some("Declare within 5 days.\n\nSources: [source: b_sinistre.txt]")
    );
}

#[test]
fn model_failure_still_returns_sources_with_unknown_answer() {
    let mock = MockOllamaClient::failing();
    let service = QueryService::new(sample_corpus()).with_answerer(GroundedAnswerer::new(mock.clone()));

    let result = service.query(&tenant("B"), "sinistre procedure");

    assert!(result.has_answer());
    assert_eq!(result.answer(), Some(UNKNOWN));
    assert_eq!(source_names(&result), vec!["b_sinistre.txt"]);
    assert_eq!(mock.calls(), 1);
}

// --- Health and concurrency ---

#[test]
fn document_counts_report_every_tenant() {
    let service = QueryService::new(sample_corpus());
    let counts = service.document_counts();

    assert_eq!(counts.get("A"), Some(&2));
    assert_eq!(counts.get("B"), Some(&2));
    assert_eq!(counts.len(), 2);
}

#[test]
fn query_service_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<QueryService>();
}

#[test]
fn concurrent_queries_do_not_interfere() {
    let mock = MockOllamaClient::replying("Answer.");
    let service = QueryService::new(sample_corpus()).with_answerer(GroundedAnswerer::new(mock.clone()));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = &service;
                scope.spawn(move || {
                    let id = if i % 2 == 0 { "A" } else { "B" };
                    (id, service.query(&tenant(id), "rc pro exclusion"))
                })
            })
            .collect();

        for handle in handles {
            let (id, result) = handle.join().unwrap();
            let prefix = format!("{}_", id.to_lowercase());
            assert!(result.has_answer());
            assert!(result.sources().iter().all(|s| s.filename().starts_with(&prefix)));
        }
    });

    assert_eq!(mock.calls(), 8);
}
