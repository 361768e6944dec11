use std::collections::{BTreeMap, HashMap};

use super::{Document, TenantId};

/// Read-only snapshot of every tenant's documents.
///
/// The corpus is built once at startup and then shared (typically behind an
/// `Arc`) by all concurrent queries. Lookups for one tenant never see
/// another tenant's documents.
///
/// # Examples
///
/// ```
/// use ragdesk::{Document, TenantCorpus};
///
/// let corpus = TenantCorpus::new()
///     .with_tenant("A", vec![Document::new("a_rcpro.txt", "Produit RC Pro A")]);
///
/// assert_eq!(corpus.documents("A").len(), 1);
/// assert!(corpus.documents("B").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TenantCorpus {
    tenants: HashMap<TenantId, Vec<Document>>,
}

impl TenantCorpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a tenant's document set, keeping document order.
    #[must_use]
    pub fn with_tenant(mut self, tenant: impl Into<TenantId>, documents: Vec<Document>) -> Self {
        self.tenants.insert(tenant.into(), documents);
        self
    }

    /// Returns the documents owned by `tenant`, in corpus order.
    ///
    /// An unknown tenant has no documents; this is not an error.
    pub fn documents(&self, tenant: &str) -> &[Document] {
        self.tenants.get(tenant).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if the tenant has an entry, even an empty one.
    pub fn contains_tenant(&self, tenant: &str) -> bool {
        self.tenants.contains_key(tenant)
    }

    /// Returns the number of documents per tenant, ordered by tenant id.
    pub fn document_counts(&self) -> BTreeMap<TenantId, usize> {
        self.tenants
            .iter()
            .map(|(tenant, docs)| (tenant.clone(), docs.len()))
            .collect()
    }

    /// Total number of documents across all tenants.
    pub fn total_documents(&self) -> usize {
        self.tenants.values().map(Vec::len).sum()
    }
}

impl FromIterator<(TenantId, Vec<Document>)> for TenantCorpus {
    fn from_iter<I: IntoIterator<Item = (TenantId, Vec<Document>)>>(iter: I) -> Self {
        Self {
            tenants: iter.into_iter().collect(),
        }
    }
}
