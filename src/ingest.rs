//! Filesystem corpus loading.
//!
//! Each tenant owns one folder under the data directory. Only plain-text
//! and Markdown files directly inside that folder become documents.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::models::{Document, TenantCorpus, TenantId};

/// File extensions loaded as documents, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Loads every configured tenant's documents from `data_dir`.
///
/// Each tenant gets an entry even if its folder does not exist, in which
/// case it simply has no documents.
///
/// # Errors
///
/// Returns an error if a tenant folder or one of its files cannot be read.
pub fn load_corpus(data_dir: &Path, tenant_folders: &[(TenantId, String)]) -> Result<TenantCorpus> {
    let mut tenants = Vec::with_capacity(tenant_folders.len());

    for (tenant, folder) in tenant_folders {
        let documents = load_tenant_documents(&data_dir.join(folder))
            .with_context(|| format!("Failed to load documents for tenant {tenant}"))?;
        debug!(tenant = %tenant, documents = documents.len(), "loaded tenant folder");
        tenants.push((tenant.clone(), documents));
    }

    let corpus: TenantCorpus = tenants.into_iter().collect();
    info!(
        data_dir = %data_dir.display(),
        tenants = tenant_folders.len(),
        documents = corpus.total_documents(),
        "corpus loaded"
    );
    Ok(corpus)
}

/// Loads the documents directly inside `folder`, ordered by filename.
///
/// A missing folder yields no documents. Subdirectories are not descended.
/// Bytes that are not valid UTF-8 are dropped; the rest of the file is kept.
///
/// # Errors
///
/// Returns an error if the folder exists but cannot be listed, or if an
/// eligible file cannot be read.
pub fn load_tenant_documents(folder: &Path) -> Result<Vec<Document>> {
    if !folder.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read directory: {}", folder.display()))?;

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory: {}", folder.display()))?
            .path();

        if !path.is_file() || !has_allowed_extension(&path) {
            continue;
        }

        let bytes =
            fs::read(&path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        documents.push(Document::new(filename, decode_dropping_invalid(&bytes)));
    }

    documents.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(documents)
}

fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}
