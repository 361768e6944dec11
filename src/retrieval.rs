//! Tenant-scoped lexical retrieval.
//!
//! Tokenizing, ranking a tenant's documents against a question, and building
//! display previews of the matches.

mod ranker;
mod snippet;
mod tokenizer;

pub use ranker::{ScoredHit, rank};
pub use snippet::{DEFAULT_SNIPPET_LEN, ELLIPSIS, snippet};
pub use tokenizer::{MIN_TOKEN_LEN, Tokenizer};
