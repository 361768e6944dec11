//! Grounded question answering using LLMs.
//!
//! This module packs ranked documents into a bounded evidence context and
//! uses an Ollama-compatible LLM to answer from that evidence only, with
//! `[source: <filename>]` citations or the exact UNKNOWN sentinel.

mod context;
mod grounded;

pub use context::{EvidenceContext, assemble_context};
pub use grounded::{
    CITATION_MARKER, DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_TEMPERATURE, GroundedAnswerer, UNKNOWN,
    cite,
};
