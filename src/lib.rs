pub mod answerer;
pub mod auth;
pub mod config;
pub mod ingest;
pub mod models;
pub mod ollama;
pub mod retrieval;
pub mod service;

pub use answerer::{GroundedAnswerer, UNKNOWN};
pub use auth::ApiKeys;
pub use config::AppConfig;
pub use models::{Document, QueryResult, Source, TenantCorpus, TenantId};
pub use ollama::{OllamaClient, OllamaClientBuilder, OllamaClientTrait, OllamaError};
pub use service::{NO_RELEVANT_DOCUMENTS, QueryService};
