mod corpus;
mod document;
mod ids;
mod query_result;

pub use corpus::TenantCorpus;
pub use document::Document;
pub use ids::TenantId;
pub use query_result::{QueryResult, Source};
