//! The generation capability consumed by the extraction and rendering stages.

use async_trait::async_trait;
use rulewise_core::TargetSchema;
use serde_json::Value;
use thiserror::Error;

/// The backend could not produce a value for the requested schema.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Backend unreachable or the request failed in transit.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    /// The backend answered, but not with a usable JSON value.
    #[error("malformed backend output: {0}")]
    Malformed(String),

    /// The backend itself refused to produce schema-conforming output.
    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

/// Given a system instruction and a target schema, return a structured value
/// or fail.
///
/// Implementations must either return a value they believe conforms to
/// `schema` or a [`GenerationError`]. Callers validate the value regardless.
/// No retries are expected at this boundary.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        instruction: &str,
        schema: &TargetSchema,
    ) -> Result<Value, GenerationError>;
}

