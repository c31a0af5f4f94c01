//! Storage layer: input discovery and flat-file artifact persistence.

mod error;
pub use error::StoreError;

mod artifacts;
mod documents;
pub use artifacts::ArtifactStore;
pub use documents::{Document, DocumentSource, discover_documents, list_files};
