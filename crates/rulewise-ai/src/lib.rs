//! Generation layer: backend capability, extraction and rendering stages.

pub mod extract;
pub mod generator;
pub mod render;
pub mod stub;

#[cfg(feature = "openai")]
pub mod openai;

pub use extract::{ExtractionError, extract};
pub use generator::{GenerationError, Generator};
pub use render::{RenderingError, render};
pub use stub::{StubCall, StubGenerator, StubResponse};

#[cfg(feature = "openai")]
pub use openai::{ConfigError, OpenAiConfig, OpenAiGenerator};
