//! Deterministic scripted backend for tests and dry runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use rulewise_core::TargetSchema;
use serde_json::Value;

use crate::generator::{GenerationError, Generator};

/// One call observed by a [`StubGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct StubCall {
    pub instruction: String,
    pub schema_name: String,
}

/// Scripted response for a single call.
#[derive(Debug, Clone)]
pub enum StubResponse {
    Value(Value),
    Fail(String),
}

/// Replays a queue of scripted responses in order, one per `generate` call.
///
/// Every call is recorded. When the queue runs dry the stub fails with
/// [`GenerationError::Unavailable`].
#[derive(Debug, Default)]
pub struct StubGenerator {
    responses: Mutex<VecDeque<StubResponse>>,
    calls: Mutex<Vec<StubCall>>,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond(self, value: Value) -> Self {
        self.push(StubResponse::Value(value));
        self
    }

    /// Queue a failure.
    pub fn fail(self, message: &str) -> Self {
        self.push(StubResponse::Fail(message.to_string()));
        self
    }

    pub fn push(&self, response: StubResponse) {
        lock(&self.responses).push_back(response);
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<StubCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Responses not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Generator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(
        &self,
        instruction: &str,
        schema: &TargetSchema,
    ) -> Result<Value, GenerationError> {
        lock(&self.calls).push(StubCall {
            instruction: instruction.to_string(),
            schema_name: schema.name.to_string(),
        });

        match lock(&self.responses).pop_front() {
            Some(StubResponse::Value(value)) => Ok(value),
            Some(StubResponse::Fail(message)) => Err(GenerationError::Unavailable(message)),
            None => Err(GenerationError::Unavailable(
                "stub has no scripted response left".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulewise_core::rules;
    use serde_json::json;

    #[tokio::test]
    async fn replays_in_order() {
        let stub = StubGenerator::new()
            .respond(json!({ "rules": [] }))
            .fail("boom");
        let schema = rules::parsed_rule_set_schema();

        let first = stub.generate("one", &schema).await.unwrap();
        assert_eq!(first, json!({ "rules": [] }));

        let second = stub.generate("two", &schema).await;
        assert!(matches!(second, Err(GenerationError::Unavailable(m)) if m == "boom"));

        assert_eq!(stub.remaining(), 0);
    }

    #[tokio::test]
    async fn records_calls() {
        let stub = StubGenerator::new().respond(json!({ "rules": [] }));
        let schema = rules::rendered_rule_set_schema();
        stub.generate("render these", &schema).await.unwrap();

        assert_eq!(
            stub.calls(),
            vec![StubCall {
                instruction: "render these".into(),
                schema_name: "rendered_rules".into(),
            }]
        );
    }

    #[tokio::test]
    async fn exhausted_stub_fails() {
        let stub = StubGenerator::new();
        let result = stub.generate("x", &rules::parsed_rule_set_schema()).await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
        assert_eq!(stub.call_count(), 1);
    }
}
