//! Tolerant extraction — turns an unreliable model reply into a value the
//! workflow can always use.
//!
//! Flow: render prompt → one model call → `StructuredReply::from_reply` →
//! on any failure, the call site's fallback.
//!
//! The result is either fully derived (with per-field defaults) or fully
//! fallback. A failed parse never produces a partial mix.

pub mod fields;
pub mod payload;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::TextGenerator;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("reply contained no payload")]
    NoPayload,

    #[error("reply was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("reply did not match the expected shape: {0}")]
    Schema(String),
}

/// A schema the extraction pipeline can derive from raw model text.
///
/// Implementations must return a fully populated value or an error, never a
/// value with holes.
pub trait StructuredReply: Sized {
    fn from_reply(raw: &str) -> Result<Self, ExtractionError>;
}

/// Which path produced a `Generated` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Completed,
    Fallback,
}

impl GenerationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationStatus::Completed => "completed",
            GenerationStatus::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Generated<T> {
    pub value: T,
    pub status: GenerationStatus,
}

impl<T> Generated<T> {
    pub fn is_fallback(&self) -> bool {
        self.status == GenerationStatus::Fallback
    }
}

/// An instruction template plus the named parameters substituted into it.
///
/// Placeholders are written `{name}`. Braces that do not name a parameter are
/// left alone, so templates can show literal JSON examples. Values are
/// inserted verbatim with no escaping.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    template: &'static str,
    params: Vec<(&'static str, String)>,
}

impl GenerationRequest {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    /// Single pass over the template, so a value containing `{other}` is
    /// never itself expanded.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let name = &after[..close];
                self.params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (value, close))
            });
            match value {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Runs one generation and returns either the derived value or `fallback()`.
///
/// `label` names the call site in logs. The model is invoked exactly once.
pub async fn generate<T, F>(
    llm: &dyn TextGenerator,
    label: &str,
    request: &GenerationRequest,
    fallback: F,
) -> Generated<T>
where
    T: StructuredReply,
    F: FnOnce() -> T,
{
    let prompt = request.render();

    let raw = match llm.generate(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("[{label}] generation failed, using fallback: {e}");
            return Generated {
                value: fallback(),
                status: GenerationStatus::Fallback,
            };
        }
    };
    debug!("[{label}] raw reply: {raw}");

    match T::from_reply(&raw) {
        Ok(value) => {
            info!("[{label}] generation completed");
            Generated {
                value,
                status: GenerationStatus::Completed,
            }
        }
        Err(e) => {
            warn!("[{label}] could not extract reply, using fallback: {e}");
            Generated {
                value: fallback(),
                status: GenerationStatus::Fallback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::ScriptedGenerator;

    #[derive(Debug, PartialEq)]
    struct Count(u32);

    impl StructuredReply for Count {
        fn from_reply(raw: &str) -> Result<Self, ExtractionError> {
            let obj = payload::parse_json_object(raw)?;
            let n = fields::number_or(&obj, "count", 0.0);
            Ok(Count(n as u32))
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("Count the {thing}.").param("thing", "apples")
    }

    #[test]
    fn test_render_substitutes_named_params() {
        let rendered = GenerationRequest::new("A {role} at {company}.")
            .param("role", "Rust Engineer")
            .param("company", "Acme")
            .render();
        assert_eq!(rendered, "A Rust Engineer at Acme.");
    }

    #[test]
    fn test_render_leaves_json_examples_alone() {
        let rendered = GenerationRequest::new(r#"Return {"items": [{name}]}"#)
            .param("name", "\"x\"")
            .render();
        assert_eq!(rendered, r#"Return {"items": ["x"]}"#);
    }

    #[test]
    fn test_render_does_not_expand_placeholders_inside_values() {
        let rendered = GenerationRequest::new("{bio} / {industry}")
            .param("bio", "I love {industry}")
            .param("industry", "Tech")
            .render();
        assert_eq!(rendered, "I love {industry} / Tech");
    }

    #[test]
    fn test_render_unclosed_brace() {
        let rendered = GenerationRequest::new("open { only").render();
        assert_eq!(rendered, "open { only");
    }

    #[tokio::test]
    async fn test_generate_completed() {
        let llm = ScriptedGenerator::replying(["```json\n{\"count\": 4}\n```"]);
        let result = generate(&llm, "test", &request(), || Count(99)).await;
        assert_eq!(result.value, Count(4));
        assert_eq!(result.status, GenerationStatus::Completed);
        assert_eq!(llm.prompts(), vec!["Count the apples.".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_parse_failure_uses_fallback() {
        let llm = ScriptedGenerator::replying(["I'd rather not."]);
        let result = generate(&llm, "test", &request(), || Count(99)).await;
        assert_eq!(result.value, Count(99));
        assert!(result.is_fallback());
    }

    #[tokio::test]
    async fn test_generate_invocation_failure_is_not_retried() {
        let llm = ScriptedGenerator::failing();
        llm.push(Ok("{\"count\": 1}".to_string()));

        let result = generate(&llm, "test", &request(), || Count(99)).await;

        assert_eq!(result.value, Count(99));
        assert_eq!(result.status, GenerationStatus::Fallback);
        assert_eq!(llm.calls(), 1);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&GenerationStatus::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(GenerationStatus::Completed.as_str(), "completed");
    }
}
