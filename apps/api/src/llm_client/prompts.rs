// Shared prompt fragments.
// Each workflow that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the cross-cutting pieces.

/// Appended to every prompt whose reply is parsed as JSON.
/// Models ignore this often enough that `extraction` still isolates the payload.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Used in profile-driven prompts when a field has no value.
pub const NOT_AVAILABLE: &str = "N/A";
