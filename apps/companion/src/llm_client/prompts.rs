// Shared system prompts.
// Chain-specific templates live in chains/prompts.rs.

/// System prompt for chains whose parser expects JSON.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT include explanations or apologies.";

/// System prompt for chains whose parser expects a comma-separated list.
pub const COMMA_LIST_SYSTEM: &str = "You are a precise extraction assistant. \
    Respond with a single line containing a comma-separated list and nothing else. \
    Do NOT number the items. Do NOT add a preamble or closing remarks.";

/// System prompt for chains that return free text.
pub const PLAIN_TEXT_SYSTEM: &str = "You are a precise extraction assistant. \
    Respond with the requested text only, without commentary or markdown.";
