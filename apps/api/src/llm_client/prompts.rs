// Shared prompt fragments.
// Each analysis step defines its own prompt templates in analysis/prompts.rs.
// This file contains cross-cutting fragments.

/// Instruction that closes every prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond only with valid JSON, no additional text. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated comments about a person in the third person singular.
pub const PRONOUN_INSTRUCTION: &str = "All comments should use singular pronouns such as \
    \"he\", \"she\", \"the candidate\", or the candidate's name.";
