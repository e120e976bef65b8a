use crate::models::{GeneratedPrompt, PromptResponse};
use crate::prompt::{SECTION_HEADERS, STRATEGIES};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected} prompts, got {got}")]
    Count { expected: usize, got: usize },
    #[error("prompt {index} ('{title}') is missing sections: {missing:?}")]
    Sections { index: usize, title: String, missing: Vec<&'static str> },
}

/// Headers absent from `full_prompt`, or present but out of order.
pub fn missing_sections(full_prompt: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    let mut cursor = 0;
    for header in SECTION_HEADERS {
        match full_prompt[cursor..].find(header) {
            Some(at) => cursor += at + header.len(),
            None => missing.push(header),
        }
    }
    missing
}

/// Parses the raw completion text into exactly one prompt per strategy.
///
/// Section gaps are logged; with `strict_sections` they fail the parse.
pub fn parse_prompt_response(raw: &str, strict_sections: bool) -> Result<PromptResponse, ParseError> {
    let parsed: PromptResponse = serde_json::from_str(raw.trim())?;

    if parsed.prompts.len() != STRATEGIES.len() {
        return Err(ParseError::Count { expected: STRATEGIES.len(), got: parsed.prompts.len() });
    }

    for (index, GeneratedPrompt { title, full_prompt, .. }) in parsed.prompts.iter().enumerate() {
        let missing = missing_sections(full_prompt);
        if missing.is_empty() {
            continue;
        }
        warn!("⚠️ Prompt {} ('{}') missing sections: {:?}", index, title, missing);
        if strict_sections {
            return Err(ParseError::Sections { index, title: title.clone(), missing });
        }
    }

    Ok(parsed)
}
