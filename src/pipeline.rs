use crate::gemini::{CompletionClient, GeminiError};
use crate::models::{GenerationState, ProductInput, PromptResponse, PromptSet};
use crate::parser::{parse_prompt_response, ParseError};
use crate::prompt::build_request;
use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

pub const VALIDATION_MESSAGE: &str = "Por favor, preencha o nome, características e o ambiente.";
pub const GENERATION_FAILED_MESSAGE: &str = "Falha ao gerar os prompts. Tente novamente.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,
    #[error("a generation is already in progress")]
    InFlight,
    #[error("completion call failed: {0}")]
    Completion(#[from] GeminiError),
    #[error("response rejected: {0}")]
    Parse(#[from] ParseError),
}

impl GenerationError {
    /// What the user sees. Remote and parse causes are not distinguished.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::Validation => VALIDATION_MESSAGE,
            GenerationError::InFlight => "Os prompts ainda estão sendo gerados. Aguarde.",
            GenerationError::Completion(_) | GenerationError::Parse(_) => GENERATION_FAILED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub strict_sections: bool,
    pub outro_handle: String,
}

pub fn validate(input: &ProductInput) -> Result<(), GenerationError> {
    let required = [&input.product_name, &input.features, &input.environment];
    if required.iter().any(|f| f.trim().is_empty()) {
        return Err(GenerationError::Validation);
    }
    Ok(())
}

/// Validate, build, call once, parse. No retries.
pub async fn generate_prompts(
    client: &dyn CompletionClient,
    input: &ProductInput,
    options: &PipelineOptions,
) -> Result<PromptResponse, GenerationError> {
    validate(input)?;
    let request = build_request(input, &options.outro_handle);
    info!("🎬 Requesting prompts for '{}' in '{}' ({})", input.product_name.trim(), input.environment.trim(), input.product_type);
    let raw = client.complete(&request).await?;
    let parsed = parse_prompt_response(&raw, options.strict_sections)?;
    info!("✅ Parsed {} prompts", parsed.prompts.len());
    Ok(parsed)
}

/// The single result slot. Overwritten on every submission, never merged.
#[derive(Debug, Default)]
pub struct GenerationSlot {
    state: Mutex<GenerationState>,
}

impl GenerationSlot {
    pub fn snapshot(&self) -> GenerationState {
        self.state.lock().clone()
    }

    /// Moves to `Submitting`, clearing the previous result or error.
    pub fn begin(&self) -> Result<Submission<'_>, GenerationError> {
        let mut state = self.state.lock();
        if matches!(*state, GenerationState::Submitting) {
            return Err(GenerationError::InFlight);
        }
        *state = GenerationState::Submitting;
        Ok(Submission { slot: self, finished: false })
    }

    /// Runs the whole pipeline against this slot.
    pub async fn submit(
        &self,
        client: &dyn CompletionClient,
        input: &ProductInput,
        options: &PipelineOptions,
    ) -> Result<PromptSet, GenerationError> {
        // Validation failures never touch the slot.
        validate(input)?;
        let submission = self.begin()?;
        let result = generate_prompts(client, input, options).await;
        submission.finish(result)
    }
}

/// Guard for one in-flight generation. Dropping it unfinished resets the slot to `Idle`.
pub struct Submission<'a> {
    slot: &'a GenerationSlot,
    finished: bool,
}

impl Submission<'_> {
    pub fn finish(mut self, result: Result<PromptResponse, GenerationError>) -> Result<PromptSet, GenerationError> {
        self.finished = true;
        let mut state = self.slot.state.lock();
        match result {
            Ok(response) => {
                let set = PromptSet { id: Uuid::new_v4(), generated_at: Utc::now(), prompts: response.prompts };
                *state = GenerationState::Success(set.clone());
                Ok(set)
            }
            Err(e) => {
                error!("❌ Generation failed: {}", e);
                *state = GenerationState::Failed { message: e.user_message().to_string() };
                Err(e)
            }
        }
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut state = self.slot.state.lock();
            if matches!(*state, GenerationState::Submitting) {
                *state = GenerationState::Idle;
            }
        }
    }
}
