use crate::prompt::{CompletionRequest, SECTION_HEADERS, STRATEGIES};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use serde_with::skip_serializing_none;
use thiserror::Error;
use reqwest::Client;
use tracing::{info, error};

pub const DEMO_KEY: &str = "DEMO_KEY";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("status={status} body={body}")] Status { status: u16, body: String },
    #[error("response blocked: {0}")] Blocked(String),
    #[error("Other: {0}")] Other(String),
}

/// One structured completion call. Implementations make exactly one attempt.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GeminiError>;

    fn is_demo(&self) -> bool { false }
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, model: String, temperature: Option<f32>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, self.api_key)
    }

    fn redact(&self, s: &str) -> String {
        if self.api_key.is_empty() { s.to_string() } else { s.replace(&self.api_key, "***") }
    }

    pub fn request_body(&self, request: &CompletionRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content::text(None, &request.system_instruction),
            contents: vec![Content::text(Some("user"), &request.user_message)],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
                temperature: self.temperature,
                candidate_count: Some(1),
            },
        }
    }

    async fn perform_api_call(&self, request: &CompletionRequest) -> Result<String, GeminiError> {
        let url = self.endpoint();
        info!("🔗 Making request to: {}", self.redact(&url));

        let body = self.request_body(request);
        let response = self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(self.redact(&e.to_string())))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response.text().await
            .map_err(|e| GeminiError::Http(self.redact(&e.to_string())))?;

        if !status.is_success() {
            error!("❌ API Error response: {}", response_text);
            return Err(GeminiError::Status { status: status.as_u16(), body: response_text });
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Other(format!("parse error: {}", e)))?;
        extract_text(parsed)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GeminiError> {
        if self.is_demo() {
            info!("Using demo mode - rendering prompts locally");
            return Ok(demo_payload(request));
        }

        info!("Generating prompts with {}...", self.model);
        let result = self.perform_api_call(request).await;
        match &result {
            Ok(text) => info!("✅ Completion returned {} chars", text.len()),
            Err(e) => error!("❌ Completion failed: {}", e),
        }
        result
    }

    fn is_demo(&self) -> bool { self.api_key.is_empty() || self.api_key == DEMO_KEY }
}

/// Output shape requested from the service.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "prompts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING", "description": "Short title (e.g., 'Variation 1: Visual Impact')" },
                        "fullPrompt": { "type": "STRING", "description": "The COMPLETE text block starting with 'CHARACTER:' and ending with the 'ENDING:' section." },
                        "strategy": { "type": "STRING", "description": "Strategy used." }
                    },
                    "required": ["title", "fullPrompt", "strategy"]
                }
            }
        },
        "required": ["prompts"]
    })
}

fn demo_payload(request: &CompletionRequest) -> String {
    let prompts: Vec<Value> = STRATEGIES
        .iter()
        .enumerate()
        .map(|(i, (name, focus))| {
            let full_prompt = SECTION_HEADERS
                .iter()
                .map(|h| format!("{h}\n[demo] {focus}"))
                .collect::<Vec<_>>()
                .join("\n\n");
            json!({
                "title": format!("Variation {}: {}", i + 1, name),
                "fullPrompt": format!("{full_prompt}\n\n({})", request.user_message),
                "strategy": name,
            })
        })
        .collect();
    json!({ "prompts": prompts }).to_string()
}

// --- Request / Response Wire Types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: Option<f32>,
    candidate_count: Option<u8>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self { role: role.map(str::to_string), parts: vec![Part::Text { text: text.to_string() }] }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn extract_text(resp: GeminiResponse) -> Result<String, GeminiError> {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        let reason = resp.prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(GeminiError::Blocked(reason));
    };

    let text: String = candidate.content.parts
        .into_iter()
        .filter_map(|p| match p { Part::Text { text } => Some(text), Part::Other(_) => None })
        .collect();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(GeminiError::Other(format!("no text content in response (finishReason={reason})")));
    }
    Ok(text)
}
