use crate::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, DEMO_KEY};
use crate::pipeline::PipelineOptions;
use crate::prompt::DEFAULT_OUTRO_HANDLE;

/// Process configuration, read once at startup.
///
/// | Env Var                  | Default                                            |
/// |--------------------------|----------------------------------------------------|
/// | `GEMINI_API_KEY`         | `DEMO_KEY` (demo mode, no network calls)           |
/// | `GEMINI_API_BASE`        | `https://generativelanguage.googleapis.com/v1beta` |
/// | `GEMINI_MODEL`           | `gemini-2.5-flash`                                 |
/// | `GEMINI_TEMPERATURE`     | unset (service default)                            |
/// | `PORT`                   | `8080`                                             |
/// | `PROMPT_STRICT_SECTIONS` | `false`                                            |
/// | `PROMPT_OUTRO_HANDLE`    | `@achadinhos_da_ellen`                             |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub port: u16,
    pub strict_sections: bool,
    pub outro_handle: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            api_key: non_empty("GEMINI_API_KEY").unwrap_or_else(|| DEMO_KEY.into()),
            api_base: non_empty("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            temperature: non_empty("GEMINI_TEMPERATURE").and_then(|v| v.parse().ok()),
            port: non_empty("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080),
            strict_sections: non_empty("PROMPT_STRICT_SECTIONS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            outro_handle: non_empty("PROMPT_OUTRO_HANDLE").unwrap_or_else(|| DEFAULT_OUTRO_HANDLE.into()),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions { strict_sections: self.strict_sections, outro_handle: self.outro_handle.clone() }
    }

    /// First characters of the key, for startup logs.
    pub fn key_preview(&self) -> &str {
        let end = self.api_key.char_indices().nth(6).map(|(i, _)| i).unwrap_or(self.api_key.len());
        &self.api_key[..end]
    }
}
