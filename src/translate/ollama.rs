//! Translator backed by an Ollama-compatible `/api/generate` endpoint

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::prompt::{suggestion_prompt, translation_prompt};
use super::{FilterSuggestions, TranslatedFilters, Translator};
use crate::config::TranslatorConfig;
use crate::core::FilterOptions;
use crate::error::{MsError, Result};
use crate::search::FilterSpec;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Blocking HTTP translator.
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
}

impl OllamaTranslator {
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        if !config.enabled {
            return Err(MsError::TranslatorUnavailable(
                "translator is disabled ([translator] enabled = false)".to_string(),
            ));
        }
        if config.endpoint.trim().is_empty() {
            return Err(MsError::MissingConfig("translator.endpoint".to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one prompt and return the model's raw text reply.
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!(url = %url, model = %self.model, prompt_len = prompt.len(), "model request");

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
                format: "json",
            })
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    MsError::TranslationFailed(format!("model request timed out: {e}"))
                } else {
                    MsError::TranslationFailed(format!("model request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| MsError::TranslationFailed(format!("failed to read model response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(MsError::TranslationFailed(format!(
                "model server returned {status}: {detail}"
            )));
        }

        let generated: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| MsError::TranslationFailed(format!("invalid model response: {e}")))?;
        Ok(generated.response)
    }
}

/// Pull the JSON object out of a model reply that may wrap it in prose or
/// a code fence.
fn extract_json(reply: &str) -> &str {
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply.trim(),
    }
}

impl Translator for OllamaTranslator {
    fn translate(&self, query: &str, options: &FilterOptions) -> Result<FilterSpec> {
        let reply = self.generate(&translation_prompt(query, options))?;
        let raw: TranslatedFilters = serde_json::from_str(extract_json(&reply))
            .map_err(|e| MsError::TranslationFailed(format!("model output is not filter JSON: {e}")))?;
        let spec = raw.into_spec(options)?;
        info!(query, "translated request into filters");
        Ok(spec)
    }

    fn suggest(&self, input: &str, options: &FilterOptions) -> Result<FilterSuggestions> {
        let reply = self.generate(&suggestion_prompt(input, options))?;
        let suggestions: FilterSuggestions = serde_json::from_str(extract_json(&reply))
            .map_err(|e| MsError::TranslationFailed(format!("model output is not suggestion JSON: {e}")))?;
        Ok(suggestions.restricted_to(options))
    }
}
