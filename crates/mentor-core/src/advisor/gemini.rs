//! Google Gemini backend implementation
//!
//! HTTP client for the Gemini `generateContent` API. Uses the prompt
//! library for customizable prompts; all generation parameters match the
//! original product tuning.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::prompts::{PromptId, PromptLibrary};

use super::{AdvisorBackend, DiagnosticFacts};

/// Default Gemini model
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default API endpoint
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini backend
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl Clone for GeminiBackend {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            prompts: self.prompts.clone(),
        }
    }
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Point the backend at a different server (used by tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Create from environment variables
    ///
    /// Requires `GOOGLE_API_KEY`; `GEMINI_MODEL` overrides the default.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self::new(&api_key, &model))
    }

    fn render_prompt(&self, id: PromptId, vars: &HashMap<&str, &str>) -> Result<String> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::Prompt("Failed to acquire prompt library lock".into()))?;
        let template = prompts.get(id)?;
        Ok(template.render_user(vars))
    }

    /// Send one prompt through `generateContent`
    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig::default(),
            safety_settings: safety_settings(),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Advisor(format!(
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let generated: GenerateContentResponse = response.json().await?;
        let text = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::Advisor("Gemini response had no candidates".to_string()))?;

        debug!(model = %self.model, chars = text.len(), "gemini response received");
        Ok(text)
    }
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Generation tuning, matching the original product configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.75,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 8000,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn safety_settings() -> Vec<SafetySetting> {
    const THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
    vec![
        SafetySetting {
            category: "HARM_CATEGORY_HARASSMENT",
            threshold: THRESHOLD,
        },
        SafetySetting {
            category: "HARM_CATEGORY_HATE_SPEECH",
            threshold: THRESHOLD,
        },
        SafetySetting {
            category: "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            threshold: THRESHOLD,
        },
        SafetySetting {
            category: "HARM_CATEGORY_DANGEROUS_CONTENT",
            threshold: THRESHOLD,
        },
    ]
}

/// Response body from `generateContent`
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait]
impl AdvisorBackend for GeminiBackend {
    async fn financial_advice(&self, name: &str, concern: &str, facts: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("nome", name);
        vars.insert("preocupacao", concern);
        vars.insert("fatos_financeiros", facts);
        let prompt = self.render_prompt(PromptId::FinancialAdvice, &vars)?;
        self.generate(prompt).await
    }

    async fn personalized_tip(&self, facts: &DiagnosticFacts) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("comprometimento_renda", facts.commitment.as_str());
        vars.insert("endividamento", facts.debt_ratio.as_str());
        vars.insert("classificacao", facts.classification.as_str());
        vars.insert("dividas_linha", facts.debts_line.as_str());
        vars.insert("reserva_linha", facts.reserve_line.as_str());
        let prompt = self.render_prompt(PromptId::PersonalizedTip, &vars)?;
        self.generate(prompt).await
    }

    async fn negotiation_script(
        &self,
        name: &str,
        creditor: &str,
        amount: f64,
        days_late: u32,
    ) -> Result<String> {
        let amount_text = format!("R$ {:.2}", amount);
        let days_text = days_late.to_string();
        let mut vars = HashMap::new();
        vars.insert("nome", name);
        vars.insert("credor", creditor);
        vars.insert("valor_divida", amount_text.as_str());
        vars.insert("dias_atraso", days_text.as_str());
        let prompt = self.render_prompt(PromptId::NegotiationRoleplay, &vars)?;
        self.generate(prompt).await
    }

    async fn explain_term(&self, term: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("termo", term);
        let prompt = self.render_prompt(PromptId::ExplainTerm, &vars)?;
        self.generate(prompt).await
    }

    async fn health_check(&self) -> bool {
        // The cheapest probe that still validates the key
        self.generate("Responda apenas: ok".to_string()).await.is_ok()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "olá".to_string(),
                }],
            }],
            generation_config: GenerationConfig::default(),
            safety_settings: safety_settings(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 8000);
        assert_eq!(json["generationConfig"]["topK"], 1);
        assert_eq!(json["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "olá");
    }

    #[test]
    fn response_parses_candidates() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Considere quitar o cartão primeiro."}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.candidates[0].content.parts[0].text,
            "Considere quitar o cartão primeiro."
        );
    }

    #[test]
    fn empty_response_is_handled() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn from_env_requires_key() {
        // Scoped env juggling is racy across tests; construct directly instead.
        let backend = GeminiBackend::new("test-key", DEFAULT_MODEL);
        assert_eq!(backend.model(), "gemini-2.0-flash");
    }
}
