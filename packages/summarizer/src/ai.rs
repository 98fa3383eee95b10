// ABOUTME: AI service for structured generation calls to Google Gemini
// ABOUTME: Handles API requests, code-fence stripping, and JSON parsing

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{SummarizerError, SummarizerResult};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// AI service for making structured generation calls
pub struct AiService {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl AiService {
    pub fn new(api_key: Option<String>, model: Option<String>) -> SummarizerResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(SummarizerError::RequestFailed)?;

        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model != DEFAULT_MODEL {
            info!("Using custom Gemini model: {}", model);
        }

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a structured generation call. The prompt must request JSON
    /// output; the response is fence-stripped and parsed into `T`.
    pub async fn generate_structured<T: for<'de> Deserialize<'de>>(
        &self,
        prompt: String,
    ) -> SummarizerResult<T> {
        let api_key = self.api_key.as_ref().ok_or(SummarizerError::NoApiKey)?;

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: DEFAULT_TEMPERATURE,
                response_mime_type: "application/json",
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_URL, self.model, api_key
        );

        info!("Making Gemini API request: model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(SummarizerError::RequestFailed)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(SummarizerError::Upstream(format!(
                "Model API returned {}",
                status
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::ParseError(e.to_string()))?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| SummarizerError::ParseError("Empty model response".to_string()))?;

        let json_text = strip_code_fences(&text);

        serde_json::from_str(json_text).map_err(|e| {
            error!("Model JSON parsing failed: {}", e);
            SummarizerError::SchemaValidation(format!("Failed to parse model JSON: {}", e))
        })
    }
}

/// Strip markdown code fences if present (```json ... ```)
fn strip_code_fences(text: &str) -> &str {
    let cleaned = text.trim();
    if !cleaned.starts_with("```") {
        return cleaned;
    }

    let start = cleaned.find('\n').map(|i| i + 1).unwrap_or(0);
    let end = cleaned[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(cleaned.len());
    cleaned[start..end].trim()
}
