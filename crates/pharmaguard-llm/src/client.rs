//! Gemini HTTP client implementing the core explanation seam.

use pharmaguard_core::{
    DrugExplanation, ExplanationError, ExplanationRequest, ExplanationResult,
    ExplanationSource,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::prompts::{build_report_prompt, response_schema};
use crate::response::parse_explanation;

/// Environment variable holding the API credential. Read once at client
/// construction; absence is a fatal startup condition.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Model used for report generation.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    /// Create a client with an explicit credential and endpoint.
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: &str,
        timeout_secs: u64,
    ) -> ExplanationResult<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ExplanationError::MissingCredential);
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExplanationError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            client,
            timeout_secs,
        })
    }

    /// Create a client from the process environment.
    pub fn from_env() -> ExplanationResult<Self> {
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_| ExplanationError::MissingCredential)?;
        Self::new(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS)
    }

    /// Call `generateContent` and return the first candidate's text.
    async fn generate(&self, prompt: &str) -> ExplanationResult<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ExplanationError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ExplanationError::Timeout(self.timeout_secs)
                } else {
                    ExplanationError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generateContent returned an error");
            return Err(ExplanationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ExplanationError::InvalidFormat(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ExplanationError::EmptyResponse);
        }
        Ok(text)
    }
}

impl ExplanationSource for GeminiClient {
    async fn explain(&self, request: &ExplanationRequest) -> ExplanationResult<DrugExplanation> {
        debug!(drug = %request.drug, gene = %request.gene, "requesting clinical explanation");
        let prompt = build_report_prompt(request);
        let text = self.generate(&prompt).await?;
        parse_explanation(&text)
    }
}

/// Request body for `generateContent`.
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Response body from `generateContent`.
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GeminiClient::new(
            "test-key",
            "https://example.invalid/v1beta/",
            DEFAULT_MODEL,
            30,
        )
        .unwrap();
        assert_eq!(client.base_url, "https://example.invalid/v1beta");
        assert_eq!(client.timeout_secs, 30);
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let err =
            GeminiClient::new("", DEFAULT_BASE_URL, DEFAULT_MODEL, 30).unwrap_err();
        assert!(matches!(err, ExplanationError::MissingCredential));
    }

    #[test]
    fn test_from_env_requires_credential() {
        std::env::remove_var(API_KEY_ENV);
        let err = GeminiClient::from_env().unwrap_err();
        assert!(matches!(err, ExplanationError::MissingCredential));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "prompt" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(value["generationConfig"]["responseSchema"].is_object());
    }

    #[test]
    fn test_response_body_parsing() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "part one "}, {"text": "part two"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        assert_eq!(text, "part one part two");
    }

    #[test]
    fn test_empty_candidates_parse_to_no_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_maps_to_transport_error() {
        use pharmaguard_core::{MetabolizerPhenotype, RiskCategory};

        // Port 9 (discard) is closed on any sane host.
        let client = GeminiClient::new("test-key", "http://127.0.0.1:9", DEFAULT_MODEL, 5).unwrap();
        let request = ExplanationRequest {
            drug: "Codeine".to_string(),
            gene: "CYP2D6".to_string(),
            phenotype: MetabolizerPhenotype::Poor,
            risk: RiskCategory::Ineffective,
        };

        let err = client.explain(&request).await.unwrap_err();
        assert!(matches!(
            err,
            ExplanationError::Connection(_) | ExplanationError::Http(_)
        ));
    }
}
