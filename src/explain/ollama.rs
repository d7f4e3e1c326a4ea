use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ExplainError, ExplanationGenerator};

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "medgemma";

/// Ollama HTTP client for local explanation generation.
pub struct OllamaExplainer {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaExplainer {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Result<Self, ExplainError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExplainError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl ExplanationGenerator for OllamaExplainer {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, ExplainError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ExplainError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ExplainError::HttpClient(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    ExplainError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExplainError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ExplainError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_trimmed() {
        let explainer = OllamaExplainer::new("http://localhost:11434/", DEFAULT_MODEL, 5).unwrap();
        assert_eq!(explainer.base_url(), "http://localhost:11434");
        assert_eq!(explainer.model(), "medgemma");
    }

    #[test]
    fn request_serializes_non_streaming() {
        let body = GenerateRequest {
            model: "medgemma",
            prompt: "p",
            system: "s",
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["model"], "medgemma");
    }

    #[test]
    fn unreachable_server_is_connection_error() {
        // Port 9 (discard) is closed on test hosts.
        let explainer = OllamaExplainer::new("http://127.0.0.1:9", DEFAULT_MODEL, 2).unwrap();
        let err = explainer.generate("Be brief.", "hello").unwrap_err();
        assert!(matches!(
            err,
            ExplainError::Connection(_) | ExplainError::HttpClient(_)
        ));
    }
}
