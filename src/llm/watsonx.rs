use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::types::{GenerationParams, LlmClient};
use super::LlmError;
use crate::config::WatsonxSecrets;

/// Text generation API version pinned for request/response shape.
const API_VERSION: &str = "2023-05-29";

/// Refresh the IAM token this long before it actually expires.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// watsonx.ai HTTP client for hosted text generation.
pub struct WatsonxClient {
    base_url: String,
    iam_url: String,
    api_key: String,
    project_id: String,
    model_id: String,
    params: GenerationParams,
    client: reqwest::blocking::Client,
    token: Mutex<Option<BearerToken>>,
}

struct BearerToken {
    value: String,
    refresh_at: Instant,
}

impl WatsonxClient {
    /// Create a client without contacting the service.
    pub fn new(secrets: &WatsonxSecrets) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: secrets.url.trim_end_matches('/').to_string(),
            iam_url: secrets.iam_url.clone(),
            api_key: secrets.api_key.clone(),
            project_id: secrets.project_id.clone(),
            model_id: secrets.model_id.clone(),
            params: GenerationParams::default(),
            client,
            token: Mutex::new(None),
        })
    }

    /// Create a client and prove the credentials work by exchanging the
    /// API key for a bearer token. Used at startup.
    pub fn connect(secrets: &WatsonxSecrets) -> Result<Self, LlmError> {
        let client = Self::new(secrets)?;
        client.bearer_token()?;
        tracing::info!(
            model = %client.model_id,
            url = %client.base_url,
            "watsonx client authenticated"
        );
        Ok(client)
    }

    fn generation_url(&self) -> String {
        format!(
            "{}/ml/v1/text/generation?version={API_VERSION}",
            self.base_url
        )
    }

    /// Cached bearer token, refreshed shortly before expiry.
    fn bearer_token(&self) -> Result<String, LlmError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| LlmError::Authentication("token cache lock poisoned".into()))?;

        if let Some(token) = guard.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.exchange_api_key()?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }

    fn exchange_api_key(&self) -> Result<BearerToken, LlmError> {
        let response = self
            .client
            .post(&self.iam_url)
            .header("Accept", "application/json")
            .form(&[("grant_type", IAM_GRANT_TYPE), ("apikey", self.api_key.as_str())])
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.iam_url.clone())
                } else {
                    LlmError::Authentication(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Authentication(format!("status {status}: {body}")));
        }

        let parsed: IamTokenResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        let lifetime = Duration::from_secs(parsed.expires_in);
        let refresh_in = lifetime.saturating_sub(TOKEN_REFRESH_MARGIN);
        Ok(BearerToken {
            value: parsed.access_token,
            refresh_at: Instant::now() + refresh_in,
        })
    }
}

/// Response body from the IAM token endpoint
#[derive(Deserialize)]
struct IamTokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Request body for /ml/v1/text/generation
#[derive(Serialize)]
struct GenerationRequest<'a> {
    model_id: &'a str,
    input: &'a str,
    project_id: &'a str,
    parameters: &'a GenerationParams,
}

/// Response body from /ml/v1/text/generation
#[derive(Deserialize)]
struct GenerationResponse {
    results: Vec<GenerationResult>,
}

#[derive(Deserialize)]
struct GenerationResult {
    generated_text: String,
    #[serde(default)]
    stop_reason: Option<String>,
}

impl LlmClient for WatsonxClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let token = self.bearer_token()?;
        let body = GenerationRequest {
            model_id: &self.model_id,
            input: prompt,
            project_id: &self.project_id,
            parameters: &self.params,
        };

        let response = self
            .client
            .post(self.generation_url())
            .bearer_auth(token)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connection(self.base_url.clone())
                } else {
                    LlmError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerationResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;
        tracing::debug!(stop_reason = ?result.stop_reason, "generation finished");

        Ok(result.generated_text)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn params(&self) -> &GenerationParams {
        &self.params
    }
}

// ═══════════════════════════════════════════════════════════
// Mock client
// ═══════════════════════════════════════════════════════════

enum MockBehavior {
    Fixed(String),
    Scripted(Mutex<VecDeque<Result<String, LlmError>>>),
    Failing(LlmError),
}

/// Mock LLM client for testing: returns configured completions and
/// records every prompt it receives.
pub struct MockLlmClient {
    behavior: MockBehavior,
    prompts: Mutex<Vec<String>>,
    params: GenerationParams,
}

impl MockLlmClient {
    /// Always answers with `response`.
    pub fn new(response: &str) -> Self {
        Self::with_behavior(MockBehavior::Fixed(response.to_string()))
    }

    /// Answers with each scripted result in turn; errors once exhausted.
    pub fn scripted(results: Vec<Result<String, LlmError>>) -> Self {
        Self::with_behavior(MockBehavior::Scripted(Mutex::new(results.into())))
    }

    /// Always fails with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self::with_behavior(MockBehavior::Failing(error))
    }

    fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
            params: GenerationParams::default(),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl LlmClient for MockLlmClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.behavior {
            MockBehavior::Fixed(response) => Ok(response.clone()),
            MockBehavior::Failing(error) => Err(error.clone()),
            MockBehavior::Scripted(queue) => queue
                .lock()
                .map_err(|_| LlmError::Task("mock script lock poisoned".into()))?
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse)),
        }
    }

    fn model_id(&self) -> &str {
        "mock"
    }

    fn params(&self) -> &GenerationParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets(url: &str) -> WatsonxSecrets {
        WatsonxSecrets {
            url: url.to_string(),
            api_key: "key".into(),
            project_id: "project".into(),
            model_id: "ibm/granite-3-2-8b-instruct".into(),
            iam_url: "http://127.0.0.1:9/identity/token".into(),
        }
    }

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        assert_eq!(client.complete("prompt").unwrap(), "test response");
        assert_eq!(client.prompts(), vec!["prompt"]);
    }

    #[test]
    fn scripted_mock_replays_in_order() {
        let client = MockLlmClient::scripted(vec![
            Ok("first".into()),
            Err(LlmError::Connection("x".into())),
        ]);
        assert_eq!(client.complete("a").unwrap(), "first");
        assert!(client.complete("b").is_err());
        assert_eq!(client.complete("c").unwrap_err(), LlmError::EmptyResponse);
        assert_eq!(client.prompts().len(), 3);
    }

    #[test]
    fn failing_mock_always_errors() {
        let client = MockLlmClient::failing(LlmError::Service {
            status: 503,
            body: "down".into(),
        });
        assert!(client.complete("x").is_err());
        assert!(client.complete("y").is_err());
    }

    #[test]
    fn watsonx_client_trims_trailing_slash() {
        let client = WatsonxClient::new(&secrets("https://us-south.ml.cloud.ibm.com/")).unwrap();
        assert_eq!(client.base_url, "https://us-south.ml.cloud.ibm.com");
        assert_eq!(
            client.generation_url(),
            "https://us-south.ml.cloud.ibm.com/ml/v1/text/generation?version=2023-05-29"
        );
    }

    #[test]
    fn watsonx_client_uses_fixed_params() {
        let client = WatsonxClient::new(&secrets("https://example.com")).unwrap();
        assert_eq!(client.params(), &GenerationParams::default());
        assert_eq!(client.model_id(), "ibm/granite-3-2-8b-instruct");
    }

    #[test]
    fn connect_fails_when_iam_unreachable() {
        // Port 9 (discard) is closed on test hosts.
        let result = WatsonxClient::connect(&secrets("https://example.com"));
        assert!(result.is_err());
    }

    #[test]
    fn generation_request_shape() {
        let params = GenerationParams::default();
        let body = GenerationRequest {
            model_id: "m",
            input: "hello",
            project_id: "p",
            parameters: &params,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["input"], "hello");
        assert_eq!(json["project_id"], "p");
        assert_eq!(json["parameters"]["stop_sequences"][0], "Human:");
    }

    #[test]
    fn generation_response_parses_first_result() {
        let raw = r#"{"model_id":"m","results":[{"generated_text":"Drink water.","generated_token_count":3,"input_token_count":5,"stop_reason":"eos_token"}]}"#;
        let parsed: GenerationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.results[0].generated_text, "Drink water.");
        assert_eq!(parsed.results[0].stop_reason.as_deref(), Some("eos_token"));
    }
}
