use serde_json::{json, Value};
use tokio::runtime::Runtime;

use super::{GenerationError, TextGenerator};

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Thin wrapper around the Gemini generateContent endpoint allowing
/// synchronous callers to request completions without exposing async details.
pub struct GeminiClient {
    http: reqwest::Client,
    runtime: Runtime,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, runtime: Runtime, api_key: String, model: String) -> Self {
        Self {
            http,
            runtime,
            api_key,
            model,
        }
    }

    pub fn with_runtime(api_key: String, model: String) -> Result<Self, GenerationError> {
        let runtime = Runtime::new().map_err(|err| GenerationError::Runtime(err.to_string()))?;
        Ok(Self::new(reqwest::Client::new(), runtime, api_key, model))
    }

    fn map_error<E: std::fmt::Display>(err: E) -> GenerationError {
        GenerationError::Backend(err.to_string())
    }

    fn extract_text(body: &Value) -> Option<String> {
        body.get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()
            .map(str::to_string)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl TextGenerator for GeminiClient {
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{GEMINI_ENDPOINT}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let payload = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_prompt }] }],
        });

        let result = self.runtime.block_on(async {
            let response = self.http.post(&url).json(&payload).send().await?;
            response.error_for_status()?.json::<Value>().await
        });

        let body = result.map_err(Self::map_error)?;
        Self::extract_text(&body).ok_or_else(|| {
            GenerationError::Backend("response contained no candidate text".to_string())
        })
    }
}
