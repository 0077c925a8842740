use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

use super::{ChatContext, ModelService, Role, Turn};
use crate::config::{Config, ModelConfig};

/// Gemini API request structures
#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiRequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestContent<'a> {
    role: &'static str,
    parts: Vec<GeminiRequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart<'a> {
    text: &'a str,
}

/// Wire body for a conversation, oldest turn first
fn request(turns: &[Turn]) -> GeminiRequest<'_> {
    GeminiRequest {
        contents: turns
            .iter()
            .map(|t| GeminiRequestContent {
                role: t.role.as_str(),
                parts: vec![GeminiRequestPart { text: &t.text }],
            })
            .collect(),
    }
}

/// Gemini API response structures
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first candidate, parts joined
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Blocking client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    agent: ureq::Agent,
    url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &ModelConfig, api_key: String) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            url: format!(
                "{}/models/{}:generateContent",
                config.api_base.trim_end_matches('/'),
                config.name
            ),
            api_key,
        }
    }

    /// Build a client, resolving the API key from the environment or `.env`
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let api_key = get_api_key(&config.api_key_env)?;
        log::info!("Using Gemini model {}", config.name);
        Ok(Self::new(config, api_key))
    }

    fn complete(&self, turns: &[Turn]) -> Result<String> {
        let payload = request(turns);
        let request_body = serde_json::to_string(&payload).context("Failed to serialize request")?;

        log::debug!("Calling Gemini with {} turns", turns.len());

        let mut response = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .send(request_body.as_bytes())
            .context("Failed to call Gemini API")?;

        let status = response.status().as_u16();
        let response_body = response
            .body_mut()
            .read_to_string()
            .context("Failed to read response")?;

        if !(200..300).contains(&status) {
            log::warn!("Gemini returned HTTP {}", status);
            eyre::bail!("Gemini API error ({}): {}", status, error_message(&response_body));
        }

        let response: GeminiResponse =
            serde_json::from_str(&response_body).context("Failed to parse Gemini response")?;

        response
            .text()
            .ok_or_else(|| eyre::eyre!("No text in Gemini response"))
    }
}

impl ModelService for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(&[Turn::user(prompt)])
    }

    fn open_chat(&self, seed: Vec<Turn>) -> Result<Box<dyn ChatContext>> {
        if let Some(last) = seed.last()
            && last.role == Role::User
        {
            eyre::bail!("Chat seed must end with a model turn");
        }
        Ok(Box::new(GeminiChat {
            client: self.clone(),
            history: seed,
        }))
    }
}

/// Conversation whose history is replayed on every request
struct GeminiChat {
    client: GeminiClient,
    history: Vec<Turn>,
}

impl ChatContext for GeminiChat {
    fn send(&mut self, text: &str) -> Result<String> {
        self.history.push(Turn::user(text));
        match self.client.complete(&self.history) {
            Ok(reply) => {
                self.history.push(Turn::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }
}

/// Pull `error.message` out of an API error body, else return it raw
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn get_api_key(env_var: &str) -> Result<String> {
    // Check environment variable first
    if let Ok(key) = std::env::var(env_var)
        && !key.trim().is_empty()
    {
        return Ok(key);
    }

    // Check the parley directory's .env file
    let env_file = Config::parley_dir().join(".env");
    if env_file.exists() {
        let content = fs::read_to_string(&env_file).context("Failed to read .env file")?;
        if let Some(value) = find_env_value(&content, env_var) {
            return Ok(value);
        }
    }

    eyre::bail!(
        "Missing API key: {} not found in environment or {}",
        env_var,
        env_file.display()
    )
}

fn find_env_value(content: &str, env_var: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        if let Some((key, value)) = line.split_once('=')
            && key.trim() == env_var
        {
            return Some(value.trim().trim_matches('"').trim_matches('\'').to_string());
        }
    }
    None
}
