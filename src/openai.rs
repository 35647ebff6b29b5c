//! Minimal OpenAI-compatible chat client used for coding hints.
//!
//! Calls are instrumented and log model names, latencies and response sizes (not contents).
//!
//! NOTE: We never log the API key or the learner's code.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::util::{fill_template, trunc_for_log};

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

/// What the hint prompt gets filled with. `code` is already windowed by the caller.
#[derive(Debug, Clone, Copy)]
pub struct HintPrompt<'a> {
  pub language: &'a str,
  pub code: &'a str,
  pub error_message: &'a str,
  pub cursor_line: Option<u32>,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    Self::new(api_key, base_url, model)
  }

  pub fn new(api_key: String, base_url: String, model: String) -> Option<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;
    Some(Self { client, api_key, base_url: base_url.trim_end_matches('/').to_string(), model })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_plain(&self, system: &str, user: &str, temperature: f32) -> Result<String, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      max_tokens: Some(200),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "learnhub-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 300));
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(target: "hints", prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();

    Ok(text)
  }

  /// One short hint for the learner's code.
  #[instrument(
    level = "info",
    skip(self, prompts, input),
    fields(language = %input.language, code_len = input.code.len(), has_error = !input.error_message.is_empty())
  )]
  pub async fn coding_hint(&self, prompts: &Prompts, input: HintPrompt<'_>) -> Result<String, String> {
    let cursor = input.cursor_line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".into());
    let error_message = if input.error_message.is_empty() { "none" } else { input.error_message };
    let user = fill_template(
      &prompts.hint_user_template,
      &[
        ("language", input.language),
        ("cursor_line", &cursor),
        ("error_message", error_message),
        ("code", input.code),
      ],
    );

    let start = Instant::now();
    let result = self.chat_plain(&prompts.hint_system, &user, 0.2).await;
    let elapsed = start.elapsed();
    match &result {
      Ok(text) => info!(target: "hints", ?elapsed, hint_len = text.len(), "Model hint received"),
      Err(e) => error!(target: "hints", ?elapsed, error = %e, "Model call failed during hint generation"),
    }
    result
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{routing::post, Json, Router};
  use serde_json::{json, Value};

  async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
    format!("http://{addr}")
  }

  fn input() -> HintPrompt<'static> {
    HintPrompt { language: "python", code: "print(x)", error_message: "NameError", cursor_line: Some(1) }
  }

  #[test]
  fn extracts_error_message() {
    assert_eq!(extract_openai_error(r#"{"error":{"message":"bad key"}}"#).as_deref(), Some("bad key"));
    assert!(extract_openai_error("not json").is_none());
  }

  #[tokio::test]
  async fn coding_hint_fills_prompt_and_trims_reply() {
    let app = Router::new().route(
      "/chat/completions",
      post(|Json(body): Json<Value>| async move {
        let user = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
        assert!(user.contains("Language: python"));
        assert!(user.contains("Error: NameError"));
        assert!(user.contains("print(x)"));
        Json(json!({ "choices": [{ "message": { "content": "  Define x first.  " } }] }))
      }),
    );
    let base = spawn(app).await;
    let oa = OpenAI::new("k".into(), format!("{base}/"), "m".into()).expect("client");
    let hint = oa.coding_hint(&Prompts::default(), input()).await.expect("hint");
    assert_eq!(hint, "Define x first.");
  }

  #[tokio::test]
  async fn coding_hint_surfaces_http_errors() {
    let app = Router::new().route(
      "/chat/completions",
      post(|| async {
        (axum::http::StatusCode::UNAUTHORIZED, Json(json!({ "error": { "message": "bad key" } })))
      }),
    );
    let base = spawn(app).await;
    let oa = OpenAI::new("k".into(), base, "m".into()).expect("client");
    let err = oa.coding_hint(&Prompts::default(), input()).await.unwrap_err();
    assert!(err.contains("401") && err.contains("bad key"), "{err}");
  }
}
