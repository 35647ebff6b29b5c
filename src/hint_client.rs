//! Client side of the hint contract.
//!
//! `HintClient` performs one POST per call, with no retry. `HintFetcher` layers the
//! three observable states (idle, loading, resolved) on top and publishes them on a
//! `watch` channel so a UI can follow along.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::protocol::HintRequest;

#[derive(Error, Debug)]
pub enum HintError {
  /// Any non-2xx response. The body is not inspected.
  #[error("Failed to get hint (HTTP {0})")]
  Status(StatusCode),

  #[error("Failed to get hint: {0}")]
  Transport(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct HintClient {
  client: reqwest::Client,
  endpoint: String,
}

impl HintClient {
  /// `endpoint` is the full URL of the hint route, e.g. `http://host/api/v1/hint`.
  pub fn new(endpoint: impl Into<String>) -> Result<Self, HintError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, endpoint: endpoint.into() })
  }

  pub fn endpoint(&self) -> &str { &self.endpoint }

  /// POST the request; a missing, null or non-string `hint` field reads as "".
  #[instrument(level = "debug", skip(self, req), fields(endpoint = %self.endpoint, language = %req.language, code_len = req.code.len()))]
  pub async fn fetch_hint(&self, req: &HintRequest) -> Result<String, HintError> {
    let res = self.client.post(&self.endpoint).json(req).send().await?;
    let status = res.status();
    if !status.is_success() {
      warn!(target: "hints", %status, "Hint endpoint returned an error status");
      return Err(HintError::Status(status));
    }
    let body: Value = res.json().await?;
    let hint = body.get("hint").and_then(Value::as_str).unwrap_or_default().to_string();
    debug!(target: "hints", hint_len = hint.len(), "Hint received");
    Ok(hint)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HintState {
  #[default]
  Idle,
  Loading,
  Ready(String),
  Failed(String),
}

impl HintState {
  pub fn is_loading(&self) -> bool { matches!(self, HintState::Loading) }
}

pub struct HintFetcher {
  client: HintClient,
  state: watch::Sender<HintState>,
}

impl HintFetcher {
  pub fn new(client: HintClient) -> Self {
    let (state, _) = watch::channel(HintState::Idle);
    Self { client, state }
  }

  pub fn subscribe(&self) -> watch::Receiver<HintState> {
    self.state.subscribe()
  }

  pub fn state(&self) -> HintState {
    self.state.borrow().clone()
  }

  /// Clears any previous hint or error, goes to `Loading`, then resolves.
  /// A failure leaves only the error message; the caller re-invokes to retry.
  pub async fn request(&self, req: &HintRequest) -> HintState {
    self.state.send_replace(HintState::Loading);
    let next = match self.client.fetch_hint(req).await {
      Ok(hint) => HintState::Ready(hint),
      Err(e) => HintState::Failed(e.to_string()),
    };
    self.state.send_replace(next.clone());
    next
  }

  pub fn reset(&self) {
    self.state.send_replace(HintState::Idle);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::{http::StatusCode as AxStatus, routing::post, Json, Router};
  use serde_json::json;

  async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve") });
    format!("http://{addr}/hint")
  }

  fn req() -> HintRequest {
    HintRequest {
      code: "let x = ;".into(),
      language: "javascript".into(),
      error_message: Some("SyntaxError: Unexpected token ';'".into()),
      cursor_line: Some(1),
    }
  }

  #[tokio::test]
  async fn returns_hint_and_sends_camel_case_body() {
    let app = Router::new().route(
      "/hint",
      post(|Json(body): Json<Value>| async move {
        let ok = body["errorMessage"].is_string() && body["cursorLine"] == json!(1);
        Json(json!({ "hint": if ok { "Give x a value." } else { "wrong body" } }))
      }),
    );
    let endpoint = spawn(app).await;
    let client = HintClient::new(endpoint.clone()).expect("client");
    assert_eq!(client.endpoint(), endpoint);
    assert_eq!(client.fetch_hint(&req()).await.expect("hint"), "Give x a value.");
  }

  #[tokio::test]
  async fn missing_or_null_hint_reads_as_empty() {
    let app = Router::new()
      .route("/hint", post(|| async { Json(json!({ "other": 1 })) }));
    let client = HintClient::new(spawn(app).await).expect("client");
    assert_eq!(client.fetch_hint(&req()).await.expect("hint"), "");

    let app = Router::new()
      .route("/hint", post(|| async { Json(json!({ "hint": null })) }));
    let client = HintClient::new(spawn(app).await).expect("client");
    assert_eq!(client.fetch_hint(&req()).await.expect("hint"), "");
  }

  #[tokio::test]
  async fn non_success_status_is_a_generic_error() {
    let app = Router::new().route(
      "/hint",
      post(|| async { (AxStatus::SERVICE_UNAVAILABLE, Json(json!({ "hint": "ignored" }))) }),
    );
    let client = HintClient::new(spawn(app).await).expect("client");
    let err = client.fetch_hint(&req()).await.unwrap_err();
    assert!(matches!(err, HintError::Status(s) if s == StatusCode::SERVICE_UNAVAILABLE));
  }

  #[tokio::test]
  async fn fetcher_walks_through_states_and_clears_previous_result() {
    let app = Router::new().route(
      "/hint",
      post(|Json(body): Json<Value>| async move {
        if body["language"] == "fail" {
          (AxStatus::INTERNAL_SERVER_ERROR, Json(json!({})))
        } else {
          (AxStatus::OK, Json(json!({ "hint": "check line 1" })))
        }
      }),
    );
    let fetcher = HintFetcher::new(HintClient::new(spawn(app).await).expect("client"));
    let mut rx = fetcher.subscribe();
    assert_eq!(fetcher.state(), HintState::Idle);

    let ok = fetcher.request(&req()).await;
    assert_eq!(ok, HintState::Ready("check line 1".into()));
    assert!(rx.has_changed().expect("open"));
    assert_eq!(*rx.borrow_and_update(), HintState::Ready("check line 1".into()));

    let mut failing = req();
    failing.language = "fail".into();
    let failed = fetcher.request(&failing).await;
    match failed {
      HintState::Failed(msg) => assert!(msg.contains("500"), "{msg}"),
      other => panic!("unexpected state {other:?}"),
    }

    fetcher.reset();
    assert_eq!(fetcher.state(), HintState::Idle);
  }

  #[tokio::test]
  async fn fetcher_reports_loading_while_in_flight() {
    let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
    let release_rx = std::sync::Arc::new(tokio::sync::Mutex::new(Some(release_rx)));
    let app = Router::new().route(
      "/hint",
      post(move || {
        let release_rx = release_rx.clone();
        async move {
          if let Some(rx) = release_rx.lock().await.take() {
            let _ = rx.await;
          }
          Json(json!({ "hint": "done" }))
        }
      }),
    );
    let fetcher = std::sync::Arc::new(HintFetcher::new(HintClient::new(spawn(app).await).expect("client")));
    let mut rx = fetcher.subscribe();

    let task = {
      let fetcher = fetcher.clone();
      tokio::spawn(async move { fetcher.request(&req()).await })
    };

    rx.changed().await.expect("changed");
    assert!(rx.borrow_and_update().is_loading());
    release_tx.send(()).expect("release");

    assert_eq!(task.await.expect("join"), HintState::Ready("done".into()));
    assert_eq!(fetcher.state(), HintState::Ready("done".into()));
  }
}
