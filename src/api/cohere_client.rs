use async_trait::async_trait;
use backon::ExponentialBuilder;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::LanguageModel;
use crate::api::cohere_api::CohereApi;
use crate::config::Config;
use crate::error::CourierError;
use crate::types::cohere::{ChatRequest, ChatResponse};

/// Cohere chat model behind the [`LanguageModel`] seam.
#[derive(Clone)]
pub struct CohereClient {
    client: reqwest::Client,
    chat_url: Url,
    api_key: String,
    model: String,
    temperature: f32,
    retry_policy: ExponentialBuilder,
}

impl CohereClient {
    pub fn new(client: reqwest::Client, cfg: &Config) -> Result<Self, CourierError> {
        Ok(Self {
            client,
            chat_url: chat_endpoint(&cfg.cohere_base_url)?,
            api_key: cfg.cohere_api_key.clone(),
            model: cfg.cohere_model.clone(),
            temperature: cfg.temperature,
            retry_policy: Self::default_retry_policy(),
        })
    }

    /// Replace the backoff used for 5xx replies.
    pub fn with_retry_policy(mut self, retry_policy: ExponentialBuilder) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    fn default_retry_policy() -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(3))
            .with_max_times(3)
            .with_jitter()
    }
}

/// `<base>/v2/chat`, keeping any path prefix on `base`.
fn chat_endpoint(base: &Url) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("v2/chat")
}

#[async_trait]
impl LanguageModel for CohereClient {
    async fn complete(&self, prompt: &str) -> Result<String, CourierError> {
        let body = ChatRequest::user(&self.model, prompt, self.temperature);
        let resp = CohereApi::try_post_chat(
            self.client.clone(),
            &self.chat_url,
            &self.api_key,
            self.retry_policy,
            &body,
        )
        .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CourierError::UpstreamStatus { status, body });
        }

        let chat: ChatResponse = resp.json().await?;
        debug!(
            id = chat.id.as_deref().unwrap_or("<none>"),
            finish_reason = chat.finish_reason.as_deref().unwrap_or("<none>"),
            "cohere chat completed"
        );
        Ok(chat.text())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };
    use tokio::net::TcpListener;

    /// Stand-in chat endpoint: answers every call with one fixed reply.
    struct Upstream {
        status: StatusCode,
        reply: Value,
        hits: AtomicUsize,
        authorization: Mutex<Option<String>>,
        body: Mutex<Option<Value>>,
    }

    async fn chat(
        State(upstream): State<Arc<Upstream>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        upstream.hits.fetch_add(1, Ordering::SeqCst);
        *upstream.authorization.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *upstream.body.lock().unwrap() = Some(body);
        (upstream.status, Json(upstream.reply.clone()))
    }

    /// Serves `/v2/chat` and `/cohere/v2/chat`; returns the bound base URL.
    async fn spawn_upstream(status: StatusCode, reply: Value) -> (Arc<Upstream>, Url) {
        let upstream = Arc::new(Upstream {
            status,
            reply,
            hits: AtomicUsize::new(0),
            authorization: Mutex::new(None),
            body: Mutex::new(None),
        });
        let app = Router::new()
            .route("/v2/chat", post(chat))
            .route("/cohere/v2/chat", post(chat))
            .with_state(upstream.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (upstream, Url::parse(&format!("http://{addr}")).unwrap())
    }

    fn text_reply(text: &str) -> Value {
        json!({
            "id": "chat-1",
            "finish_reason": "COMPLETE",
            "message": {
                "role": "assistant",
                "content": [{ "type": "text", "text": text }]
            }
        })
    }

    fn client_for(base: Url) -> CohereClient {
        let cfg = Config {
            cohere_base_url: base,
            cohere_api_key: "test-key".to_string(),
            cohere_model: "command-r".to_string(),
            ..Config::default()
        };
        CohereClient::new(reqwest::Client::new(), &cfg)
            .unwrap()
            .with_retry_policy(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(1))
                    .with_max_delay(Duration::from_millis(5))
                    .with_max_times(2),
            )
    }

    #[test]
    fn chat_endpoint_keeps_base_path() {
        let root = Url::parse("https://api.cohere.com").unwrap();
        assert_eq!(chat_endpoint(&root).unwrap().as_str(), "https://api.cohere.com/v2/chat");

        let prefixed = Url::parse("http://gw.internal/cohere").unwrap();
        assert_eq!(
            chat_endpoint(&prefixed).unwrap().as_str(),
            "http://gw.internal/cohere/v2/chat"
        );

        let slashed = Url::parse("http://gw.internal/cohere/").unwrap();
        assert_eq!(
            chat_endpoint(&slashed).unwrap().as_str(),
            "http://gw.internal/cohere/v2/chat"
        );
    }

    #[tokio::test]
    async fn posts_chat_request_with_bearer_key() {
        let (upstream, base) = spawn_upstream(StatusCode::OK, text_reply("READ")).await;
        let client = client_for(base);

        let text = client.complete("classify this").await.unwrap();
        assert_eq!(text, "READ");
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            upstream.authorization.lock().unwrap().as_deref(),
            Some("Bearer test-key")
        );

        let body = upstream.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "command-r");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "classify this");
    }

    #[tokio::test]
    async fn prefixed_base_url_reaches_prefixed_route() {
        let (upstream, base) = spawn_upstream(StatusCode::OK, text_reply("SELECT 1")).await;
        let base = base.join("cohere").unwrap();
        let client = client_for(base);
        assert_eq!(client.chat_url().path(), "/cohere/v2/chat");

        assert_eq!(client.complete("q").await.unwrap(), "SELECT 1");
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_reply_is_returned_as_is() {
        let (_upstream, base) = spawn_upstream(StatusCode::OK, text_reply("   ")).await;

        let text = client_for(base).complete("q").await.unwrap();
        assert_eq!(text, "   ");
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_fail() {
        let (upstream, base) =
            spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, json!({ "message": "busy" })).await;

        let err = client_for(base).complete("q").await.unwrap_err();
        assert!(
            matches!(&err, CourierError::Reqwest(e) if e.status() == Some(StatusCode::SERVICE_UNAVAILABLE)),
            "unexpected error: {err}"
        );
        // first attempt plus two retries
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (upstream, base) =
            spawn_upstream(StatusCode::UNAUTHORIZED, json!({ "message": "invalid api token" }))
                .await;

        let err = client_for(base).complete("q").await.unwrap_err();
        match err {
            CourierError::UpstreamStatus { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert!(body.contains("invalid api token"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(upstream.hits.load(Ordering::SeqCst), 1);
    }
}
