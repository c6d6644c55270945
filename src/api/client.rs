use std::sync::Arc;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;

use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::pipeline::{Outcome, Pipeline, RequestContext, ResponseContext};
use crate::session::SessionStore;

/// Typed client for the banking backend.
///
/// Every call goes through the request pipeline and comes back either as the
/// decoded payload or as a normalized [`ClientError`].
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: Arc<SessionStore>,
    pipeline: Pipeline,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>, pipeline: Pipeline) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::configuration(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            base: config.api_url.clone(),
            session,
            pipeline,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, endpoint: &str) -> ClientResult<Url> {
        let base = self.base.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{endpoint}"))
            .map_err(|err| ClientError::configuration(format!("invalid endpoint {endpoint}: {err}")))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        self.send::<(), T>(Method::GET, endpoint, None).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> ClientResult<T> {
        self.send(Method::POST, endpoint, Some(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        self.send::<(), T>(Method::POST, endpoint, None).await
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> ClientResult<T> {
        self.send(Method::PUT, endpoint, Some(body)).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(&self, method: Method, endpoint: &str, body: Option<&B>) -> ClientResult<T> {
        let ctx = self.pipeline.outbound(RequestContext::new(method, endpoint));
        let url = self.url_for(&ctx.endpoint)?;

        let span = tracing::debug_span!(
            "api_call",
            method = %ctx.method,
            endpoint = %ctx.endpoint,
            request_id = ctx.request_id.as_deref().unwrap_or("-"),
        );

        async move {
            let mut request = self.http.request(ctx.method.clone(), url).headers(ctx.headers.clone());
            if let Some(body) = body {
                request = request.json(body);
            }

            let outcome = match request.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    match resp.bytes().await {
                        Ok(bytes) => Outcome::Response { status, body: bytes.to_vec() },
                        Err(err) => Outcome::TransportFailure(ClientError::from(err).message().to_string()),
                    }
                }
                Err(err) => Outcome::TransportFailure(ClientError::from(err).message().to_string()),
            };

            let ctx = self.pipeline.inbound(ResponseContext::for_request(&ctx, outcome));
            finish(ctx)
        }
        .instrument(span)
        .await
    }
}

fn finish<T: DeserializeOwned>(ctx: ResponseContext) -> ClientResult<T> {
    match ctx.outcome {
        Outcome::TransportFailure(message) => {
            tracing::debug!(error = %message, "no response");
            Err(ClientError::transport(message))
        }
        Outcome::Response { status, body } if status.is_success() => {
            tracing::debug!(status = status.as_u16(), "ok");
            decode(&ctx.endpoint, &body)
        }
        Outcome::Response { status, body } => {
            let err = ClientError::from_response(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), error = %err.message(), "request failed");
            Err(err)
        }
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> ClientResult<T> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) { b"null" } else { body };
    let de = &mut serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(de).map_err(|err| {
        ClientError::unknown(format!("unexpected response from {endpoint} at {}: {}", err.path(), err.inner()))
    })
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
