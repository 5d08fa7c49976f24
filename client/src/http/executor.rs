use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::types::ApiConfig;
use tracing::{debug, warn};

use super::decoder::{self, ErrorContext};
use super::query::Query;
use crate::cancel::CancelToken;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionHandle;

pub type HttpClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

const JSON: &str = "application/json";

/// Status and fully-read body of a response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Sends requests to the backend.
///
/// Attaches the bearer token from the session's credential store, bounds
/// every exchange by the configured timeout, races the bound cancel token,
/// and expires the session on any 401.
#[derive(Clone)]
pub struct RequestExecutor {
    base_url: Arc<str>,
    client: HttpClient,
    session: SessionHandle,
    timeout: Duration,
    cancel: Option<CancelToken>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn build_client() -> HttpClient {
    let https = HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();

    Client::builder(TokioExecutor::new()).build(https)
}

impl RequestExecutor {
    pub fn new(base_url: &str, timeout: Duration, session: SessionHandle) -> Self {
        Self {
            base_url: Arc::from(base_url.trim_end_matches('/')),
            client: build_client(),
            session,
            timeout,
            cancel: None,
        }
    }

    pub fn from_config(config: &ApiConfig, session: SessionHandle) -> Self {
        Self::new(&config.resolved_base_url(), config.timeout(), session)
    }

    /// Clone bound to `token`; requests issued through it abort with
    /// [`ApiError::Cancelled`] once the token fires.
    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str, query: &Query) -> String {
        if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query.encode())
        }
    }

    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<Bytes>,
    ) -> ApiResult<RawResponse> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(ApiError::Cancelled);
        }

        let url: String = self.url(path, query);

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(&url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON);

        if let Some(token) = self.session.token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder
            .body(Full::new(body.unwrap_or_default()))
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        debug!("{} {}", method, url);

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e: hyper_util::client::legacy::Error| ApiError::Network(e.to_string()))?;

            let status: StatusCode = response.status();
            let body: Bytes = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?
                .to_bytes();

            Ok::<_, ApiError>(RawResponse { status, body })
        };

        let bounded = tokio::time::timeout(self.timeout, exchange);

        let outcome = match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("{} {} cancelled", method, url);
                        return Err(ApiError::Cancelled);
                    }
                    res = bounded => res,
                }
            }
            None => bounded.await,
        };

        let raw: RawResponse = match outcome {
            Ok(res) => res?,
            Err(_) => {
                warn!("{} {} timed out after {:?}", method, url, self.timeout);
                return Err(ApiError::Timeout(self.timeout));
            }
        };

        debug!("{} {} -> {}", method, url, raw.status.as_u16());

        if raw.status == StatusCode::UNAUTHORIZED {
            self.session.expire();
        }

        Ok(raw)
    }

    fn encode_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<Bytes> {
        serde_json::to_vec(body)
            .map(Bytes::from)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        ctx: &ErrorContext,
    ) -> ApiResult<T> {
        let raw = self.execute(Method::GET, path, query, None).await?;
        decoder::decode(raw.status, &raw.body, ctx)
    }

    /// GET whose `null` payload means an empty list.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        ctx: &ErrorContext,
    ) -> ApiResult<Vec<T>> {
        let raw = self.execute(Method::GET, path, query, None).await?;
        decoder::decode_list(raw.status, &raw.body, ctx)
    }

    /// GET returning the body as-is, for file downloads.
    pub async fn get_bytes(&self, path: &str, query: &Query, ctx: &ErrorContext) -> ApiResult<Bytes> {
        let raw = self.execute(Method::GET, path, query, None).await?;
        decoder::decode_bytes(raw.status, raw.body, ctx)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B, ctx: &ErrorContext) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = Self::encode_body(body)?;
        let raw = self
            .execute(Method::POST, path, &Query::new(), Some(bytes))
            .await?;
        decoder::decode(raw.status, &raw.body, ctx)
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str, ctx: &ErrorContext) -> ApiResult<T> {
        let raw = self.execute(Method::POST, path, &Query::new(), None).await?;
        decoder::decode(raw.status, &raw.body, ctx)
    }

    pub async fn put<B, T>(&self, path: &str, body: &B, ctx: &ErrorContext) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = Self::encode_body(body)?;
        let raw = self
            .execute(Method::PUT, path, &Query::new(), Some(bytes))
            .await?;
        decoder::decode(raw.status, &raw.body, ctx)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, ctx: &ErrorContext) -> ApiResult<T> {
        let raw = self
            .execute(Method::DELETE, path, &Query::new(), None)
            .await?;
        decoder::decode(raw.status, &raw.body, ctx)
    }
}
