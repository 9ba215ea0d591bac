use std::{
    sync::{Arc, RwLock},
    time::Duration,
};

use {
    reqwest::{Method, RequestBuilder, header::AUTHORIZATION},
    secrecy::{ExposeSecret, Secret},
    serde::{Serialize, de::DeserializeOwned},
    tracing::{debug, warn},
    url::Url,
};

use {
    crate::{ApiError, Result},
    taskdesk_config::ApiConfig,
};

/// HTTP client for the task API with a shared default `Authorization` header.
///
/// Clones share the same bearer slot, so setting or clearing the token on one
/// handle is seen by every other handle.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
    bearer: Arc<RwLock<Option<Secret<String>>>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Self::with_http(&config.base_url, http)
    }

    /// Client for `base_url` with reqwest defaults (used by tests).
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_http(base_url, reqwest::Client::new())
    }

    fn with_http(base_url: &str, http: reqwest::Client) -> Result<Self> {
        let base = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(Self {
            base,
            http,
            bearer: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Attach `token` to every subsequent request.
    pub fn set_bearer(&self, token: Secret<String>) {
        *self.bearer.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }

    pub fn clear_bearer(&self) {
        *self.bearer.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Join an endpoint path onto the base URL, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!(%method, path, "api request");
        let mut builder = self.http.request(method, url);
        if let Some(token) = self
            .bearer
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
        {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }
        Ok(builder)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path)?;
        self.send_json(builder, path).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let builder = self.request(Method::GET, path)?.query(query);
        self.send_json(builder, path).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send_json(builder, path).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let builder = self.request(Method::PUT, path)?.json(body);
        self.send_json(builder, path).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder, path).await.map(|_| ())
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<reqwest::Response> {
        let resp = builder.send().await.map_err(|e| {
            warn!(path, error = %e, "api request failed");
            ApiError::from(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        warn!(path, status = status.as_u16(), error = %err, "api request rejected");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<T> {
        let resp = self.send(builder, path).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(path, error = %e, "api response did not match the expected shape");
            ApiError::from(e)
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("bearer", &self.has_bearer().then_some("[REDACTED]"))
            .finish()
    }
}
