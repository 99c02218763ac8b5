use std::env;
use std::sync::Arc;
use std::time::Duration;

use fanpulse_core::QueryParams;
use fanpulse_logging::{pulse_debug, pulse_info, pulse_warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::notify::{failure_notice, NotificationSink};
use crate::{ApiError, ConfigError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8060/api/v1";
pub const DEFAULT_API_KEY: &str = "fan-sentiment-2024-secret";
pub const API_KEY_HEADER: &str = "x-api-key";

pub const ENV_BASE_URL: &str = "FANPULSE_API_URL";
pub const ENV_API_KEY: &str = "FANPULSE_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "FANPULSE_TIMEOUT_SECS";

const JSON_UTF8: &str = "application/json; charset=UTF-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GatewaySettings {
    /// Reads `FANPULSE_API_URL`, `FANPULSE_API_KEY` and `FANPULSE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`GatewaySettings::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        match lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
            Some(url) => settings.base_url = url.trim().to_string(),
            None => pulse_debug!("{} not set, using {}", ENV_BASE_URL, DEFAULT_BASE_URL),
        }
        match lookup(ENV_API_KEY).filter(|value| !value.trim().is_empty()) {
            Some(key) => settings.api_key = key.trim().to_string(),
            None => pulse_debug!("{} not set, using the built-in key", ENV_API_KEY),
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(raw));
            }
            settings.request_timeout = Duration::from_secs(secs);
        }
        Ok(settings)
    }
}

/// The single configured HTTP client every resource call goes through.
///
/// Each request is logged before it is sent. Each failure is logged, turned
/// into a user-facing notice on the injected sink, and returned as an
/// [`ApiError`]. Callers must not raise a second notice for the same failure.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    notifier: Arc<dyn NotificationSink>,
}

impl ApiClient {
    pub fn new(
        settings: &GatewaySettings,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, ConfigError> {
        let base_url = Url::parse(settings.base_url.trim_end_matches('/')).map_err(|err| {
            ConfigError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                reason: err.to_string(),
            }
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                reason: "not a base url".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(&settings.api_key).map_err(|_| ConfigError::InvalidApiKey)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_UTF8));

        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ConfigError::Client(err.to_string()))?;

        Ok(Self {
            http,
            base_url,
            notifier,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn notifier(&self) -> &Arc<dyn NotificationSink> {
        &self.notifier
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let body = self.encode(&Method::POST, path, body)?;
        self.request(Method::POST, path, &QueryParams::new(), Some(body))
            .await
    }

    /// POST without a body, for trigger endpoints such as collectors.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, query, None).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let body = self.encode(&Method::PUT, path, body)?;
        self.request(Method::PUT, path, &QueryParams::new(), Some(body))
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let body = self.encode(&Method::PATCH, path, body)?;
        self.request(Method::PATCH, path, &QueryParams::new(), Some(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, &QueryParams::new(), None)
            .await
    }

    /// GET returning the body as text, for downloads that are not JSON.
    pub async fn get_text(&self, path: &str, query: &QueryParams) -> Result<String, ApiError> {
        let url = self.endpoint(path, query);
        self.send(Method::GET, path, url, None, |bytes| {
            String::from_utf8(bytes)
                .map_err(|err| ApiError::Unexpected(format!("response is not UTF-8: {err}")))
        })
        .await
    }

    /// GET against the server root instead of the API base path.
    pub async fn get_at_root<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url.set_query(None);
        self.send(Method::GET, path, Ok(url), None, |bytes| decode_body(&bytes))
            .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query);
        self.send(method, path, url, body, |bytes| decode_body(&bytes))
            .await
    }

    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        url: Result<Url, ApiError>,
        body: Option<Vec<u8>>,
        decode: impl FnOnce(Vec<u8>) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        pulse_info!("{} {}", method, path);
        let outcome = match url {
            Ok(url) => self.execute(method.clone(), url, body).await.and_then(decode),
            Err(error) => Err(error),
        };
        outcome.map_err(|error| self.report(&method, path, error))
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ApiError> {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.body(body);
        }
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: backend_message(&bytes),
            });
        }
        Ok(bytes.to_vec())
    }

    fn endpoint(&self, path: &str, query: &QueryParams) -> Result<Url, ApiError> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw)
            .map_err(|err| ApiError::Unexpected(format!("invalid request url {raw}: {err}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    fn encode<B: Serialize + ?Sized>(
        &self,
        method: &Method,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, ApiError> {
        serde_json::to_vec(body).map_err(|err| {
            self.report(
                method,
                path,
                ApiError::Unexpected(format!("failed to encode request body: {err}")),
            )
        })
    }

    fn report(&self, method: &Method, path: &str, error: ApiError) -> ApiError {
        pulse_warn!("{} {} failed: {}", method, path, error);
        self.notifier.notify(failure_notice(&error));
        error
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn backend_message(bytes: &[u8]) -> Option<String> {
    let body: ErrorBody = serde_json::from_slice(bytes).ok()?;
    body.message
        .or(body.error)
        .filter(|message| !message.trim().is_empty())
}

/// Empty 2xx bodies decode as JSON `null`, or as `{}` for types that reject null.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_slice(b"null")
            .or_else(|_| serde_json::from_slice(b"{}"))
            .map_err(|err| ApiError::Unexpected(format!("empty response body: {err}")));
    }
    serde_json::from_slice(bytes)
        .map_err(|err| ApiError::Unexpected(format!("invalid response body: {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        return ApiError::Unexpected(err.to_string());
    }
    ApiError::NetworkUnreachable(err.to_string())
}
