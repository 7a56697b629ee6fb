// API client module: a small blocking client for the platform's method
// endpoint. It builds the query, runs it through a `Transport`, unwraps the
// response envelope and classifies platform errors. It never retries: what to
// do with an error depends on the caller (see `workflow`).

use std::collections::BTreeMap;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use serde_json::value::RawValue;
use tracing::debug;

use crate::error::{ApiError, PlatformError};

/// Method endpoint used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://api.vk.com/method/";

/// Protocol version sent with every call.
pub const API_VERSION: &str = "5.101";

/// Locale flag sent with every call.
pub const API_LANG: &str = "0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Keys the client injects itself.
const RESERVED_KEYS: [&str; 3] = ["access_token", "v", "lang"];

/// Method-specific query parameters.
pub type Params = BTreeMap<String, String>;

/// How the workflow should react to a platform error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Too many requests per second; retry with the same input.
    RateLimited,
    /// Token expired, bound to another IP, invalid or missing.
    Credential,
    Other,
}

/// Code to policy table.
const ERROR_KINDS: &[(i64, ErrorKind)] = &[
    (5, ErrorKind::Credential),
    (6, ErrorKind::RateLimited),
];

impl PlatformError {
    pub fn kind(&self) -> ErrorKind {
        ERROR_KINDS
            .iter()
            .find(|(code, _)| *code == self.code)
            .map(|(_, kind)| *kind)
            .unwrap_or(ErrorKind::Other)
    }
}

/// A fully assembled call: method name plus every query parameter,
/// including the injected ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: String,
    pub params: Params,
}

/// Executes a request and hands back the raw response body.
pub trait Transport {
    fn execute(&self, request: &ApiRequest) -> Result<String, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &ApiRequest) -> Result<String, ApiError> {
        (**self).execute(request)
    }
}

/// HTTPS GET transport backed by a reqwest blocking client.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// `base_url` is the method endpoint; a missing trailing `/` is added so
    /// method names are appended to its path instead of replacing the last
    /// segment.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ApiError::Transport(format!("{base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(HttpTransport { client, base_url })
    }

    pub fn method_url(&self, method: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(method)
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> Result<String, ApiError> {
        let url = self.method_url(&request.method)?;

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Calling {}...", request.method));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.client.get(url).query(&request.params).send();
        spinner.finish_and_clear();

        let res = result?;
        let status = res.status();
        if !status.is_success() {
            let txt = res.text().unwrap_or_default();
            return Err(ApiError::Transport(format!("{status} - {txt}")));
        }
        Ok(res.text()?)
    }
}

/// Client for the platform's method endpoint.
pub struct ApiClient<T> {
    transport: T,
}

/// Outer JSON structure of every platform response.
#[derive(Deserialize)]
struct Envelope {
    error: Option<PlatformError>,
    response: Option<Box<RawValue>>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        ApiClient { transport }
    }

    /// Call `method` with `params` authenticated by `access_token`.
    ///
    /// On success the `response` payload is returned undecoded; decoding is
    /// up to the caller since every method has its own shape.
    pub fn invoke(
        &self,
        method: &str,
        params: &Params,
        access_token: &str,
    ) -> Result<Box<RawValue>, ApiError> {
        if let Some(key) = RESERVED_KEYS.iter().find(|k| params.contains_key(**k)) {
            return Err(ApiError::ReservedParameter(key.to_string()));
        }

        let mut all = params.clone();
        all.insert("access_token".into(), access_token.into());
        all.insert("v".into(), API_VERSION.into());
        all.insert("lang".into(), API_LANG.into());
        let request = ApiRequest {
            method: method.into(),
            params: all,
        };

        debug!(method, ?params, "calling platform API");
        let body = self.transport.execute(&request)?;
        parse_envelope(&body)
    }
}

/// Unwrap the platform envelope: the raw payload, or the typed error.
pub fn parse_envelope(body: &str) -> Result<Box<RawValue>, ApiError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    match (envelope.error, envelope.response) {
        (Some(error), _) => Err(ApiError::Platform(error)),
        (None, Some(response)) => Ok(response),
        (None, None) => Err(ApiError::MalformedEnvelope),
    }
}
