use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt::Debug;

use crate::{
    error::{LookupError, REQUEST_FAILED},
    model::{MapConfig, RemoteConfig, WeatherPayload},
};

pub const CONFIG_PATH: &str = "/config";
pub const MAP_CONFIG_PATH: &str = "/map/config";

/// Prefix for every backend request. Empty means same-origin relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_relative(&self) -> bool {
        self.0.is_empty()
    }

    /// Join `path` (which starts with `/`) onto the base.
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }
}

/// Path and query of a weather lookup for `city`.
pub fn weather_path(city: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(city.trim().as_bytes()).collect();
    format!("/weather?city={encoded}")
}

/// Status and body of one response; the body is read exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Parsed JSON body regardless of status. Parse failures and `null` are
    /// both "no payload".
    pub fn payload(&self) -> Option<Value> {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::Null) | Err(_) => None,
            Ok(value) => Some(value),
        }
    }

    /// Best message for a rejected response: `error`, then `message`, then
    /// the raw body, then a generic fallback.
    pub fn failure_message(&self, payload: Option<&Value>) -> String {
        payload
            .and_then(|p| field_text(p, "error").or_else(|| field_text(p, "message")))
            .or_else(|| {
                let body = self.body.trim();
                (!body.is_empty()).then(|| body.to_string())
            })
            .unwrap_or_else(|| REQUEST_FAILED.to_string())
    }

    fn rejection(&self, payload: Option<&Value>) -> LookupError {
        LookupError::Rejected(self.failure_message(payload))
    }
}

/// Text of `payload[key]` when it holds something other than an empty,
/// false or null value.
fn field_text(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn interpret_weather(raw: &RawResponse) -> Result<WeatherPayload, LookupError> {
    let payload = raw.payload();

    if !raw.status.is_success() {
        return Err(raw.rejection(payload.as_ref()));
    }

    match payload {
        Some(value @ Value::Object(_)) => Ok(serde_json::from_value(value)?),
        _ => Err(LookupError::EmptyResponse),
    }
}

pub fn interpret_remote_config(raw: &RawResponse) -> Result<RemoteConfig, LookupError> {
    if !raw.status.is_success() {
        return Err(raw.rejection(raw.payload().as_ref()));
    }

    Ok(serde_json::from_str(&raw.body)?)
}

pub fn interpret_map_config(raw: &RawResponse) -> Result<MapConfig, LookupError> {
    if !raw.status.is_success() {
        return Err(raw.rejection(raw.payload().as_ref()));
    }

    Ok(serde_json::from_str(&raw.body)?)
}

/// The backend proxy. Implementors only provide `get`; the endpoint methods
/// share the response interpretation.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// GET `path` (path and query, starting with `/`).
    async fn get(&self, path: &str) -> Result<RawResponse, LookupError>;

    async fn weather(&self, city: &str) -> Result<WeatherPayload, LookupError> {
        let raw = self.get(&weather_path(city)).await?;
        interpret_weather(&raw)
    }

    async fn remote_config(&self) -> Result<RemoteConfig, LookupError> {
        let raw = self.get(CONFIG_PATH).await?;
        interpret_remote_config(&raw)
    }

    async fn map_config(&self) -> Result<MapConfig, LookupError> {
        let raw = self.get(MAP_CONFIG_PATH).await?;
        interpret_map_config(&raw)
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: BaseUrl,
    http: Client,
}

impl HttpBackend {
    pub fn new(base: BaseUrl) -> Self {
        Self { base, http: Client::new() }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get(&self, path: &str) -> Result<RawResponse, LookupError> {
        if self.base.is_relative() {
            return Err(LookupError::NoBaseUrl);
        }

        let url = self.base.join(path);
        debug!("GET {url}");

        let res = self.http.get(&url).send().await.map_err(transport)?;
        let status = res.status();
        let body = res.text().await.map_err(transport)?;

        debug!("GET {url} -> {status} ({} bytes)", body.len());
        Ok(RawResponse { status, body })
    }
}

fn transport(err: reqwest::Error) -> LookupError {
    LookupError::Transport(err.without_url())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_strips_trailing_slash_and_whitespace() {
        assert_eq!(BaseUrl::new(" https://api.example.com/ ").as_str(), "https://api.example.com");
        assert_eq!(BaseUrl::new("https://h/prefix//").join("/config"), "https://h/prefix/config");
        assert!(BaseUrl::new("").is_relative());
        assert_eq!(BaseUrl::new("/").join(CONFIG_PATH), "/config");
    }

    #[test]
    fn weather_path_encodes_city() {
        assert_eq!(weather_path("  Zielona Góra "), "/weather?city=Zielona+G%C3%B3ra");
        assert_eq!(weather_path("A&B"), "/weather?city=A%26B");
    }

    #[test]
    fn success_payload_is_returned() {
        let raw = RawResponse::new(StatusCode::OK, r#"{"city":"Oslo","temperature":-3.25}"#);
        let payload = interpret_weather(&raw).unwrap();
        assert_eq!(payload.city.as_deref(), Some("Oslo"));
        assert_eq!(payload.temperature, Some(-3.25));
    }

    #[test]
    fn success_without_payload_is_empty_response() {
        for body in ["", "null", "not json", "[1,2]", "\"text\""] {
            let raw = RawResponse::new(StatusCode::OK, body);
            let err = interpret_weather(&raw).unwrap_err();
            assert!(matches!(err, LookupError::EmptyResponse), "body {body:?}");
            assert_eq!(err.to_string(), "Pusty response od serwera");
        }
    }

    #[test]
    fn failure_prefers_error_then_message() {
        let raw = RawResponse::new(
            StatusCode::NOT_FOUND,
            r#"{"error":"city not found","message":"ignored"}"#,
        );
        assert_eq!(interpret_weather(&raw).unwrap_err().to_string(), "city not found");

        let raw = RawResponse::new(StatusCode::BAD_GATEWAY, r#"{"error":"","message":"upstream"}"#);
        assert_eq!(interpret_weather(&raw).unwrap_err().to_string(), "upstream");
    }

    #[test]
    fn failure_falls_back_to_body_then_generic() {
        let raw = RawResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n");
        assert_eq!(interpret_weather(&raw).unwrap_err().to_string(), "Internal Server Error");

        let raw = RawResponse::new(StatusCode::SERVICE_UNAVAILABLE, "   ");
        assert_eq!(interpret_weather(&raw).unwrap_err().to_string(), REQUEST_FAILED);
    }

    #[test]
    fn failure_with_json_but_no_known_field_uses_body() {
        let raw = RawResponse::new(StatusCode::BAD_REQUEST, r#"{"detail":"bad"}"#);
        assert_eq!(interpret_weather(&raw).unwrap_err().to_string(), r#"{"detail":"bad"}"#);
    }

    #[test]
    fn map_config_rejection_and_decode_errors() {
        let raw = RawResponse::new(StatusCode::FORBIDDEN, r#"{"error":"no key"}"#);
        assert!(matches!(interpret_map_config(&raw), Err(LookupError::Rejected(m)) if m == "no key"));

        let raw = RawResponse::new(StatusCode::OK, r#"{"layers":{}}"#);
        assert!(matches!(interpret_map_config(&raw), Err(LookupError::Decode(_))));
    }

    #[tokio::test]
    async fn http_backend_refuses_relative_base() {
        let backend = HttpBackend::new(BaseUrl::new(""));
        let err = backend.get(CONFIG_PATH).await.unwrap_err();
        assert!(matches!(err, LookupError::NoBaseUrl));
    }

    #[tokio::test]
    async fn transport_errors_do_not_carry_the_url() {
        // nothing listens on the discard port
        let backend = HttpBackend::new(BaseUrl::new("http://127.0.0.1:9/openweather-proxy"));
        let err = backend.weather("city not found").await.unwrap_err();

        assert!(matches!(err, LookupError::Transport(_)));
        let text = err.to_string().to_lowercase();
        assert!(!text.contains("openweather"), "{text}");
        assert!(!text.contains("city"), "{text}");
    }
}
