use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{
    backend::{Backend, MAP_CONFIG_PATH, RawResponse},
    error::LookupError,
};

/// Serves canned responses per path and records every request.
/// Unknown paths answer `404` with an empty body.
#[derive(Debug, Default)]
pub struct StubBackend {
    responses: HashMap<String, RawResponse>,
    requests: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, status: StatusCode, body: &str) -> Self {
        self.responses.insert(path.to_string(), RawResponse::new(status, body));
        self
    }

    pub fn with_map_config(self, body: &str) -> Self {
        self.with(MAP_CONFIG_PATH, StatusCode::OK, body)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn get(&self, path: &str) -> Result<RawResponse, LookupError> {
        self.requests.lock().unwrap().push(path.to_string());
        Ok(self
            .responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| RawResponse::new(StatusCode::NOT_FOUND, "")))
    }
}

pub fn map_config_body() -> &'static str {
    r#"{
        "layers": {"precipitation": "precipitation_new", "clouds": "clouds_new"},
        "default_layer": "precipitation",
        "tile_url_template": "https://tile.openweathermap.org/map/{layer}/{z}/{x}/{y}.png?appid={apiKey}",
        "apiKey": "KEY"
    }"#
}
