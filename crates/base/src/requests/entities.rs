use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HttpRequestMethod {
    Get,
    Post,
}

impl Default for HttpRequestMethod {
    fn default() -> Self {
        Self::Get
    }
}

pub type Headers = HashMap<String, String>;
pub type Queries = HashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct HttpRequestData {
    pub method: HttpRequestMethod,
    pub url: String,
    pub headers: Option<Headers>,
    pub queries: Option<Queries>,
    pub body: Option<Value>,
}

impl HttpRequestData {
    pub fn new(method: HttpRequestMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .get_or_insert_with(Default::default)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_bearer_token(self, token: &str) -> Self {
        self.with_header("Authorization", &format!("Bearer {}", token))
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request to {url} failed with a code {code}: {body}")]
    Status { url: String, code: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
}

pub type NumberOfRetries = u32;
pub type SecondsToSleep = u32;

#[derive(Default)]
pub struct HttpRequestWithRetriesParams<'a> {
    pub req_entity_name: &'a str,
    pub target_logger: &'a str,
    pub number_of_retries: NumberOfRetries,
    pub seconds_to_sleep: SecondsToSleep,
}
