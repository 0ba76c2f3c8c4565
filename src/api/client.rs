use super::constants::{self, headers};
use super::logging::RequestLogger;
use super::models::Token;
use crate::config::Settings;
use crate::error::{HarnessError, Result};
use log::warn;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Request payload variants the harness sends
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn accept(self, value: &str) -> Self {
        self.header(headers::ACCEPT, value)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.body = Some(RequestBody::Form(fields));
        self
    }
}

/// Status and body of a completed HTTP exchange, whatever the status code
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    url: String,
    body: String,
}

impl ApiResponse {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json(&self) -> Result<Value> {
        self.json_as()
    }

    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            HarnessError::Json(format!(
                "{} (status {}) returned an unexpected body: {}: {}",
                self.url, self.status, e, self.body
            ))
        })
    }
}

/// HTTP client for exercising the service under test
///
/// Error statuses come back as ordinary `ApiResponse`s so negative cases can
/// assert on them. Only transport failures become `HarnessError::Network`.
#[derive(Clone)]
pub struct HttpTestClient {
    http_client: reqwest::Client,
    token: Option<Arc<Token>>,
    logger: RequestLogger,
}

impl HttpTestClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(constants::USER_AGENT)
            .build()
            .map_err(|e| HarnessError::Setup(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_custom_client(
            http_client,
            RequestLogger::new(settings.request_logging),
        ))
    }

    /// Create a new client with custom HTTP client configuration
    pub fn with_custom_client(http_client: reqwest::Client, logger: RequestLogger) -> Self {
        Self {
            http_client,
            token: None,
            logger,
        }
    }

    /// Attach a bearer token to every subsequent request
    pub fn with_token(mut self, token: Arc<Token>) -> Self {
        self.token = Some(token);
        self
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_deref()
    }

    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<ApiResponse> {
        self.send(Method::GET, url, options).await
    }

    pub async fn post(&self, url: &str, options: RequestOptions) -> Result<ApiResponse> {
        self.send(Method::POST, url, options).await
    }

    pub async fn put(&self, url: &str, options: RequestOptions) -> Result<ApiResponse> {
        self.send(Method::PUT, url, options).await
    }

    async fn send(&self, method: Method, url: &str, options: RequestOptions) -> Result<ApiResponse> {
        let context = self.logger.start(method.as_str(), url);
        let mut logged_headers = options.headers.clone();

        let mut request = self.http_client.request(method, url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(token) = &self.token {
            if token.is_expired() {
                warn!("Bearer token expired before request to {}", url);
            }
            request = request.bearer_auth(&token.access_token);
            logged_headers.push((headers::AUTHORIZATION.to_string(), String::new()));
        }

        request = match options.body {
            Some(RequestBody::Json(body)) => {
                logged_headers.push((headers::CONTENT_TYPE.to_string(), headers::CONTENT_TYPE_JSON.to_string()));
                request.json(&body)
            }
            Some(RequestBody::Form(fields)) => request.form(&fields),
            None => request,
        };

        self.logger.log_request(&context, &logged_headers);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.logger.log_transport_error(&context, &e);
                return Err(HarnessError::network(url, e));
            }
        };

        let status = response.status().as_u16();
        self.logger.log_response(&context, status);

        let body = response.text().await.map_err(|e| {
            self.logger.log_transport_error(&context, &e);
            HarnessError::network(url, e)
        })?;

        Ok(ApiResponse::new(status, url, body))
    }
}
