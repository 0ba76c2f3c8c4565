//! Structured request logging with correlation tracking
//!
//! Every call made by the test client gets a correlation ID so the request,
//! its response and any transport error can be lined up in the log.

use serde_json::json;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use log::{debug, info, warn, error};

/// Logger for HTTP calls issued by the test client
#[derive(Debug, Clone)]
pub struct RequestLogger {
    enabled: bool,
}

/// Context for a single HTTP call
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
    pub method: String,
    pub url: String,
    pub start_time: Instant,
}

impl RequestLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Start tracking a new call
    pub fn start(&self, method: &str, url: &str) -> RequestContext {
        RequestContext {
            correlation_id: uuid::Uuid::new_v4().to_string(),
            method: method.to_string(),
            url: url.to_string(),
            start_time: Instant::now(),
        }
    }

    /// Log outgoing request details
    pub fn log_request(&self, context: &RequestContext, headers: &[(String, String)]) {
        if !self.enabled {
            return;
        }

        let log_data = json!({
            "event": "http_request",
            "correlation_id": context.correlation_id,
            "method": context.method,
            "url": context.url,
            "headers": sanitize_headers(headers),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        debug!("HTTP Request: {}", log_data);
    }

    /// Log response status and timing
    pub fn log_response(&self, context: &RequestContext, status_code: u16) {
        if !self.enabled {
            return;
        }

        let log_data = json!({
            "event": "http_response",
            "correlation_id": context.correlation_id,
            "method": context.method,
            "url": context.url,
            "status_code": status_code,
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        // 4xx is an expected outcome for negative cases
        if status_code >= 500 {
            warn!("HTTP Response (Server Error): {}", log_data);
        } else {
            info!("HTTP Response: {}", log_data);
        }
    }

    pub fn log_transport_error(&self, context: &RequestContext, error: &reqwest::Error) {
        if !self.enabled {
            return;
        }

        let log_data = json!({
            "event": "transport_error",
            "correlation_id": context.correlation_id,
            "method": context.method,
            "url": context.url,
            "timeout": error.is_timeout(),
            "connect": error.is_connect(),
            "error": error.to_string(),
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        error!("HTTP Transport Error: {}", log_data);
    }
}

impl RequestContext {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Redact credentials and tokens from headers before logging
pub fn sanitize_headers(headers: &[(String, String)]) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(key, value)| {
            let key_lower = key.to_lowercase();
            if key_lower.contains("authorization") || key_lower.contains("token") || key_lower.contains("secret") {
                (key.clone(), "[REDACTED]".to_string())
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}
