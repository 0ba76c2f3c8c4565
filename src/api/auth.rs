use super::client::{HttpTestClient, RequestOptions};
use super::constants::{self, headers};
use super::models::{Credentials, Token, TokenResponse};
use crate::error::{HarnessError, Result};
use chrono::{TimeDelta, Utc};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Exchanges client credentials for a bearer token, once per run
pub struct TokenProvider {
    client: HttpTestClient,
    token_url: String,
    credentials: Credentials,
    scope: Option<String>,
    cached: OnceCell<Arc<Token>>,
}

impl TokenProvider {
    pub fn new(client: HttpTestClient, token_url: String, credentials: Credentials) -> Self {
        Self {
            client,
            token_url,
            credentials,
            scope: None,
            cached: OnceCell::new(),
        }
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    /// Token for this run, fetched on first call and shared afterwards
    pub async fn token(&self) -> Result<Arc<Token>> {
        self.cached
            .get_or_try_init(|| async {
                let token = self
                    .acquire_token(&self.credentials.client_id, &self.credentials.client_secret)
                    .await?;
                Ok::<_, HarnessError>(Arc::new(token))
            })
            .await
            .cloned()
    }

    pub fn cached_token(&self) -> Option<Arc<Token>> {
        self.cached.get().cloned()
    }

    /// Perform the client-credentials exchange against the identity server
    pub async fn acquire_token(&self, client_id: &str, client_secret: &str) -> Result<Token> {
        info!("Requesting client-credentials token for client {}", client_id);

        let mut form = vec![
            ("grant_type", constants::GRANT_TYPE_CLIENT_CREDENTIALS),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];
        if let Some(scope) = &self.scope {
            form.push(("scope", scope.as_str()));
        }

        let response = self
            .client
            .post(
                &self.token_url,
                RequestOptions::new().accept(headers::ACCEPT_ANY).form(&form),
            )
            .await?;

        debug!("Token request status: {}", response.status());

        if !response.is_success() {
            return Err(HarnessError::Auth(format!(
                "Failed to fetch token (status {}): {}",
                response.status(),
                response.text()
            )));
        }

        let token_data: Option<TokenResponse> = serde_json::from_str(response.text()).ok();
        let Some(TokenResponse {
            access_token: Some(access_token),
            expires_in,
        }) = token_data
        else {
            return Err(HarnessError::Auth(format!(
                "No access token in response: {}",
                response.text()
            )));
        };

        if access_token.is_empty() {
            return Err(HarnessError::Auth("Identity server returned an empty access token".into()));
        }

        let expires_at = expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(TimeDelta::try_seconds)
            .map(|lifetime| Utc::now() + lifetime);

        info!("Successfully acquired token for client {}", client_id);
        Ok(Token {
            access_token,
            expires_at,
        })
    }
}
