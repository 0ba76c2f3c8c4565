use anyhow::Result;
use colored::Colorize;
use log::{error, info};
use work_items_e2e::api::{HttpTestClient, TokenProvider};
use work_items_e2e::config::RunConfig;

/// Returns whether a token was acquired
pub async fn token_command(config: &RunConfig) -> Result<bool> {
    info!("Executing token command");

    println!("Identity server: {}", config.token_url());
    println!("Client ID: {}", config.credentials.client_id);

    let client = HttpTestClient::new(&config.settings)?;
    let provider = TokenProvider::new(client, config.token_url(), config.credentials.clone())
        .with_scope(config.scope.clone());

    match provider.token().await {
        Ok(token) => {
            info!("Token acquired");
            println!("{} Token acquired", "✓".green());
            match token.expires_at {
                Some(expires_at) => println!("  Expires at: {}", expires_at.to_rfc3339()),
                None => println!("  Expiry not reported"),
            }
            Ok(true)
        }
        Err(e) => {
            error!("Token request failed: {}", e);
            println!("{} {}", "✗".red(), e);
            Ok(false)
        }
    }
}
