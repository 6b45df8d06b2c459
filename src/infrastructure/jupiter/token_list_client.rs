use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use super::wire::{into_token_metas, TokenListEntry};
use super::TokenSource;
use crate::domain::token::TokenMeta;
use crate::shared::errors::TokenError;

/// Jupiter token list client
pub struct JupiterTokenListClient {
    http_client: Client,
    tokens_url: String,
}

impl JupiterTokenListClient {
    pub fn new(http_client: Client, tokens_url: impl Into<String>) -> Self {
        Self {
            http_client,
            tokens_url: tokens_url.into(),
        }
    }
}

#[async_trait]
impl TokenSource for JupiterTokenListClient {
    async fn fetch_tokens(&self) -> Result<Vec<TokenMeta>, TokenError> {
        info!("Fetching token list from {}", self.tokens_url);

        let response = self
            .http_client
            .get(&self.tokens_url)
            .send()
            .await
            .map_err(|e| TokenError::Network(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Token list API returned status {}", response.status());
            return Err(TokenError::Network(format!(
                "token list API returned {}",
                response.status()
            )));
        }

        let entries: Vec<TokenListEntry> = response
            .json()
            .await
            .map_err(|e| TokenError::InvalidTokenList(e.to_string()))?;

        let tokens = into_token_metas(entries);
        info!("Token list loaded: {} tokens", tokens.len());
        Ok(tokens)
    }
}
