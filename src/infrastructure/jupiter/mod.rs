//! Jupiter aggregator REST clients

pub mod quote_client;
pub mod token_list_client;
pub mod wire;

pub use quote_client::{JupiterQuoteClient, QuoteRequest};
pub use token_list_client::JupiterTokenListClient;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::route::Quote;
use crate::domain::token::TokenMeta;
use crate::shared::errors::{AppError, QuoteError, TokenError};

/// Source of aggregator quotes
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// One best-effort request; failures are returned, never retried
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError>;
}

/// Source of the full token list
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_tokens(&self) -> Result<Vec<TokenMeta>, TokenError>;
}

/// Shared HTTP client with the configured request timeout
pub fn build_http_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}
