use async_trait::async_trait;
use reqwest::Client;
use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};

use super::wire::QuoteResponse;
use super::QuoteSource;
use crate::domain::route::Quote;
use crate::shared::errors::QuoteError;

/// Parameters of one quote request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    /// Amount in the input token's smallest unit
    pub amount: u64,
    pub slippage_bps: u16,
}

impl QuoteRequest {
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("inputMint", self.input_mint.to_string()),
            ("outputMint", self.output_mint.to_string()),
            ("amount", self.amount.to_string()),
            ("slippageBps", self.slippage_bps.to_string()),
            ("onlyDirectRoutes", "false".to_string()),
            ("asLegacyTransaction", "false".to_string()),
        ]
    }
}

/// Jupiter `/quote` API client
pub struct JupiterQuoteClient {
    http_client: Client,
    quote_url: String,
}

impl JupiterQuoteClient {
    pub fn new(http_client: Client, quote_url: impl Into<String>) -> Self {
        Self {
            http_client,
            quote_url: quote_url.into(),
        }
    }
}

#[async_trait]
impl QuoteSource for JupiterQuoteClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        info!(
            "Requesting quote {} -> {} for {} (slippage {} bps)",
            request.input_mint, request.output_mint, request.amount, request.slippage_bps
        );

        let response = self
            .http_client
            .get(&self.quote_url)
            .query(&request.query())
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Quote API returned status {}: {}", status, body);
            return Err(QuoteError::Network(format!("quote API returned {}: {}", status, body)));
        }

        let quote = QuoteResponse::from_json(&body)?.into_quote()?;
        info!(
            "Quote received: {} route(s), {} hop(s)",
            quote.route_count(),
            quote.total_hops()
        );
        Ok(quote)
    }
}
