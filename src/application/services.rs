//! Application services and use cases

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::dex::DexUsageAggregator;
use crate::domain::route::{
    dex_fee_stats, dex_price_impact, hop_records, summarize_routes, Quote, RouteGraphBuilder,
};
use crate::domain::token::{TokenLookup, TokenMeta, TokenSnapshot};
use crate::infrastructure::{QuoteRequest, QuoteSource, TokenMetadataCache};
use crate::report::AnalysisReport;
use crate::shared::errors::{AppError, RouteGraphError};
use crate::shared::types::RouteSelection;
use crate::shared::utils::generate_id;

/// One user-triggered "get quote and analyze" action
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Mint address or symbol
    pub input: String,
    /// Mint address or symbol
    pub output: String,
    pub amount: u64,
    pub slippage_bps: u16,
    pub routes: Option<RouteSelection>,
}

/// Wires the quote source, the token cache and the analysis passes
pub struct RouteAnalysisService {
    quotes: Arc<dyn QuoteSource>,
    tokens: Arc<TokenMetadataCache>,
}

impl RouteAnalysisService {
    pub fn new(quotes: Arc<dyn QuoteSource>, tokens: Arc<TokenMetadataCache>) -> Self {
        Self { quotes, tokens }
    }

    /// Check both tokens against the token list before requesting a quote
    pub async fn validate_pair(&self, input: &str, output: &str) -> Result<(TokenMeta, TokenMeta), AppError> {
        let snapshot = self.tokens.ensure_fresh().await?;
        let (input, output) = snapshot.validate_pair(input, output)?;
        info!("Input: {} ({})", input.symbol, input.mint);
        info!("Output: {} ({})", output.symbol, output.mint);
        Ok((input.clone(), output.clone()))
    }

    /// Validate, fetch one quote, analyze it
    pub async fn quote_and_analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AppError> {
        let (input, output) = self.validate_pair(&request.input, &request.output).await?;

        let quote = self
            .quotes
            .get_quote(&QuoteRequest {
                input_mint: input.mint,
                output_mint: output.mint,
                amount: request.amount,
                slippage_bps: request.slippage_bps,
            })
            .await?;

        let snapshot = self.tokens.snapshot();
        Ok(Self::analyze(&quote, request.routes.as_ref(), &snapshot)?)
    }

    /// Analyze a quote that is already in hand. Token metadata is best
    /// effort: a failed token list fetch leaves mints unlabeled and fee
    /// units unknown.
    pub async fn analyze_quote(
        &self,
        quote: &Quote,
        selection: Option<&RouteSelection>,
    ) -> Result<AnalysisReport, AppError> {
        let snapshot = match self.tokens.ensure_fresh().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Token list unavailable, continuing without metadata: {}", e);
                self.tokens.snapshot()
            }
        };
        Ok(Self::analyze(quote, selection, &snapshot)?)
    }

    /// Pure analysis pass: graph over the selected routes, usage and
    /// metrics over all routes
    pub fn analyze(
        quote: &Quote,
        selection: Option<&RouteSelection>,
        tokens: &TokenSnapshot,
    ) -> Result<AnalysisReport, RouteGraphError> {
        let graph = RouteGraphBuilder::new(tokens).build(quote, selection)?;
        let dex_usage = DexUsageAggregator::new(tokens).aggregate(quote);
        let most_used_dex = dex_usage.most_used().map(|(dex, _)| dex.to_string());

        Ok(AnalysisReport {
            id: generate_id(),
            input_mint: quote.input_mint,
            output_mint: quote.output_mint,
            input_symbol: tokens.display_label(&quote.input_mint),
            output_symbol: tokens.display_label(&quote.output_mint),
            amount: quote.in_amount,
            slippage_bps: quote.slippage_bps,
            graph,
            routes: summarize_routes(quote),
            hops: hop_records(quote, tokens),
            dex_price_impact: dex_price_impact(quote),
            dex_fees: dex_fee_stats(quote),
            most_used_dex,
            dex_usage,
            generated_at: Utc::now(),
        })
    }
}
