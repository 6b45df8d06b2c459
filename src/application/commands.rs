//! CLI commands and handlers
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::application::services::{AnalysisRequest, RouteAnalysisService};
use crate::infrastructure::jupiter::wire::QuoteResponse;
use crate::infrastructure::jupiter::{build_http_client, JupiterQuoteClient, JupiterTokenListClient};
use crate::infrastructure::TokenMetadataCache;
use crate::report::AnalysisReport;
use crate::shared::config::AppConfig;
use crate::shared::errors::AppError;
use crate::shared::types::{RouteSelection, SOL_MINT, USDC_MINT};
use crate::shared::utils::parse_route_selection;

#[derive(Parser)]
#[command(name = "jupiter-routeviz")]
#[command(version, about = "Visualize Jupiter aggregator routes and DEX usage")]
pub struct Cli {
    /// Path to config file (defaults to ./Config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a quote and analyze its routes
    Quote {
        /// Input token (mint address or symbol)
        #[arg(short, long, default_value = USDC_MINT)]
        input: String,

        /// Output token (mint address or symbol)
        #[arg(short, long, default_value = SOL_MINT)]
        output: String,

        /// Amount in the input token's smallest unit
        #[arg(short, long)]
        amount: Option<u64>,

        /// Slippage in basis points (1 bps = 0.01%)
        #[arg(short, long)]
        slippage_bps: Option<u16>,

        /// Route indices to draw, comma separated (default: best route)
        #[arg(short, long, value_parser = parse_route_selection)]
        routes: Option<RouteSelection>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyze a saved quote response
    Analyze {
        /// Path to a quote response JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Route indices to draw, comma separated (default: best route)
        #[arg(short, long, value_parser = parse_route_selection)]
        routes: Option<RouteSelection>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tokens from the token list
    Tokens {
        /// Filter by symbol or name
        #[arg(short, long)]
        search: Option<String>,

        /// Limit number of tokens to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

/// Runs CLI commands against the configured Jupiter endpoints
pub struct CommandExecutor {
    config: AppConfig,
    tokens: Arc<TokenMetadataCache>,
    service: RouteAnalysisService,
}

impl CommandExecutor {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let http_client = build_http_client(config.http_timeout())?;
        let tokens = Arc::new(TokenMetadataCache::new(
            Arc::new(JupiterTokenListClient::new(
                http_client.clone(),
                config.jupiter.tokens_url.clone(),
            )),
            config.token_ttl(),
        ));
        let quotes = Arc::new(JupiterQuoteClient::new(
            http_client,
            config.jupiter.quote_url.clone(),
        ));
        let service = RouteAnalysisService::new(quotes, tokens.clone());

        Ok(Self {
            config,
            tokens,
            service,
        })
    }

    pub async fn execute(&self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Quote {
                input,
                output,
                amount,
                slippage_bps,
                routes,
                json,
            } => {
                let request = AnalysisRequest {
                    input,
                    output,
                    amount: amount.unwrap_or(self.config.defaults.amount),
                    slippage_bps: slippage_bps.unwrap_or(self.config.defaults.slippage_bps),
                    routes,
                };
                let report = self.service.quote_and_analyze(&request).await?;
                Self::print_report(&report, json)
            }
            Commands::Analyze { file, routes, json } => {
                info!("Analyzing saved quote {}", file.display());
                let body = fs::read_to_string(&file)?;
                let quote = QuoteResponse::from_json(&body)?.into_quote()?;
                let report = self.service.analyze_quote(&quote, routes.as_ref()).await?;
                Self::print_report(&report, json)
            }
            Commands::Tokens { search, limit } => {
                let snapshot = self.tokens.ensure_fresh().await?;
                let matches: Vec<_> = match &search {
                    Some(text) => snapshot.search(text).take(limit).collect(),
                    None => snapshot.iter().take(limit).collect(),
                };
                if let Some(at) = snapshot.fetched_at() {
                    info!("Token list fetched at {}", at.to_rfc3339());
                }
                println!("{} tokens loaded, showing {}", snapshot.len(), matches.len());
                for token in matches {
                    println!("{:<12} {:<44} {:>2} decimals", token.symbol, token.mint, token.decimals);
                }
                Ok(())
            }
        }
    }

    fn print_report(report: &AnalysisReport, json: bool) -> Result<(), AppError> {
        if json {
            let text = report
                .to_json()
                .map_err(|e| AppError::Unknown(format!("Failed to serialize report: {}", e)))?;
            println!("{}", text);
        } else {
            print!("{}", report.summary());
        }
        Ok(())
    }
}
