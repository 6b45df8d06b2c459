//! Jupiter API response shapes and their validation into domain types

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::warn;

use crate::domain::route::{Hop, Quote, RoutePlan};
use crate::domain::token::TokenMeta;
use crate::shared::errors::QuoteError;

/// Amounts arrive as decimal strings; plain JSON numbers are tolerated
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Int(u64),
    Float(f64),
    Text(String),
}

impl WireNumber {
    fn as_u64(&self, field: &str) -> Result<u64, QuoteError> {
        match self {
            WireNumber::Int(value) => Ok(*value),
            WireNumber::Text(text) => text.trim().parse::<u64>().map_err(|e| {
                QuoteError::InvalidQuote(format!("{} is not an unsigned amount ('{}'): {}", field, text, e))
            }),
            WireNumber::Float(value) => Err(QuoteError::InvalidQuote(format!(
                "{} is not an unsigned amount ({})",
                field, value
            ))),
        }
    }

    fn as_f64(&self, field: &str) -> Result<f64, QuoteError> {
        let value = match self {
            WireNumber::Int(value) => *value as f64,
            WireNumber::Float(value) => *value,
            WireNumber::Text(text) => text.trim().parse::<f64>().map_err(|e| {
                QuoteError::InvalidQuote(format!("{} is not a number ('{}'): {}", field, text, e))
            })?,
        };
        if !value.is_finite() {
            return Err(QuoteError::InvalidQuote(format!("{} is not finite", field)));
        }
        Ok(value)
    }
}

/// Fee figure, either a bare number or an `{amount, mint, pct}` object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireFee {
    Plain(WireNumber),
    Detailed { amount: WireNumber },
}

impl WireFee {
    fn as_f64(&self, field: &str) -> Result<f64, QuoteError> {
        match self {
            WireFee::Plain(value) | WireFee::Detailed { amount: value } => value.as_f64(field),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub amm_key: String,
    pub label: Option<String>,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: WireNumber,
    pub out_amount: WireNumber,
    pub fee_amount: WireNumber,
    pub fee_mint: String,
    pub lp_fee: Option<WireFee>,
    pub platform_fee: Option<WireFee>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanStep {
    pub swap_info: SwapInfo,
    pub percent: Option<u8>,
    pub price_impact_pct: Option<WireNumber>,
}

/// Entry of the legacy `routes` array
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRoute {
    pub out_amount: WireNumber,
    pub price_impact_pct: Option<WireNumber>,
    pub other_amount_threshold: Option<WireNumber>,
    pub score: Option<WireNumber>,
    pub market_impact: Option<WireNumber>,
    #[serde(default)]
    pub route_plan: Vec<RoutePlanStep>,
}

/// Response of the `/quote` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub input_mint: String,
    pub in_amount: WireNumber,
    pub output_mint: String,
    pub out_amount: Option<WireNumber>,
    pub other_amount_threshold: Option<WireNumber>,
    pub slippage_bps: Option<u16>,
    pub price_impact_pct: Option<WireNumber>,
    pub route_plan: Option<Vec<RoutePlanStep>>,
    pub routes: Option<Vec<WireRoute>>,
}

fn parse_mint(field: &str, value: &str) -> Result<Pubkey, QuoteError> {
    Pubkey::from_str(value)
        .map_err(|e| QuoteError::InvalidQuote(format!("{} '{}' is not a valid mint: {}", field, value, e)))
}

fn optional_u64(value: Option<&WireNumber>, field: &str) -> Result<Option<u64>, QuoteError> {
    value.map(|v| v.as_u64(field)).transpose()
}

fn optional_f64(value: Option<&WireNumber>, field: &str) -> Result<Option<f64>, QuoteError> {
    value.map(|v| v.as_f64(field)).transpose()
}

fn optional_fee(value: Option<&WireFee>, field: &str) -> Result<Option<f64>, QuoteError> {
    value.map(|v| v.as_f64(field)).transpose()
}

impl RoutePlanStep {
    fn into_hop(self) -> Result<Hop, QuoteError> {
        let info = self.swap_info;
        Ok(Hop {
            input_mint: parse_mint("inputMint", &info.input_mint)?,
            output_mint: parse_mint("outputMint", &info.output_mint)?,
            dex_label: info.label.unwrap_or_else(|| "Unknown".to_string()),
            amm_key: info.amm_key,
            in_amount: info.in_amount.as_u64("inAmount")?,
            out_amount: info.out_amount.as_u64("outAmount")?,
            fee_amount: info.fee_amount.as_u64("feeAmount")?,
            fee_mint: parse_mint("feeMint", &info.fee_mint)?,
            percent: self.percent.unwrap_or(100),
            price_impact_pct: optional_f64(self.price_impact_pct.as_ref(), "priceImpactPct")?,
            lp_fee: optional_fee(info.lp_fee.as_ref(), "lpFee")?,
            platform_fee: optional_fee(info.platform_fee.as_ref(), "platformFee")?,
        })
    }
}

fn into_hops(steps: Vec<RoutePlanStep>) -> Result<Vec<Hop>, QuoteError> {
    steps.into_iter().map(RoutePlanStep::into_hop).collect()
}

impl QuoteResponse {
    pub fn from_json(body: &str) -> Result<Self, QuoteError> {
        serde_json::from_str(body)
            .map_err(|e| QuoteError::InvalidQuote(format!("malformed quote response: {}", e)))
    }

    /// Validate into a [`Quote`]. A `routes` array, when present, yields one
    /// route plan per entry; otherwise the top-level `routePlan` is the single
    /// route plan. An empty top-level `routePlan` yields no route plans.
    pub fn into_quote(self) -> Result<Quote, QuoteError> {
        let input_mint = parse_mint("inputMint", &self.input_mint)?;
        let output_mint = parse_mint("outputMint", &self.output_mint)?;
        let in_amount = self.in_amount.as_u64("inAmount")?;

        let route_plans = match (self.routes, self.route_plan) {
            (Some(routes), _) => routes
                .into_iter()
                .map(|route| -> Result<RoutePlan, QuoteError> {
                    Ok(RoutePlan {
                        out_amount: route.out_amount.as_u64("outAmount")?,
                        price_impact_pct: optional_f64(route.price_impact_pct.as_ref(), "priceImpactPct")?
                            .unwrap_or(0.0),
                        other_amount_threshold: optional_u64(
                            route.other_amount_threshold.as_ref(),
                            "otherAmountThreshold",
                        )?,
                        score: optional_f64(route.score.as_ref(), "score")?,
                        market_impact_pct: optional_f64(route.market_impact.as_ref(), "marketImpact")?,
                        hops: into_hops(route.route_plan)?,
                    })
                })
                .collect::<Result<Vec<_>, QuoteError>>()?,
            (None, Some(steps)) if steps.is_empty() => Vec::new(),
            (None, Some(steps)) => {
                let out_amount = self
                    .out_amount
                    .as_ref()
                    .ok_or_else(|| QuoteError::InvalidQuote("missing outAmount".to_string()))?
                    .as_u64("outAmount")?;
                vec![RoutePlan {
                    hops: into_hops(steps)?,
                    price_impact_pct: optional_f64(self.price_impact_pct.as_ref(), "priceImpactPct")?
                        .unwrap_or(0.0),
                    out_amount,
                    other_amount_threshold: optional_u64(
                        self.other_amount_threshold.as_ref(),
                        "otherAmountThreshold",
                    )?,
                    score: None,
                    market_impact_pct: None,
                }]
            }
            (None, None) => {
                return Err(QuoteError::InvalidQuote(
                    "response has neither routePlan nor routes".to_string(),
                ))
            }
        };

        Ok(Quote {
            input_mint,
            output_mint,
            in_amount,
            slippage_bps: self.slippage_bps.unwrap_or_default(),
            route_plans,
        })
    }
}

/// Entry of the token list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenListEntry {
    pub address: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub decimals: u8,
    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
}

/// Convert token list entries, skipping unparsable addresses
pub fn into_token_metas(entries: Vec<TokenListEntry>) -> Vec<TokenMeta> {
    entries
        .into_iter()
        .filter_map(|entry| match Pubkey::from_str(&entry.address) {
            Ok(mint) => Some(TokenMeta {
                mint,
                symbol: entry.symbol.map(|symbol| symbol.trim().to_string()).unwrap_or_default(),
                name: entry.name,
                decimals: entry.decimals,
                logo_uri: entry.logo_uri,
            }),
            Err(e) => {
                warn!("Skipping token list entry with invalid address {}: {}", entry.address, e);
                None
            }
        })
        .collect()
}
