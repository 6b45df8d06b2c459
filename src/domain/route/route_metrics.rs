//! Route comparison rows, per-hop records and per-DEX impact and fee statistics

use serde::Serialize;
use std::collections::BTreeMap;

use super::quote::Quote;
use crate::domain::token::TokenLookup;

/// One row of the route comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub route_index: usize,
    pub out_amount: u64,
    pub price_impact_pct: f64,
    pub other_amount_threshold: Option<u64>,
    pub hop_count: usize,
    pub dex_labels: Vec<String>,
    /// Sum of hop-level impacts that the upstream data provided
    pub provided_hop_impact: Option<f64>,
    pub score: Option<f64>,
    pub market_impact_pct: Option<f64>,
}

/// One hop with display labels resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopRecord {
    pub route_index: usize,
    pub hop_index: usize,
    pub dex_label: String,
    pub amm_key: String,
    pub input_symbol: String,
    pub output_symbol: String,
    pub percent: u8,
    pub price_impact_pct: Option<f64>,
    pub lp_fee: Option<f64>,
    pub platform_fee: Option<f64>,
    /// Score of the owning route
    pub route_score: Option<f64>,
}

/// Price impact distribution for one DEX, over hops that carry a figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DexImpactStat {
    pub dex_label: String,
    pub samples: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Mean LP and platform fee for one DEX. Each mean covers only the hops
/// that carried that fee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DexFeeStat {
    pub dex_label: String,
    pub lp_fee_samples: usize,
    pub mean_lp_fee: Option<f64>,
    pub platform_fee_samples: usize,
    pub mean_platform_fee: Option<f64>,
}

pub fn summarize_routes(quote: &Quote) -> Vec<RouteSummary> {
    quote
        .route_plans
        .iter()
        .enumerate()
        .map(|(route_index, route)| RouteSummary {
            route_index,
            out_amount: route.out_amount,
            price_impact_pct: route.price_impact_pct,
            other_amount_threshold: route.other_amount_threshold,
            hop_count: route.hop_count(),
            dex_labels: route.dex_labels(),
            provided_hop_impact: route.provided_hop_impact(),
            score: route.score,
            market_impact_pct: route.market_impact_pct,
        })
        .collect()
}

pub fn hop_records<L: TokenLookup + ?Sized>(quote: &Quote, tokens: &L) -> Vec<HopRecord> {
    quote
        .hops()
        .map(|(route_index, hop_index, hop)| HopRecord {
            route_index,
            hop_index,
            dex_label: hop.dex_label.clone(),
            amm_key: hop.amm_key.clone(),
            input_symbol: tokens.display_label(&hop.input_mint),
            output_symbol: tokens.display_label(&hop.output_mint),
            percent: hop.percent,
            price_impact_pct: hop.price_impact_pct,
            lp_fee: hop.lp_fee,
            platform_fee: hop.platform_fee,
            route_score: quote.route_plans[route_index].score,
        })
        .collect()
}

/// DEXs without any provided hop impact are left out rather than reported as 0
pub fn dex_price_impact(quote: &Quote) -> Vec<DexImpactStat> {
    let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (_, _, hop) in quote.hops() {
        if let Some(impact) = hop.price_impact_pct {
            samples.entry(hop.dex_label.as_str()).or_default().push(impact);
        }
    }

    samples
        .into_iter()
        .map(|(dex_label, values)| {
            let sum: f64 = values.iter().sum();
            DexImpactStat {
                dex_label: dex_label.to_string(),
                samples: values.len(),
                mean: sum / values.len() as f64,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// DEXs whose hops carry neither fee figure are left out
pub fn dex_fee_stats(quote: &Quote) -> Vec<DexFeeStat> {
    let mut samples: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for (_, _, hop) in quote.hops() {
        if hop.lp_fee.is_none() && hop.platform_fee.is_none() {
            continue;
        }
        let (lp, platform) = samples.entry(hop.dex_label.as_str()).or_default();
        lp.extend(hop.lp_fee);
        platform.extend(hop.platform_fee);
    }

    samples
        .into_iter()
        .map(|(dex_label, (lp, platform))| DexFeeStat {
            dex_label: dex_label.to_string(),
            lp_fee_samples: lp.len(),
            mean_lp_fee: mean(&lp),
            platform_fee_samples: platform.len(),
            mean_platform_fee: mean(&platform),
        })
        .collect()
}
