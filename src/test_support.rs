//! Fixtures shared by unit tests

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::domain::route::{Hop, Quote, RoutePlan};
use crate::domain::token::{TokenMeta, TokenSnapshot};
use crate::shared::types::{SOL_MINT, USDC_MINT};

pub const BONK_MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

pub fn usdc() -> Pubkey {
    Pubkey::from_str(USDC_MINT).unwrap()
}

pub fn sol() -> Pubkey {
    Pubkey::from_str(SOL_MINT).unwrap()
}

pub fn bonk() -> Pubkey {
    Pubkey::from_str(BONK_MINT).unwrap()
}

pub fn token_snapshot() -> TokenSnapshot {
    let mut usdc_meta = TokenMeta::new(usdc(), "USDC", 6);
    usdc_meta.name = Some("USD Coin".to_string());
    let mut sol_meta = TokenMeta::new(sol(), "SOL", 9);
    sol_meta.name = Some("Wrapped SOL".to_string());
    let mut bonk_meta = TokenMeta::new(bonk(), "Bonk", 5);
    bonk_meta.name = Some("Bonk".to_string());
    TokenSnapshot::from_tokens(vec![usdc_meta, sol_meta, bonk_meta])
}

pub fn hop(input: Pubkey, output: Pubkey, dex: &str, fee_amount: u64, fee_mint: Pubkey) -> Hop {
    Hop {
        input_mint: input,
        output_mint: output,
        dex_label: dex.to_string(),
        amm_key: format!("{}-amm", dex.to_lowercase()),
        in_amount: 1_000_000,
        out_amount: 5_000_000,
        fee_amount,
        fee_mint,
        percent: 100,
        price_impact_pct: None,
        lp_fee: None,
        platform_fee: None,
    }
}

pub fn route(hops: Vec<Hop>) -> RoutePlan {
    RoutePlan {
        hops,
        price_impact_pct: 0.01,
        out_amount: 5_000_000,
        other_amount_threshold: Some(4_975_000),
        score: None,
        market_impact_pct: None,
    }
}

pub fn quote(route_plans: Vec<RoutePlan>) -> Quote {
    Quote {
        input_mint: usdc(),
        output_mint: bonk(),
        in_amount: 1_000_000,
        slippage_bps: 50,
        route_plans,
    }
}

/// USDC -> SOL on Orca (fee 100 USDC units), then SOL -> BONK on Raydium (fee 50 SOL units)
pub fn two_hop_quote() -> Quote {
    quote(vec![route(vec![
        hop(usdc(), sol(), "Orca", 100, usdc()),
        hop(sol(), bonk(), "Raydium", 50, sol()),
    ])])
}
