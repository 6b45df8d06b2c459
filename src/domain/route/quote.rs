//! Aggregator quote representation: hops, route plans and the quote itself

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::shared::types::serialize_pubkey;

/// Single swap leg executed on one DEX
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hop {
    #[serde(serialize_with = "serialize_pubkey")]
    pub input_mint: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub output_mint: Pubkey,
    pub dex_label: String,
    pub amm_key: String,
    pub in_amount: u64,
    pub out_amount: u64,
    pub fee_amount: u64,
    #[serde(serialize_with = "serialize_pubkey")]
    pub fee_mint: Pubkey,
    pub percent: u8,
    /// Hop-level price impact, only when the upstream data carries one
    pub price_impact_pct: Option<f64>,
    pub lp_fee: Option<f64>,
    pub platform_fee: Option<f64>,
}

/// Position where consecutive hops do not connect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainBreak {
    pub hop_index: usize,
    pub expected: Pubkey,
    pub found: Pubkey,
}

/// Ordered hop sequence. Consecutive hops must chain:
/// `hops[i].output_mint == hops[i + 1].input_mint`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub hops: Vec<Hop>,
    pub price_impact_pct: f64,
    pub out_amount: u64,
    pub other_amount_threshold: Option<u64>,
    /// Aggregator ranking score, legacy responses only
    pub score: Option<f64>,
    pub market_impact_pct: Option<f64>,
}

impl RoutePlan {
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// First chaining violation, if any. Reported, never repaired.
    pub fn check_chain(&self) -> Result<(), ChainBreak> {
        for (i, pair) in self.hops.windows(2).enumerate() {
            if pair[0].output_mint != pair[1].input_mint {
                return Err(ChainBreak {
                    hop_index: i + 1,
                    expected: pair[0].output_mint,
                    found: pair[1].input_mint,
                });
            }
        }
        Ok(())
    }

    pub fn dex_labels(&self) -> Vec<String> {
        self.hops.iter().map(|hop| hop.dex_label.clone()).collect()
    }

    /// Sum of hop-level impacts that were provided; `None` if no hop has one
    pub fn provided_hop_impact(&self) -> Option<f64> {
        self.hops
            .iter()
            .filter_map(|hop| hop.price_impact_pct)
            .fold(None, |acc, impact| Some(acc.unwrap_or(0.0) + impact))
    }
}

/// Quote request echo plus the route plans, best first as returned upstream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    #[serde(serialize_with = "serialize_pubkey")]
    pub input_mint: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub output_mint: Pubkey,
    pub in_amount: u64,
    pub slippage_bps: u16,
    pub route_plans: Vec<RoutePlan>,
}

impl Quote {
    pub fn route_count(&self) -> usize {
        self.route_plans.len()
    }

    /// Every hop of every route as `(route_index, hop_index, hop)`
    pub fn hops(&self) -> impl Iterator<Item = (usize, usize, &Hop)> {
        self.route_plans.iter().enumerate().flat_map(|(route_index, route)| {
            route
                .hops
                .iter()
                .enumerate()
                .map(move |(hop_index, hop)| (route_index, hop_index, hop))
        })
    }

    pub fn total_hops(&self) -> usize {
        self.route_plans.iter().map(RoutePlan::hop_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bonk, hop, quote, route, sol, two_hop_quote, usdc};

    #[test]
    fn test_chain_holds() {
        let quote = two_hop_quote();
        assert_eq!(quote.route_plans[0].check_chain(), Ok(()));
        assert_eq!(quote.route_plans[0].hop_count(), 2);
    }

    #[test]
    fn test_chain_break_reports_position() {
        let broken = route(vec![
            hop(usdc(), sol(), "Orca", 0, usdc()),
            hop(usdc(), bonk(), "Raydium", 0, usdc()),
        ]);
        assert_eq!(
            broken.check_chain(),
            Err(ChainBreak {
                hop_index: 1,
                expected: sol(),
                found: usdc(),
            })
        );
    }

    #[test]
    fn test_hops_iterates_all_routes() {
        let quote = quote(vec![
            route(vec![hop(usdc(), bonk(), "Meteora", 0, usdc())]),
            route(vec![
                hop(usdc(), sol(), "Orca", 0, usdc()),
                hop(sol(), bonk(), "Raydium", 0, sol()),
            ]),
        ]);
        let positions: Vec<_> = quote.hops().map(|(r, h, hop)| (r, h, hop.dex_label.as_str())).collect();
        assert_eq!(
            positions,
            vec![(0, 0, "Meteora"), (1, 0, "Orca"), (1, 1, "Raydium")]
        );
        assert_eq!(quote.total_hops(), 3);
    }

    #[test]
    fn test_provided_hop_impact() {
        let mut plan = two_hop_quote().route_plans.remove(0);
        assert_eq!(plan.provided_hop_impact(), None);
        plan.hops[1].price_impact_pct = Some(0.25);
        assert_eq!(plan.provided_hop_impact(), Some(0.25));
    }
}
