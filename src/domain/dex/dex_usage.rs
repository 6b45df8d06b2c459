//! DEX usage statistics over every route of a quote

use rust_decimal::Decimal;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use solana_sdk::pubkey::Pubkey;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::route::Quote;
use crate::domain::token::TokenLookup;
use crate::shared::types::serialize_pubkey;
use crate::shared::utils::to_ui_amount;

/// Unordered token pair, stored as (min, max) of the base58 mint strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TokenPair {
    #[serde(serialize_with = "serialize_pubkey")]
    pub low: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub high: Pubkey,
}

fn cmp_base58(a: &Pubkey, b: &Pubkey) -> Ordering {
    a.to_string().cmp(&b.to_string())
}

impl TokenPair {
    pub fn new(a: Pubkey, b: Pubkey) -> Self {
        if cmp_base58(&a, &b) == Ordering::Greater {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }
}

impl Ord for TokenPair {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_base58(&self.low, &other.low).then_with(|| cmp_base58(&self.high, &other.high))
    }
}

impl PartialOrd for TokenPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fee total for one DEX in one fee mint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeTotal {
    #[serde(serialize_with = "serialize_pubkey")]
    pub fee_mint: Pubkey,
    /// Sum in the mint's smallest unit
    pub raw_amount: u128,
    /// Sum in UI units; `None` when the mint's decimals are unknown
    pub ui_amount: Option<Decimal>,
    pub decimals: Option<u8>,
    pub fee_units_unknown: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DexUsageStat {
    pub hop_count: usize,
    /// Fee totals in first-seen fee mint order
    pub fees: Vec<FeeTotal>,
}

impl DexUsageStat {
    pub fn fee_in(&self, fee_mint: &Pubkey) -> Option<&FeeTotal> {
        self.fees.iter().find(|fee| fee.fee_mint == *fee_mint)
    }

    fn add_fee(&mut self, fee_mint: Pubkey, amount: u64, decimals: Option<u8>) {
        let position = match self.fees.iter().position(|fee| fee.fee_mint == fee_mint) {
            Some(position) => position,
            None => {
                self.fees.push(FeeTotal {
                    fee_mint,
                    raw_amount: 0,
                    ui_amount: None,
                    decimals,
                    fee_units_unknown: decimals.is_none(),
                });
                self.fees.len() - 1
            }
        };

        let total = &mut self.fees[position];
        total.raw_amount = total.raw_amount.saturating_add(u128::from(amount));
        total.ui_amount = total
            .decimals
            .and_then(|decimals| to_ui_amount(total.raw_amount, decimals));
        if total.decimals.is_some() && total.ui_amount.is_none() {
            total.fee_units_unknown = true;
        }
    }
}

/// Per-DEX usage and per-pair venue lists for one quote
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DexUsageReport {
    pub total_hops: usize,
    dex_usage: BTreeMap<String, DexUsageStat>,
    #[serde(serialize_with = "serialize_token_pairs")]
    token_pairs: BTreeMap<TokenPair, Vec<String>>,
}

impl DexUsageReport {
    /// Stats for `dex_label`; an unused label yields a zero stat
    pub fn usage(&self, dex_label: &str) -> DexUsageStat {
        self.dex_usage.get(dex_label).cloned().unwrap_or_default()
    }

    pub fn count(&self, dex_label: &str) -> usize {
        self.dex_usage
            .get(dex_label)
            .map(|stat| stat.hop_count)
            .unwrap_or(0)
    }

    /// Labels in sorted order with their stats
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DexUsageStat)> {
        self.dex_usage.iter().map(|(label, stat)| (label.as_str(), stat))
    }

    pub fn dex_count(&self) -> usize {
        self.dex_usage.len()
    }

    /// Venues that served the pair, in first-seen order with repeats.
    /// Argument order does not matter.
    pub fn pair(&self, a: &Pubkey, b: &Pubkey) -> &[String] {
        self.token_pairs
            .get(&TokenPair::new(*a, *b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn token_pairs(&self) -> impl Iterator<Item = (&TokenPair, &[String])> {
        self.token_pairs.iter().map(|(pair, labels)| (pair, labels.as_slice()))
    }

    /// Highest hop count; ties go to the label that sorts first
    pub fn most_used(&self) -> Option<(&str, usize)> {
        self.dex_usage
            .iter()
            .fold(None, |best: Option<(&str, usize)>, (label, stat)| match best {
                Some((_, count)) if count >= stat.hop_count => best,
                _ => Some((label.as_str(), stat.hop_count)),
            })
    }
}

#[derive(Serialize)]
struct TokenPairEntry<'a> {
    #[serde(flatten)]
    pair: &'a TokenPair,
    dex_labels: &'a [String],
}

fn serialize_token_pairs<S: Serializer>(
    pairs: &BTreeMap<TokenPair, Vec<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(pairs.len()))?;
    for (pair, dex_labels) in pairs {
        seq.serialize_element(&TokenPairEntry { pair, dex_labels })?;
    }
    seq.end()
}

/// Folds every hop of every route into a [`DexUsageReport`]
pub struct DexUsageAggregator<'a, L: TokenLookup + ?Sized> {
    tokens: &'a L,
}

impl<'a, L: TokenLookup + ?Sized> DexUsageAggregator<'a, L> {
    pub fn new(tokens: &'a L) -> Self {
        Self { tokens }
    }

    /// Never fails: a fee mint missing from the token list is kept in raw
    /// units and flagged `fee_units_unknown`.
    pub fn aggregate(&self, quote: &Quote) -> DexUsageReport {
        let mut report = DexUsageReport::default();

        for (route_index, hop_index, hop) in quote.hops() {
            let decimals = self.tokens.decimals(&hop.fee_mint);
            if decimals.is_none() {
                debug!(
                    "Fee mint {} of route {} hop {} not in token list, keeping raw units",
                    hop.fee_mint, route_index, hop_index
                );
            }

            let stat = report.dex_usage.entry(hop.dex_label.clone()).or_default();
            stat.hop_count += 1;
            stat.add_fee(hop.fee_mint, hop.fee_amount, decimals);

            report
                .token_pairs
                .entry(TokenPair::new(hop.input_mint, hop.output_mint))
                .or_default()
                .push(hop.dex_label.clone());

            report.total_hops += 1;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bonk, hop, quote, route, sol, token_snapshot, two_hop_quote, usdc};

    #[test]
    fn test_two_hop_usage() {
        let tokens = token_snapshot();
        let report = DexUsageAggregator::new(&tokens).aggregate(&two_hop_quote());

        assert_eq!(report.total_hops, 2);
        assert_eq!(report.dex_count(), 2);

        let orca = report.usage("Orca");
        assert_eq!(orca.hop_count, 1);
        assert_eq!(orca.fees.len(), 1);
        let orca_fee = orca.fee_in(&usdc()).unwrap();
        assert_eq!(orca_fee.raw_amount, 100);
        assert_eq!(orca_fee.ui_amount, Some(Decimal::new(100, 6)));
        assert!(!orca_fee.fee_units_unknown);

        let raydium = report.usage("Raydium");
        assert_eq!(raydium.hop_count, 1);
        let raydium_fee = raydium.fee_in(&sol()).unwrap();
        assert_eq!(raydium_fee.raw_amount, 50);
        assert_eq!(raydium_fee.decimals, Some(9));

        assert_eq!(report.pair(&usdc(), &sol()), ["Orca".to_string()]);
        assert_eq!(report.pair(&bonk(), &sol()), ["Raydium".to_string()]);
        assert_eq!(report.token_pairs().count(), 2);
    }

    #[test]
    fn test_pair_keys_follow_base58_order() {
        let tokens = token_snapshot();
        let report = DexUsageAggregator::new(&tokens).aggregate(&two_hop_quote());

        let keys: Vec<_> = report
            .token_pairs()
            .map(|(pair, labels)| (pair.low, pair.high, labels.to_vec()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (bonk(), sol(), vec!["Raydium".to_string()]),
                (usdc(), sol(), vec!["Orca".to_string()]),
            ]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["token_pairs"][1]["low"], usdc().to_string());
        assert_eq!(json["token_pairs"][1]["high"], sol().to_string());
    }

    #[test]
    fn test_unused_label_counts_zero() {
        let tokens = token_snapshot();
        let report = DexUsageAggregator::new(&tokens).aggregate(&two_hop_quote());

        assert_eq!(report.count("Phoenix"), 0);
        assert_eq!(report.usage("Phoenix"), DexUsageStat::default());
    }

    #[test]
    fn test_pair_lookup_is_symmetric() {
        let tokens = token_snapshot();
        let quote = quote(vec![
            route(vec![hop(usdc(), sol(), "Orca", 0, usdc())]),
            route(vec![hop(sol(), usdc(), "Raydium", 0, sol())]),
        ]);
        let report = DexUsageAggregator::new(&tokens).aggregate(&quote);

        assert_eq!(report.pair(&usdc(), &sol()), report.pair(&sol(), &usdc()));
        assert_eq!(TokenPair::new(usdc(), sol()), TokenPair::new(sol(), usdc()));
        assert_eq!(report.token_pairs().count(), 1);
    }

    #[test]
    fn test_pair_labels_keep_order_and_repeats() {
        let tokens = token_snapshot();
        let quote = quote(vec![
            route(vec![hop(usdc(), sol(), "Raydium", 0, usdc())]),
            route(vec![hop(usdc(), sol(), "Orca", 0, usdc())]),
            route(vec![hop(sol(), usdc(), "Raydium", 0, sol())]),
        ]);
        let report = DexUsageAggregator::new(&tokens).aggregate(&quote);

        assert_eq!(
            report.pair(&sol(), &usdc()),
            ["Raydium".to_string(), "Orca".to_string(), "Raydium".to_string()]
        );
        assert_eq!(report.count("Raydium"), 2);
        assert_eq!(report.most_used(), Some(("Raydium", 2)));
    }

    #[test]
    fn test_aggregates_every_route() {
        let tokens = token_snapshot();
        let quote = quote(vec![
            route(vec![
                hop(usdc(), sol(), "Orca", 100, usdc()),
                hop(sol(), bonk(), "Orca", 40, sol()),
            ]),
            route(vec![hop(usdc(), bonk(), "Orca", 25, usdc())]),
        ]);
        let report = DexUsageAggregator::new(&tokens).aggregate(&quote);

        let orca = report.usage("Orca");
        assert_eq!(orca.hop_count, 3);
        assert_eq!(orca.fee_in(&usdc()).unwrap().raw_amount, 125);
        assert_eq!(orca.fee_in(&sol()).unwrap().raw_amount, 40);
        assert_eq!(orca.fees[0].fee_mint, usdc());
    }

    #[test]
    fn test_unknown_fee_mint_is_flagged_not_dropped() {
        let tokens = token_snapshot();
        let stranger = Pubkey::new_unique();
        let quote = quote(vec![route(vec![
            hop(usdc(), stranger, "Phoenix", 7, stranger),
            hop(stranger, bonk(), "Phoenix", 3, usdc()),
        ])]);
        let report = DexUsageAggregator::new(&tokens).aggregate(&quote);

        let phoenix = report.usage("Phoenix");
        assert_eq!(phoenix.hop_count, 2);

        let raw = phoenix.fee_in(&stranger).unwrap();
        assert_eq!(raw.raw_amount, 7);
        assert_eq!(raw.ui_amount, None);
        assert!(raw.fee_units_unknown);

        let known = phoenix.fee_in(&usdc()).unwrap();
        assert!(!known.fee_units_unknown);
        assert_eq!(known.ui_amount, Some(Decimal::new(3, 6)));
    }

    #[test]
    fn test_empty_quote_aggregates_to_nothing() {
        let tokens = token_snapshot();
        let report = DexUsageAggregator::new(&tokens).aggregate(&quote(vec![]));
        assert_eq!(report.total_hops, 0);
        assert_eq!(report.most_used(), None);
        assert!(report.pair(&usdc(), &sol()).is_empty());
    }

    #[test]
    fn test_report_serializes_pairs_as_list() {
        let tokens = token_snapshot();
        let report = DexUsageAggregator::new(&tokens).aggregate(&two_hop_quote());
        let json = serde_json::to_value(&report).unwrap();

        let pairs = json["token_pairs"].as_array().unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs[0]["low"].is_string());
        assert_eq!(json["dex_usage"]["Orca"]["hop_count"], 1);
    }
}
