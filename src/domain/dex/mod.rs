//! DEX domain - venue usage across the routes of a quote

mod dex_usage;

pub use dex_usage::{DexUsageAggregator, DexUsageReport, DexUsageStat, FeeTotal, TokenPair};
