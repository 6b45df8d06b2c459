//! Jupiter route visualizer
//! Route multigraphs and DEX usage statistics derived from aggregator quotes

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;
pub mod report;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use domain::dex::{DexUsageAggregator, DexUsageReport, DexUsageStat};
pub use domain::route::{Quote, RouteGraph, RouteGraphBuilder, RoutePlan};
pub use domain::token::{TokenLookup, TokenSnapshot};
pub use infrastructure::TokenMetadataCache;
pub use report::AnalysisReport;
