//! Route domain - quotes, route plans and the route multigraph

mod quote;
mod route_graph;
mod route_metrics;

pub use quote::{ChainBreak, Hop, Quote, RoutePlan};
pub use route_graph::{DexEdge, EdgeKey, RouteGraph, RouteGraphBuilder, TokenNode};
pub use route_metrics::{
    dex_fee_stats, dex_price_impact, hop_records, summarize_routes, DexFeeStat, DexImpactStat,
    HopRecord, RouteSummary,
};
