// src/report.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::domain::dex::DexUsageReport;
use crate::domain::route::{DexFeeStat, DexImpactStat, HopRecord, RouteGraph, RouteSummary};
use crate::shared::types::serialize_pubkey;

/// Everything derived from one quote for one analysis request
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub id: String,
    #[serde(serialize_with = "serialize_pubkey")]
    pub input_mint: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub output_mint: Pubkey,
    pub input_symbol: String,
    pub output_symbol: String,
    pub amount: u64,
    pub slippage_bps: u16,

    // Selected routes only
    pub graph: RouteGraph,

    // All routes
    pub dex_usage: DexUsageReport,
    pub routes: Vec<RouteSummary>,
    pub hops: Vec<HopRecord>,
    pub dex_price_impact: Vec<DexImpactStat>,
    pub dex_fees: Vec<DexFeeStat>,
    pub most_used_dex: Option<String>,

    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain text rendering for the terminal
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Quote {} -> {} | amount {} | slippage {} bps\n",
            self.input_symbol, self.output_symbol, self.amount, self.slippage_bps
        ));
        out.push_str(&format!("Available routes: {}\n", self.routes.len()));

        out.push_str("\nRoutes:\n");
        for route in &self.routes {
            out.push_str(&format!(
                "  #{:<2} out {:>16}  impact {:>8.4}%  hops {}  [{}]",
                route.route_index + 1,
                route.out_amount,
                route.price_impact_pct,
                route.hop_count,
                route.dex_labels.join(" > ")
            ));
            if let Some(score) = route.score {
                out.push_str(&format!("  score {:.2}", score));
            }
            if let Some(impact) = route.market_impact_pct {
                out.push_str(&format!("  market impact {:.4}%", impact));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "\nRoute graph (routes {:?}): {} nodes, {} edges\n",
            self.graph
                .selected_routes()
                .iter()
                .map(|i| i + 1)
                .collect::<Vec<_>>(),
            self.graph.node_count(),
            self.graph.edge_count()
        ));
        for edge in self.graph.edges() {
            let label = |mint: &Pubkey| {
                self.graph
                    .node(mint)
                    .map(|node| node.label.clone())
                    .unwrap_or_else(|| mint.to_string())
            };
            out.push_str(&format!(
                "  route {} step {}: {} -> {} via {}\n",
                edge.route_index + 1,
                edge.hop_index + 1,
                label(&edge.from),
                label(&edge.to),
                edge.dex_label
            ));
        }

        out.push_str(&format!("\nDEX usage ({} hops):\n", self.dex_usage.total_hops));
        for (dex, stat) in self.dex_usage.iter() {
            let fees = stat
                .fees
                .iter()
                .map(|fee| match fee.ui_amount {
                    Some(ui) if !fee.fee_units_unknown => format!("{} of {}", ui.normalize(), fee.fee_mint),
                    _ => format!("{} raw units of {} (units unknown)", fee.raw_amount, fee.fee_mint),
                })
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("  {:<20} {:>3} hop(s)  fees: {}\n", dex, stat.hop_count, fees));
        }
        if !self.dex_fees.is_empty() {
            out.push_str("\nAverage fees by DEX:\n");
            let show = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v));
            for stat in &self.dex_fees {
                out.push_str(&format!(
                    "  {:<20} lp {:>12}  platform {:>12}\n",
                    stat.dex_label,
                    show(stat.mean_lp_fee),
                    show(stat.mean_platform_fee)
                ));
            }
        }
        if let Some(dex) = &self.most_used_dex {
            out.push_str(&format!("Most used DEX: {}\n", dex));
        }

        out
    }
}
