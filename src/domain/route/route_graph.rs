//! Route multigraph: token nodes keyed by mint, one DEX edge per hop.
//!
//! Parallel edges between the same pair of tokens are expected. They appear
//! whenever different routes, or different venues, swap the same pair.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use tracing::debug;

use super::quote::{Hop, Quote};
use crate::domain::token::TokenLookup;
use crate::shared::errors::RouteGraphError;
use crate::shared::types::{serialize_pubkey, RouteSelection};

/// Graph vertex, one per distinct mint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenNode {
    #[serde(serialize_with = "serialize_pubkey")]
    pub mint: Pubkey,
    pub label: String,
    /// Number of distinct edges touching this node
    pub weight: usize,
}

/// Composite edge identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub from: Pubkey,
    pub to: Pubkey,
    pub dex_label: String,
    pub route_index: usize,
    pub hop_index: usize,
}

/// Graph edge, one per hop of a selected route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DexEdge {
    #[serde(serialize_with = "serialize_pubkey")]
    pub from: Pubkey,
    #[serde(serialize_with = "serialize_pubkey")]
    pub to: Pubkey,
    pub dex_label: String,
    pub amm_key: String,
    pub route_index: usize,
    pub hop_index: usize,
    pub in_amount: u64,
    pub out_amount: u64,
    pub fee_amount: u64,
    #[serde(serialize_with = "serialize_pubkey")]
    pub fee_mint: Pubkey,
    pub price_impact_pct: Option<f64>,
    pub price_impact_provided: bool,
    /// Rendering weight: |hop price impact| when provided, 0 otherwise
    pub weight: f64,
}

impl DexEdge {
    fn from_hop(route_index: usize, hop_index: usize, hop: &Hop) -> Self {
        Self {
            from: hop.input_mint,
            to: hop.output_mint,
            dex_label: hop.dex_label.clone(),
            amm_key: hop.amm_key.clone(),
            route_index,
            hop_index,
            in_amount: hop.in_amount,
            out_amount: hop.out_amount,
            fee_amount: hop.fee_amount,
            fee_mint: hop.fee_mint,
            price_impact_pct: hop.price_impact_pct,
            price_impact_provided: hop.price_impact_pct.is_some(),
            weight: hop.price_impact_pct.map(f64::abs).unwrap_or(0.0),
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            from: self.from,
            to: self.to,
            dex_label: self.dex_label.clone(),
            route_index: self.route_index,
            hop_index: self.hop_index,
        }
    }

    fn touches(&self, mint: &Pubkey) -> bool {
        self.from == *mint || self.to == *mint
    }
}

/// Directed multigraph for the selected routes of one quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteGraph {
    selected_routes: Vec<usize>,
    nodes: Vec<TokenNode>,
    edges: Vec<DexEdge>,
    #[serde(skip)]
    node_index: HashMap<Pubkey, usize>,
}

impl RouteGraph {
    fn new(selected_routes: Vec<usize>) -> Self {
        Self {
            selected_routes,
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::new(),
        }
    }

    /// Insert a node unless the mint is already present; the first label wins
    fn upsert_node(&mut self, mint: Pubkey, label: impl FnOnce() -> String) {
        if self.node_index.contains_key(&mint) {
            return;
        }
        self.node_index.insert(mint, self.nodes.len());
        self.nodes.push(TokenNode {
            mint,
            label: label(),
            weight: 0,
        });
    }

    fn push_edge(&mut self, edge: DexEdge) {
        self.edges.push(edge);
    }

    fn compute_node_weights(&mut self) {
        for node in &mut self.nodes {
            node.weight = 0;
        }
        for edge in &self.edges {
            if let Some(&i) = self.node_index.get(&edge.from) {
                self.nodes[i].weight += 1;
            }
            if edge.to != edge.from {
                if let Some(&i) = self.node_index.get(&edge.to) {
                    self.nodes[i].weight += 1;
                }
            }
        }
    }

    pub fn selected_routes(&self) -> &[usize] {
        &self.selected_routes
    }

    /// Nodes in first-seen order
    pub fn nodes(&self) -> &[TokenNode] {
        &self.nodes
    }

    /// Edges in route order, then hop order
    pub fn edges(&self) -> &[DexEdge] {
        &self.edges
    }

    pub fn node(&self, mint: &Pubkey) -> Option<&TokenNode> {
        self.node_index.get(mint).map(|&i| &self.nodes[i])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All directed edges from `from` to `to`
    pub fn edges_between<'a>(
        &'a self,
        from: &'a Pubkey,
        to: &'a Pubkey,
    ) -> impl Iterator<Item = &'a DexEdge> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.from == *from && edge.to == *to)
    }

    pub fn edges_touching<'a>(&'a self, mint: &'a Pubkey) -> impl Iterator<Item = &'a DexEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.touches(mint))
    }
}

/// Converts selected route plans of a quote into a [`RouteGraph`]
pub struct RouteGraphBuilder<'a, L: TokenLookup + ?Sized> {
    tokens: &'a L,
}

impl<'a, L: TokenLookup + ?Sized> RouteGraphBuilder<'a, L> {
    pub fn new(tokens: &'a L) -> Self {
        Self { tokens }
    }

    /// Build the graph for `selection`, or for the best route when `None`.
    /// Routes are never re-ranked; the quote's order is kept.
    pub fn build(
        &self,
        quote: &Quote,
        selection: Option<&RouteSelection>,
    ) -> Result<RouteGraph, RouteGraphError> {
        if quote.route_plans.is_empty() {
            return Err(RouteGraphError::EmptyQuote);
        }

        let selected = resolve_selection(selection, quote.route_count())?;

        // Validate everything before building anything: no partial graphs.
        for &route_index in &selected {
            quote.route_plans[route_index]
                .check_chain()
                .map_err(|b| RouteGraphError::BrokenHopChain {
                    route_index,
                    hop_index: b.hop_index,
                    expected: b.expected,
                    found: b.found,
                })?;
        }

        let mut graph = RouteGraph::new(selected.clone());
        for &route_index in &selected {
            for (hop_index, hop) in quote.route_plans[route_index].hops.iter().enumerate() {
                graph.upsert_node(hop.input_mint, || self.tokens.display_label(&hop.input_mint));
                graph.upsert_node(hop.output_mint, || self.tokens.display_label(&hop.output_mint));
                graph.push_edge(DexEdge::from_hop(route_index, hop_index, hop));
            }
        }
        graph.compute_node_weights();

        debug!(
            "Built route graph: {} routes, {} nodes, {} edges",
            selected.len(),
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

fn resolve_selection(
    selection: Option<&RouteSelection>,
    available: usize,
) -> Result<Vec<usize>, RouteGraphError> {
    let selected: Vec<usize> = match selection {
        None => vec![0],
        Some(set) if set.is_empty() => return Err(RouteGraphError::EmptySelection),
        Some(set) => set.iter().copied().collect(),
    };

    if let Some(&index) = selected.iter().find(|&&index| index >= available) {
        return Err(RouteGraphError::RouteIndexOutOfRange { index, available });
    }
    Ok(selected)
}
