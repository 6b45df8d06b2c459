//! Token domain - metadata used to label mints and scale fee amounts

mod token_snapshot;

pub use token_snapshot::TokenSnapshot;

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;

use crate::shared::types::serialize_pubkey;
use crate::shared::utils::short_mint;

/// Token metadata as published by the aggregator token list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenMeta {
    #[serde(serialize_with = "serialize_pubkey")]
    pub mint: Pubkey,
    pub symbol: String,
    pub name: Option<String>,
    pub decimals: u8,
    pub logo_uri: Option<String>,
}

impl TokenMeta {
    pub fn new(mint: Pubkey, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            mint,
            symbol: symbol.into(),
            name: None,
            decimals,
            logo_uri: None,
        }
    }
}

/// Read-only metadata lookup injected into the graph builder and the aggregator
pub trait TokenLookup {
    fn token(&self, mint: &Pubkey) -> Option<&TokenMeta>;

    /// Symbol for the mint, or an abbreviated mint when the mint is unknown
    /// or listed without a symbol
    fn display_label(&self, mint: &Pubkey) -> String {
        self.token(mint)
            .filter(|meta| !meta.symbol.trim().is_empty())
            .map(|meta| meta.symbol.clone())
            .unwrap_or_else(|| short_mint(mint))
    }

    fn decimals(&self, mint: &Pubkey) -> Option<u8> {
        self.token(mint).map(|meta| meta.decimals)
    }
}

impl TokenLookup for HashMap<Pubkey, TokenMeta> {
    fn token(&self, mint: &Pubkey) -> Option<&TokenMeta> {
        self.get(mint)
    }
}
