//! Immutable token list snapshot

use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;

use super::{TokenLookup, TokenMeta};
use crate::shared::errors::TokenError;

/// One complete token list, indexed by mint. Replaced wholesale on refresh,
/// never mutated in place.
#[derive(Debug, Clone)]
pub struct TokenSnapshot {
    tokens: Vec<TokenMeta>,
    index: HashMap<Pubkey, usize>,
    fetched_at: Option<DateTime<Utc>>,
}

impl TokenSnapshot {
    pub fn empty() -> Self {
        Self {
            tokens: Vec::new(),
            index: HashMap::new(),
            fetched_at: None,
        }
    }

    /// Build a snapshot; the first entry for a duplicated mint wins
    pub fn from_tokens(tokens: Vec<TokenMeta>) -> Self {
        let mut kept = Vec::with_capacity(tokens.len());
        let mut index = HashMap::with_capacity(tokens.len());

        for token in tokens {
            if index.contains_key(&token.mint) {
                continue;
            }
            index.insert(token.mint, kept.len());
            kept.push(token);
        }

        Self {
            tokens: kept,
            index,
            fetched_at: Some(Utc::now()),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenMeta> {
        self.tokens.iter()
    }

    /// First token whose symbol matches, ignoring case
    pub fn find_by_symbol(&self, symbol: &str) -> Option<&TokenMeta> {
        self.tokens
            .iter()
            .find(|token| !token.symbol.is_empty() && token.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Tokens whose symbol or name contains `text`, ignoring case
    pub fn search<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a TokenMeta> + 'a {
        let needle = text.to_lowercase();
        self.tokens.iter().filter(move |token| {
            token.symbol.to_lowercase().contains(&needle)
                || token
                    .name
                    .as_deref()
                    .map(|name| name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
    }

    /// Resolve a user supplied token reference: a mint address or a symbol.
    /// A mint must be present in the list.
    pub fn resolve(&self, reference: &str) -> Result<&TokenMeta, TokenError> {
        let found = match Pubkey::from_str(reference) {
            Ok(mint) => self.token(&mint),
            Err(_) => self.find_by_symbol(reference),
        };
        found.ok_or_else(|| TokenError::UnknownToken(reference.to_string()))
    }

    /// Both tokens must be listed and must differ
    pub fn validate_pair(
        &self,
        input: &str,
        output: &str,
    ) -> Result<(&TokenMeta, &TokenMeta), TokenError> {
        let input = self.resolve(input)?;
        let output = self.resolve(output)?;
        if input.mint == output.mint {
            return Err(TokenError::SameToken(input.mint));
        }
        Ok((input, output))
    }
}

impl Default for TokenSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl TokenLookup for TokenSnapshot {
    fn token(&self, mint: &Pubkey) -> Option<&TokenMeta> {
        self.index.get(mint).map(|&i| &self.tokens[i])
    }
}
