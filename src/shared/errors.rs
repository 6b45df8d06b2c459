//! Error handling for the application

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Errors raised while fetching or decoding an aggregator quote
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),
}

/// Token list and token pair errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Token list request failed: {0}")]
    Network(String),

    #[error("Invalid token list: {0}")]
    InvalidTokenList(String),

    #[error("Token not found in the token list: {0}")]
    UnknownToken(String),

    #[error("Input and output tokens cannot be the same: {0}")]
    SameToken(Pubkey),
}

/// Route graph construction errors. Any of these aborts the whole build.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteGraphError {
    #[error("Quote contains no route plans")]
    EmptyQuote,

    #[error("Route selection is empty")]
    EmptySelection,

    #[error("Route index {index} out of range ({available} routes available)")]
    RouteIndexOutOfRange { index: usize, available: usize },

    #[error("Broken hop chain in route {route_index} at hop {hop_index}: expected input mint {expected}, found {found}")]
    BrokenHopChain {
        route_index: usize,
        hop_index: usize,
        expected: Pubkey,
        found: Pubkey,
    },
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Quote(QuoteError),

    #[error(transparent)]
    Token(TokenError),

    #[error(transparent)]
    RouteGraph(RouteGraphError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        AppError::Quote(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Token(err)
    }
}

impl From<RouteGraphError> for AppError {
    fn from(err: RouteGraphError) -> Self {
        AppError::RouteGraph(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Unknown(err.to_string())
    }
}
