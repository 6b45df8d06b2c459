//! Infrastructure layer - HTTP clients and the token metadata cache

pub mod jupiter;
pub mod token_metadata;

pub use jupiter::{JupiterQuoteClient, JupiterTokenListClient, QuoteRequest, QuoteSource, TokenSource};
pub use token_metadata::TokenMetadataCache;
