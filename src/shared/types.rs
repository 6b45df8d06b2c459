//! Common types used across the application

use serde::Serializer;
use solana_sdk::pubkey::Pubkey;

/// Well-known mints, used as CLI defaults and in tests
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Serialize a mint as its base58 string instead of the raw byte array
pub fn serialize_pubkey<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(key)
}

/// Selected route indices in ascending order, deduplicated
pub type RouteSelection = std::collections::BTreeSet<usize>;
