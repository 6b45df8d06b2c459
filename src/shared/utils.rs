//! Utility functions and helpers

use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

use crate::shared::types::RouteSelection;

/// Convert a smallest-unit amount into UI units.
/// Returns `None` when the value or scale does not fit a `Decimal`.
pub fn to_ui_amount(raw: u128, decimals: u8) -> Option<Decimal> {
    let raw = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(raw, u32::from(decimals)).ok()
}

/// Abbreviated mint used when no symbol is known
pub fn short_mint(mint: &Pubkey) -> String {
    let text = mint.to_string();
    format!("{}...", &text[..8.min(text.len())])
}

/// Parse a comma separated list of route indices, e.g. `0,2,3`
pub fn parse_route_selection(text: &str) -> Result<RouteSelection, String> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>()
                .map_err(|e| format!("invalid route index '{}': {}", part, e))
        })
        .collect()
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_to_ui_amount() {
        assert_eq!(to_ui_amount(1_500_000, 6), Some(Decimal::new(15, 1)));
        assert_eq!(to_ui_amount(100, 0), Some(Decimal::from(100)));
        assert_eq!(to_ui_amount(1, 40), None);
    }

    #[test]
    fn test_short_mint() {
        let mint = Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v").unwrap();
        assert_eq!(short_mint(&mint), "EPjFWdd5...");
    }

    #[test]
    fn test_parse_route_selection() {
        let selection = parse_route_selection("2, 0,2").unwrap();
        assert_eq!(selection.into_iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(parse_route_selection("1,x").is_err());
        assert!(parse_route_selection("").unwrap().is_empty());
    }
}
