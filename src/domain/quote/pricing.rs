//! Fee, price impact and slippage heuristics

use rust_decimal::Decimal;

use crate::shared::types::Pool;
use crate::shared::utils::{decimal_to_f64, round_to, to_amount};

/// Flat haircut applied to every oracle-derived output (0.5% slippage)
pub const OUTPUT_HAIRCUT: f64 = 0.995;

/// Slippage percent used for the minimum output of engine-produced quotes
pub const DEFAULT_SLIPPAGE_PERCENT: f64 = 1.0;

/// Price impact ceiling in percent
pub const MAX_PRICE_IMPACT: f64 = 5.0;

/// Stablecoin-class symbols carry a USD or DAI marker
pub fn is_stable_symbol(symbol: &str) -> bool {
    symbol.contains("USD") || symbol.contains("DAI")
}

/// Sum of the route's pool fees applied to the input amount
pub fn calculate_fee(amount_in: Decimal, route: &[Pool]) -> Option<Decimal> {
    let total_fee: f64 = route.iter().map(|pool| pool.fee).sum();
    to_amount(decimal_to_f64(amount_in) * total_fee)
}

/// Display heuristic, not derived from pool reserves
pub fn calculate_price_impact(
    amount_in: Decimal,
    amount_out: Decimal,
    token_in: &str,
    token_out: &str,
) -> f64 {
    let amount = decimal_to_f64(amount_in);
    let output = decimal_to_f64(amount_out);

    let mut price_impact = (amount / 10000.0).min(MAX_PRICE_IMPACT);

    if is_stable_symbol(token_in) && is_stable_symbol(token_out) {
        price_impact *= 0.1;
    }

    if output > 1000.0 {
        price_impact *= 1.2;
    }

    round_to(price_impact, 2)
}

/// Minimum acceptable output for a slippage tolerance given in percent
pub fn calculate_minimum_output(amount_out: Decimal, slippage_tolerance: f64) -> Option<Decimal> {
    let slippage_multiplier = 1.0 - (slippage_tolerance / 100.0);
    to_amount(decimal_to_f64(amount_out) * slippage_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pool(fee: f64) -> Pool {
        Pool {
            id: "a-b".to_string(),
            token_a: "a".to_string(),
            token_b: "b".to_string(),
            address: "0x...".to_string(),
            fee,
        }
    }

    #[test]
    fn test_calculate_fee() {
        let route = vec![pool(0.003), pool(0.003)];
        let fee = calculate_fee(dec("100"), &route).unwrap();
        assert_eq!(fee, dec("0.6"));
        assert_eq!(fee.to_string(), "0.600000");
    }

    #[test]
    fn test_fee_linear_in_amount() {
        let route = vec![pool(0.003)];
        let single = calculate_fee(dec("250"), &route).unwrap();
        let triple = calculate_fee(dec("750"), &route).unwrap();
        assert_eq!(single * Decimal::from(3), triple);
    }

    #[test]
    fn test_price_impact_small_trade() {
        // 1 ETH -> ~4131 USDC: 0.0001 * 1.2 rounds to 0
        assert_eq!(calculate_price_impact(dec("1"), dec("4131.03"), "pETH", "pUSDC"), 0.0);
        assert_eq!(calculate_price_impact(dec("500"), dec("10"), "pETH", "pUSDC"), 0.05);
    }

    #[test]
    fn test_price_impact_capped_and_scaled() {
        assert_eq!(calculate_price_impact(dec("100000"), dec("1"), "pSOL", "pBNB"), 5.0);
        assert_eq!(calculate_price_impact(dec("100000"), dec("5000"), "pSOL", "pBNB"), 6.0);
    }

    #[test]
    fn test_price_impact_stable_pair() {
        assert_eq!(calculate_price_impact(dec("20000"), dec("19990"), "pUSDC", "DAI"), 0.24);
        assert_eq!(calculate_price_impact(dec("20000"), dec("999"), "USDT", "pUSDC"), 0.2);
    }

    #[test]
    fn test_minimum_output() {
        assert_eq!(calculate_minimum_output(dec("100"), 1.0), Some(dec("99")));
        assert_eq!(
            calculate_minimum_output(dec("4131.031050"), 0.0),
            Some(dec("4131.031050"))
        );
    }

    #[test]
    fn test_minimum_output_monotonic_in_slippage() {
        let amount = dec("1234.567891");
        let mut previous = calculate_minimum_output(amount, 0.0).unwrap();
        for step in 1..=100 {
            let current = calculate_minimum_output(amount, step as f64 * 0.5).unwrap();
            assert!(current <= previous);
            previous = current;
        }
    }
}
