//! Token cost estimation.

/// USD cost of `tokens` at `price_per_1k` dollars per thousand tokens.
pub fn cost(tokens: u32, price_per_1k: f64) -> f64 {
    f64::from(tokens) * price_per_1k / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost() {
        assert_eq!(cost(0, 0.5), 0.0);
        assert!((cost(1000, 0.00002) - 0.00002).abs() < 1e-12);
        assert!((cost(250, 0.002) - 0.0005).abs() < 1e-12);
    }
}
