//! Route selection over the configured pools

use crate::domain::registry::TokenRegistry;
use crate::shared::types::Pool;

/// Direct pool, else a two-hop route through the first usable routing token,
/// else a synthetic single pool. The route is never empty.
pub fn find_best_route(registry: &TokenRegistry, token_in: &str, token_out: &str) -> Vec<Pool> {
    if let Some(pool) = registry.find_pool(token_in, token_out) {
        return vec![pool.clone()];
    }

    for routing_token in registry.routing_tokens() {
        if routing_token == token_in || routing_token == token_out {
            continue;
        }

        let pool_in = registry.find_pool(token_in, routing_token);
        let pool_out = registry.find_pool(routing_token, token_out);

        if let (Some(pool_in), Some(pool_out)) = (pool_in, pool_out) {
            return vec![pool_in.clone(), pool_out.clone()];
        }
    }

    vec![Pool::synthetic(token_in, token_out, registry.synthetic_pool_fee())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::RegistryConfig;

    fn shared_token<'a>(first: &'a Pool, second: &Pool) -> Option<&'a str> {
        [first.token_a.as_str(), first.token_b.as_str()]
            .into_iter()
            .find(|symbol| second.contains(symbol))
    }

    #[test]
    fn test_direct_route_any_order() {
        let registry = TokenRegistry::default();
        let forward = find_best_route(&registry, "pETH", "pUSDC");
        let backward = find_best_route(&registry, "pUSDC", "pETH");

        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].id, "pETH-pUSDC");
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_two_hop_through_routing_token() {
        let registry = TokenRegistry::default();
        let route = find_best_route(&registry, "pETH", "pSOL");

        assert_eq!(route.len(), 2);
        assert_eq!(route[0].id, "pETH-pUSDC");
        assert_eq!(route[1].id, "pSOL-pUSDC");
        assert_eq!(shared_token(&route[0], &route[1]), Some("pUSDC"));
    }

    #[test]
    fn test_routing_priority_order() {
        let mut cfg = RegistryConfig::default();
        cfg.routing_tokens = vec!["pBNB".to_string(), "pUSDC".to_string()];
        cfg.pools.push(Pool {
            id: "pETH-pBNB".to_string(),
            token_a: "pETH".to_string(),
            token_b: "pBNB".to_string(),
            address: "0x...".to_string(),
            fee: 0.001,
        });
        cfg.pools.push(Pool {
            id: "pBNB-pSOL".to_string(),
            token_a: "pBNB".to_string(),
            token_b: "pSOL".to_string(),
            address: "0x...".to_string(),
            fee: 0.001,
        });
        let registry = TokenRegistry::from_config(&cfg).unwrap();

        let route = find_best_route(&registry, "pETH", "pSOL");
        assert_eq!(shared_token(&route[0], &route[1]), Some("pBNB"));
    }

    #[test]
    fn test_unreachable_pair_gets_synthetic_pool() {
        let registry = TokenRegistry::default();
        let route = find_best_route(&registry, "pETH", "DOGE");

        assert_eq!(route.len(), 1);
        assert!(route[0].is_synthetic());
        assert_eq!(route[0].id, "pETH-DOGE");
        assert_eq!(route[0].fee, 0.003);
    }

    #[test]
    fn test_routing_token_endpoint_skipped() {
        let mut cfg = RegistryConfig::default();
        cfg.pools.retain(|p| p.id != "pSOL-pUSDC");
        let registry = TokenRegistry::from_config(&cfg).unwrap();

        // pUSDC is an endpoint, so it cannot act as the intermediate
        let route = find_best_route(&registry, "pSOL", "pUSDC");
        assert!(route[0].is_synthetic());
    }
}
