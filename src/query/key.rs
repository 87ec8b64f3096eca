// ============================================================================
// Structure : QueryKey
// ============================================================================
// Identifie une requête distante dans le cache. Deux clés égales
// partagent la même entrée, le même fetch en vol et le même résultat.
// ============================================================================

use std::fmt;

/// Clé de cache d'une requête distante
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Liste complète des monnaies
    Coins,
    /// Fiche descriptive d'une monnaie
    Info(String),
    /// Cotation d'une monnaie
    Tickers(String),
    /// Historique OHLCV d'une monnaie
    History(String),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Coins => write!(f, "coins"),
            QueryKey::Info(id) => write!(f, "info:{}", id),
            QueryKey::Tickers(id) => write!(f, "tickers:{}", id),
            QueryKey::History(id) => write!(f, "history:{}", id),
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_same_key() {
        let a = QueryKey::Info("btc-bitcoin".to_string());
        let b = QueryKey::Info("btc-bitcoin".to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_kind_different_key() {
        let info = QueryKey::Info("btc-bitcoin".to_string());
        let tickers = QueryKey::Tickers("btc-bitcoin".to_string());
        assert_ne!(info, tickers);
    }

    #[test]
    fn test_display_for_logs() {
        assert_eq!(QueryKey::Coins.to_string(), "coins");
        assert_eq!(
            QueryKey::History("eth-ethereum".to_string()).to_string(),
            "history:eth-ethereum"
        );
    }
}
