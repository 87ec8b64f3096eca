// ============================================================================
// Structure : QueryPayload
// ============================================================================
// Le résultat d'un fetch, une variante par clé de cache. Les écrans
// récupèrent la variante qui les intéresse via les accesseurs as_*.
// ============================================================================

use crate::models::{CoinInfo, CoinSummary, CoinTicker, PricePoint};

/// Résultat typé d'une requête distante
#[derive(Debug, Clone)]
pub enum QueryPayload {
    /// Liste des monnaies (clé Coins)
    Coins(Vec<CoinSummary>),
    /// Fiche descriptive (clé Info)
    Info(Box<CoinInfo>),
    /// Cotation (clé Tickers)
    Tickers(Box<CoinTicker>),
    /// Historique OHLCV (clé History)
    History(Vec<PricePoint>),
}

impl QueryPayload {
    /// Liste des monnaies, None si la variante ne correspond pas
    pub fn as_coins(&self) -> Option<&[CoinSummary]> {
        match self {
            QueryPayload::Coins(coins) => Some(coins),
            _ => None,
        }
    }

    /// Fiche descriptive, None si la variante ne correspond pas
    pub fn as_info(&self) -> Option<&CoinInfo> {
        match self {
            QueryPayload::Info(info) => Some(info),
            _ => None,
        }
    }

    /// Cotation, None si la variante ne correspond pas
    pub fn as_tickers(&self) -> Option<&CoinTicker> {
        match self {
            QueryPayload::Tickers(ticker) => Some(ticker),
            _ => None,
        }
    }

    /// Historique OHLCV, None si la variante ne correspond pas
    pub fn as_history(&self) -> Option<&[PricePoint]> {
        match self {
            QueryPayload::History(points) => Some(points),
            _ => None,
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
    fn test_accessor_matches_variant() {
        let payload = QueryPayload::Coins(Vec::new());
        assert!(payload.as_coins().is_some());
        assert!(payload.as_info().is_none());
        assert!(payload.as_tickers().is_none());
        assert!(payload.as_history().is_none());
    }

    #[test]
    fn test_history_accessor_preserves_order() {
        let points = vec![
            sample_point(100, "1.0"),
            sample_point(200, "2.0"),
            sample_point(300, "3.0"),
        ];
        let payload = QueryPayload::History(points);
        let history = payload.as_history().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].time_close, 100);
        assert_eq!(history[2].close, "3.0");
    }

    fn sample_point(time_close: i64, close: &str) -> PricePoint {
        PricePoint {
            time_open: time_close - 60,
            time_close,
            open: close.to_string(),
            high: close.to_string(),
            low: close.to_string(),
            close: close.to_string(),
            volume: "0".to_string(),
            market_cap: 0.0,
        }
    }
}
