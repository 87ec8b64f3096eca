// ============================================================================
// Structure : PricePoint
// ============================================================================
// Point OHLCV historique (endpoint /v1/coins/{id}/ohlcv/historical)
// L'API renvoie les prix et le volume en chaînes décimales, pas en nombres.
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Un point de l'historique des prix
///
/// Les points arrivent triés par temps croissant et sont affichés dans
/// cet ordre, sans ré-échantillonnage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    /// Ouverture de la période (secondes Unix)
    pub time_open: i64,

    /// Clôture de la période (secondes Unix)
    pub time_close: i64,

    /// Prix d'ouverture (chaîne décimale)
    pub open: String,

    /// Prix le plus haut (chaîne décimale)
    pub high: String,

    /// Prix le plus bas (chaîne décimale)
    pub low: String,

    /// Prix de clôture (chaîne décimale)
    pub close: String,

    /// Volume échangé (chaîne décimale)
    pub volume: String,

    /// Capitalisation à la clôture
    #[serde(default)]
    pub market_cap: f64,
}

impl PricePoint {
    /// Prix de clôture en f64, None si la chaîne est malformée
    pub fn close_price(&self) -> Option<f64> {
        self.close.parse().ok()
    }

    /// Instant de clôture en UTC
    pub fn close_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time_close, 0)
    }

    /// Libellé de clôture pour l'axe X (ex: "21 Mar 14:00")
    pub fn close_label(&self) -> String {
        match self.close_time() {
            Some(time) => time.format("%d %b %H:%M").to_string(),
            None => "?".to_string(),
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn point_json() -> &'static str {
        r#"{
            "time_open": 1710979200,
            "time_close": 1711065599,
            "open": "67000.123",
            "high": "68100.5",
            "low": "66500.0",
            "close": "67890.42",
            "volume": "35123456789",
            "market_cap": 1330000000000
        }"#
    }

    #[test]
    fn test_deserialize_point() {
        let point: PricePoint = serde_json::from_str(point_json()).unwrap();
        assert_eq!(point.time_close, 1711065599);
        assert_eq!(point.close, "67890.42");
        assert_eq!(point.market_cap, 1330000000000.0);
    }

    #[test]
    fn test_close_price_parses_string() {
        let point: PricePoint = serde_json::from_str(point_json()).unwrap();
        assert_eq!(point.close_price(), Some(67890.42));
    }

    #[test]
    fn test_close_price_malformed_is_none() {
        let mut point: PricePoint = serde_json::from_str(point_json()).unwrap();
        point.close = "not-a-number".to_string();
        assert_eq!(point.close_price(), None);
    }

    #[test]
    fn test_close_label_format() {
        let point: PricePoint = serde_json::from_str(point_json()).unwrap();
        // 1711065599 = 21 mars 2024, 23:59:59 UTC
        assert_eq!(point.close_label(), "21 Mar 23:59");
    }
}
