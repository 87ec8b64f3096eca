// ============================================================================
// Structure : CoinTicker
// ============================================================================
// Cotation temps réel d'une cryptomonnaie (endpoint /v1/tickers/{id})
// La quote USD est imbriquée sous `quotes.USD` côté API.
// ============================================================================

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Cotation d'une cryptomonnaie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinTicker {
    /// Identifiant API (ex: "btc-bitcoin")
    pub id: String,

    /// Nom complet
    pub name: String,

    /// Symbole boursier
    pub symbol: String,

    /// Rang par capitalisation
    #[serde(default)]
    pub rank: i32,

    /// Unités en circulation
    #[serde(default)]
    pub total_supply: i64,

    /// Plafond d'émission (0 si aucun)
    #[serde(default)]
    pub max_supply: i64,

    /// Volatilité relative au marché
    #[serde(default)]
    pub beta_value: f64,

    /// Première donnée de marché connue
    pub first_data_at: Option<String>,

    /// Horodatage de la cotation
    pub last_updated: Option<String>,

    /// Quotes par devise (seule USD est demandée)
    pub quotes: Quotes,
}

/// Conteneur des quotes par devise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotes {
    #[serde(rename = "USD")]
    pub usd: UsdQuote,
}

/// Quote en dollars US
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsdQuote {
    /// Prix actuel
    pub price: f64,

    /// Volume échangé sur 24h
    #[serde(default)]
    pub volume_24h: f64,

    /// Variation du volume 24h
    #[serde(default)]
    pub volume_24h_change_24h: f64,

    /// Capitalisation
    #[serde(default)]
    pub market_cap: f64,

    /// Variations de prix en pourcentage, par horizon
    #[serde(default)]
    pub percent_change_15m: f64,
    #[serde(default)]
    pub percent_change_30m: f64,
    #[serde(default)]
    pub percent_change_1h: f64,
    #[serde(default)]
    pub percent_change_6h: f64,
    #[serde(default)]
    pub percent_change_12h: f64,
    #[serde(default)]
    pub percent_change_24h: f64,
    #[serde(default)]
    pub percent_change_7d: f64,
    #[serde(default)]
    pub percent_change_30d: f64,
    #[serde(default)]
    pub percent_change_1y: f64,

    /// Plus haut historique
    pub ath_price: Option<f64>,

    /// Date du plus haut historique (ISO 8601)
    pub ath_date: Option<String>,

    /// Écart au plus haut historique (négatif)
    pub percent_from_price_ath: Option<f64>,
}

impl CoinTicker {
    /// Raccourci vers la quote USD
    pub fn usd(&self) -> &UsdQuote {
        &self.quotes.usd
    }
}

impl UsdQuote {
    /// Prix formaté en dollars, avec plus de décimales sous 1$
    pub fn price_label(&self) -> String {
        format_usd(self.price)
    }

    /// Variations par horizon, dans l'ordre d'affichage
    pub fn change_rows(&self) -> [(&'static str, f64); 9] {
        [
            ("15m", self.percent_change_15m),
            ("30m", self.percent_change_30m),
            ("1h", self.percent_change_1h),
            ("6h", self.percent_change_6h),
            ("12h", self.percent_change_12h),
            ("24h", self.percent_change_24h),
            ("7d", self.percent_change_7d),
            ("30d", self.percent_change_30d),
            ("1y", self.percent_change_1y),
        ]
    }

    /// Date du plus haut historique au format court (ex: "10 Nov 2021")
    pub fn ath_date_label(&self) -> Option<String> {
        let raw = self.ath_date.as_deref()?;
        let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
        Some(parsed.format("%d %b %Y").to_string())
    }
}

/// Formate un montant en dollars, précision adaptée à l'ordre de grandeur
pub fn format_usd(value: f64) -> String {
    if value != 0.0 && value.abs() < 1.0 {
        format!("${:.6}", value)
    } else {
        format!("${:.2}", value)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker_json() -> &'static str {
        r#"{
            "id": "btc-bitcoin",
            "name": "Bitcoin",
            "symbol": "BTC",
            "rank": 1,
            "total_supply": 19600000,
            "max_supply": 21000000,
            "beta_value": 0.92,
            "first_data_at": "2010-07-17T00:00:00Z",
            "last_updated": "2024-03-21T12:00:00Z",
            "quotes": {
                "USD": {
                    "price": 67234.51,
                    "volume_24h": 35000000000.0,
                    "volume_24h_change_24h": -3.1,
                    "market_cap": 1318000000000,
                    "percent_change_15m": 0.02,
                    "percent_change_30m": 0.05,
                    "percent_change_1h": -0.12,
                    "percent_change_6h": 0.8,
                    "percent_change_12h": 1.4,
                    "percent_change_24h": 2.3,
                    "percent_change_7d": -1.7,
                    "percent_change_30d": 12.5,
                    "percent_change_1y": 140.2,
                    "ath_price": 69000.0,
                    "ath_date": "2021-11-10T14:17:00Z",
                    "percent_from_price_ath": -2.56
                }
            }
        }"#
    }

    #[test]
    fn test_deserialize_ticker() {
        let ticker: CoinTicker = serde_json::from_str(ticker_json()).unwrap();
        assert_eq!(ticker.id, "btc-bitcoin");
        assert_eq!(ticker.max_supply, 21000000);
        assert_eq!(ticker.usd().price, 67234.51);
        assert_eq!(ticker.usd().percent_change_24h, 2.3);
        assert_eq!(ticker.usd().ath_price, Some(69000.0));
    }

    #[test]
    fn test_change_rows_order() {
        let ticker: CoinTicker = serde_json::from_str(ticker_json()).unwrap();
        let rows = ticker.usd().change_rows();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0], ("15m", 0.02));
        assert_eq!(rows[8], ("1y", 140.2));
    }

    #[test]
    fn test_ath_date_label() {
        let ticker: CoinTicker = serde_json::from_str(ticker_json()).unwrap();
        assert_eq!(ticker.usd().ath_date_label().as_deref(), Some("10 Nov 2021"));
    }

    #[test]
    fn test_format_usd_precision() {
        assert_eq!(format_usd(67234.51), "$67234.51");
        assert_eq!(format_usd(0.004217), "$0.004217");
        assert_eq!(format_usd(0.0), "$0.00");
    }
}
