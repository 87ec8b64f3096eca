// ============================================================================
// Structure : CoinSummary
// ============================================================================
// Une entrée de la liste des cryptomonnaies (endpoint /v1/coins)
// ============================================================================

use serde::{Deserialize, Serialize};

/// Base des icônes de cryptomonnaies (PNG par symbole en minuscules)
const ICON_BASE_URL: &str = "https://cryptoicon-api.pages.dev/api/icon";

/// URL de l'icône d'une monnaie, dérivée de son symbole en minuscules
pub fn icon_url(symbol: &str) -> String {
    format!("{}/{}", ICON_BASE_URL, symbol.to_lowercase())
}

/// Une cryptomonnaie telle que listée par l'API
///
/// Reçue telle quelle du serveur, sans transformation. Le champ `type`
/// est renommé car c'est un mot réservé en Rust.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSummary {
    /// Identifiant API (ex: "btc-bitcoin"), utilisé dans les chemins
    pub id: String,

    /// Nom complet (ex: "Bitcoin")
    pub name: String,

    /// Symbole boursier (ex: "BTC")
    pub symbol: String,

    /// Rang par capitalisation (0 pour les monnaies non classées)
    #[serde(default)]
    pub rank: i32,

    /// Monnaie récemment ajoutée à l'API
    #[serde(default)]
    pub is_new: bool,

    /// Monnaie encore active (certaines sont délistées)
    #[serde(default)]
    pub is_active: bool,

    /// Catégorie : "coin" ou "token"
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl CoinSummary {
    /// Chemin de route vers la vue détail de cette monnaie
    pub fn route_path(&self) -> String {
        format!("/{}", self.id)
    }

    /// URL de l'icône de cette monnaie
    pub fn icon_url(&self) -> String {
        icon_url(&self.symbol)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bitcoin_json() -> &'static str {
        r#"{
            "id": "btc-bitcoin",
            "name": "Bitcoin",
            "symbol": "BTC",
            "rank": 1,
            "is_new": false,
            "is_active": true,
            "type": "coin"
        }"#
    }

    #[test]
    fn test_deserialize_list_entry() {
        let coin: CoinSummary = serde_json::from_str(bitcoin_json()).unwrap();
        assert_eq!(coin.id, "btc-bitcoin");
        assert_eq!(coin.name, "Bitcoin");
        assert_eq!(coin.symbol, "BTC");
        assert_eq!(coin.rank, 1);
        assert!(!coin.is_new);
        assert!(coin.is_active);
        assert_eq!(coin.kind, "coin");
    }

    #[test]
    fn test_route_path_uses_id() {
        let coin: CoinSummary = serde_json::from_str(bitcoin_json()).unwrap();
        assert_eq!(coin.route_path(), "/btc-bitcoin");
    }

    #[test]
    fn test_icon_url_lowercases_symbol() {
        let coin: CoinSummary = serde_json::from_str(bitcoin_json()).unwrap();
        assert!(coin.icon_url().ends_with("/btc"));
        assert_eq!(
            coin.icon_url(),
            "https://cryptoicon-api.pages.dev/api/icon/btc"
        );
    }

    #[test]
    fn test_missing_optional_fields_default() {
        // Certaines entrées de la liste n'ont pas tous les champs
        let coin: CoinSummary =
            serde_json::from_str(r#"{"id": "x-test", "name": "Test", "symbol": "X"}"#).unwrap();
        assert_eq!(coin.rank, 0);
        assert!(!coin.is_active);
        assert_eq!(coin.kind, "");
    }
}
