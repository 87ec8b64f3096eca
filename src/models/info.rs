// ============================================================================
// Structure : CoinInfo
// ============================================================================
// Fiche descriptive d'une cryptomonnaie (endpoint /v1/coins/{id})
// ============================================================================

use serde::{Deserialize, Serialize};

/// Métadonnées d'une cryptomonnaie
///
/// Beaucoup de champs sont `null` côté API pour les monnaies peu
/// documentées, d'où les Option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinInfo {
    /// Identifiant API (ex: "btc-bitcoin")
    pub id: String,

    /// Nom complet
    pub name: String,

    /// Symbole boursier
    pub symbol: String,

    /// Rang par capitalisation
    #[serde(default)]
    pub rank: i32,

    /// Catégorie : "coin" ou "token"
    #[serde(rename = "type", default)]
    pub kind: String,

    /// URL du logo officiel
    pub logo: Option<String>,

    /// Paragraphe de description
    pub description: Option<String>,

    /// Message d'avertissement de l'API (délistage, etc.)
    pub message: Option<String>,

    /// Code source ouvert
    #[serde(default)]
    pub open_source: bool,

    /// Supportée par des wallets matériels
    #[serde(default)]
    pub hardware_wallet: bool,

    /// Date de lancement (ISO 8601)
    pub started_at: Option<String>,

    /// État du développement (ex: "Working product")
    pub development_status: Option<String>,

    /// Type de preuve (ex: "Proof of Work")
    pub proof_type: Option<String>,

    /// Structure de l'organisation (ex: "Decentralized")
    pub org_structure: Option<String>,

    /// Algorithme de hachage (ex: "SHA256")
    pub hash_algorithm: Option<String>,

    /// Première donnée de marché connue
    pub first_data_at: Option<String>,

    /// Dernière donnée de marché connue
    pub last_data_at: Option<String>,

    /// Monnaie récemment ajoutée
    #[serde(default)]
    pub is_new: bool,

    /// Monnaie encore active
    #[serde(default)]
    pub is_active: bool,
}

impl CoinInfo {
    /// Description affichable, ou un texte neutre si l'API n'en a pas
    pub fn description_text(&self) -> &str {
        match self.description.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => "No description available.",
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
    fn test_deserialize_full_info() {
        let json = r#"{
            "id": "btc-bitcoin",
            "name": "Bitcoin",
            "symbol": "BTC",
            "rank": 1,
            "type": "coin",
            "logo": "https://static.coinpaprika.com/coin/btc-bitcoin/logo.png",
            "description": "Bitcoin is a cryptocurrency and worldwide payment system.",
            "message": "",
            "open_source": true,
            "hardware_wallet": true,
            "started_at": "2009-01-03T00:00:00Z",
            "development_status": "Working product",
            "proof_type": "Proof of Work",
            "org_structure": "Decentralized",
            "hash_algorithm": "SHA256",
            "first_data_at": "2010-07-17T00:00:00Z",
            "last_data_at": "2024-03-21T00:00:00Z",
            "is_new": false,
            "is_active": true
        }"#;

        let info: CoinInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.name, "Bitcoin");
        assert_eq!(info.rank, 1);
        assert!(info.open_source);
        assert_eq!(info.hash_algorithm.as_deref(), Some("SHA256"));
        assert!(info.description_text().starts_with("Bitcoin is"));
    }

    #[test]
    fn test_deserialize_sparse_info() {
        // Les monnaies obscures renvoient null presque partout
        let json = r#"{
            "id": "xyz-obscure",
            "name": "Obscure",
            "symbol": "XYZ",
            "rank": 0,
            "type": "token",
            "logo": null,
            "description": null,
            "message": null,
            "open_source": false,
            "hardware_wallet": false,
            "started_at": null,
            "development_status": null,
            "proof_type": null,
            "org_structure": null,
            "hash_algorithm": null,
            "first_data_at": null,
            "last_data_at": null,
            "is_new": true,
            "is_active": false
        }"#;

        let info: CoinInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.description, None);
        assert_eq!(info.description_text(), "No description available.");
        assert!(info.is_new);
    }
}
