// ============================================================================
// Module : models
// ============================================================================
// Les entités reçues de l'API Coinpaprika, une par fichier
// ============================================================================

pub mod coin;    // Entrée de la liste des monnaies
pub mod history; // Point OHLCV historique
pub mod info;    // Fiche descriptive d'une monnaie
pub mod ticker;  // Cotation temps réel

// Re-export des structures principales pour simplifier les imports
pub use coin::CoinSummary;
pub use history::PricePoint;
pub use info::CoinInfo;
pub use ticker::{format_usd, CoinTicker, UsdQuote};
