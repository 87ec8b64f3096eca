// ============================================================================
// Module : api
// ============================================================================
// La passerelle de données distantes : un client par fournisseur.
// Coinpaprika est le seul fournisseur pour l'instant.
// ============================================================================

pub mod paprika; // Client API Coinpaprika

// Re-export des fonctions principales
pub use paprika::{fetch_coin_history, fetch_coin_info, fetch_coin_tickers, fetch_coins};
