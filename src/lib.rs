// ============================================================================
// LazyCoins - Library
// ============================================================================
// Expose les modules publics pour les tests d'intégration
// ============================================================================

pub mod api;    // API Coinpaprika
pub mod app;    // État de l'application
pub mod models; // Structures de données
pub mod query;  // Cache de requêtes distantes
pub mod router; // Routes et onglets
pub mod theme;  // Thème clair/sombre
pub mod ui;     // Interface utilisateur
