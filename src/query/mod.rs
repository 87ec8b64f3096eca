// ============================================================================
// Module : query
// ============================================================================
// La couche de cache entre les écrans et l'API : clés, résultats typés
// et comptabilité des souscriptions/fetchs.
// ============================================================================

pub mod cache;   // Le cache et sa comptabilité
pub mod key;     // Clés de cache
pub mod payload; // Résultats typés

// Re-export des structures principales
pub use cache::{CacheStats, FetchRequest, QueryCache, QueryOptions, QueryState};
pub use key::QueryKey;
pub use payload::QueryPayload;
