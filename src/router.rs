// ============================================================================
// Module : router
// ============================================================================
// La machine à états de navigation. Quatre routes, calquées sur des
// chemins : "/", "/:coinId", "/:coinId/chart", "/:coinId/price".
// Le parsing sert à l'entrée directe de chemin, le formatage aux logs
// et au titre de fenêtre.
// ============================================================================

/// Onglet de la vue détail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chart,
    Price,
}

impl Tab {
    /// Libellé affiché dans la barre d'onglets
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Chart => "Chart",
            Tab::Price => "Price",
        }
    }

    /// Segment de chemin correspondant
    pub fn segment(&self) -> &'static str {
        match self {
            Tab::Chart => "chart",
            Tab::Price => "price",
        }
    }
}

/// Route active de l'application
///
/// La vue détail rend toujours son en-tête et sa barre d'onglets ;
/// l'onglet (s'il y en a un) ne choisit que le corps imbriqué.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// "/" : liste des monnaies
    Coins,
    /// "/:coinId" et ses onglets : détail d'une monnaie
    Coin { id: String, tab: Option<Tab> },
}

impl Route {
    /// Parse un chemin saisi par l'utilisateur
    ///
    /// Accepte exactement les quatre formes de route, segments vides
    /// ignorés ("/btc-bitcoin/" vaut "/btc-bitcoin"). Tout le reste
    /// est rejeté.
    ///
    /// # Arguments
    /// * `path` - Chemin brut (ex: "/btc-bitcoin/chart")
    ///
    /// # Retourne
    /// * `Option<Route>` - La route, ou None si le chemin est invalide
    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        if !trimmed.starts_with('/') {
            return None;
        }

        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Coins),
            [id] => Some(Route::Coin {
                id: (*id).to_string(),
                tab: None,
            }),
            [id, "chart"] => Some(Route::Coin {
                id: (*id).to_string(),
                tab: Some(Tab::Chart),
            }),
            [id, "price"] => Some(Route::Coin {
                id: (*id).to_string(),
                tab: Some(Tab::Price),
            }),
            _ => None,
        }
    }

    /// Chemin canonique de la route
    pub fn path(&self) -> String {
        match self {
            Route::Coins => "/".to_string(),
            Route::Coin { id, tab: None } => format!("/{}", id),
            Route::Coin { id, tab: Some(tab) } => format!("/{}/{}", id, tab.segment()),
        }
    }

    /// Identifiant de monnaie porté par la route
    pub fn coin_id(&self) -> Option<&str> {
        match self {
            Route::Coins => None,
            Route::Coin { id, .. } => Some(id),
        }
    }

    /// Onglet actif de la vue détail
    pub fn tab(&self) -> Option<Tab> {
        match self {
            Route::Coins => None,
            Route::Coin { tab, .. } => *tab,
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
