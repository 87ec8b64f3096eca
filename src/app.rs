// ============================================================================
// Structure : App
// ============================================================================
// L'état global de l'application TUI : route courante, sélection de la
// liste, thème, cache de requêtes et clés souscrites.
//
// Toute navigation passe par navigate() : c'est elle qui aligne les
// souscriptions du cache sur les besoins de la route (acquire des
// nouvelles clés, release des clés quittées). Les FetchRequest émis
// sont renvoyés à l'appelant, qui les transmet au worker.
// ============================================================================

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::models::CoinSummary;
use crate::query::{FetchRequest, QueryCache, QueryKey, QueryOptions, QueryState};
use crate::router::{Route, Tab};
use crate::theme::ThemeState;

/// Période de refetch des cotations et de l'historique
pub const REFETCH_INTERVAL: Duration = Duration::from_millis(10_000);

/// Nombre maximal de monnaies affichées dans la liste
pub const COIN_LIST_LIMIT: usize = 100;

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Route active (machine à états de navigation)
    pub route: Route,

    /// Indice sélectionné dans la liste des monnaies
    pub selected_index: usize,

    /// Nom transmis par le lien suivi depuis la liste, absent en cas
    /// d'entrée directe de chemin. En mémoire seulement, pas dans le
    /// chemin.
    pub name_hint: Option<String>,

    /// Thème clair/sombre
    pub theme: ThemeState,

    /// Cache des requêtes distantes
    pub cache: QueryCache,

    /// Clés souscrites pour la route courante
    mounted: Vec<QueryKey>,

    /// Première pression de 'q' reçue, en attente de confirmation
    pub confirm_quit: bool,

    /// Buffer du prompt "go to" (None : prompt fermé)
    pub goto_buffer: Option<String>,

    /// Message de statut (ex: chemin rejeté)
    pub status_message: Option<String>,
}

impl App {
    /// Crée l'application sur la liste des monnaies
    ///
    /// Aucune clé n'est encore souscrite : l'appelant doit faire le
    /// premier navigate() et transmettre les fetchs émis au worker.
    pub fn new() -> Self {
        Self {
            running: true,
            route: Route::Coins,
            selected_index: 0,
            name_hint: None,
            theme: ThemeState::new(),
            cache: QueryCache::new(),
            mounted: Vec::new(),
            confirm_quit: false,
            goto_buffer: None,
            status_message: None,
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Change de route et aligne les souscriptions du cache
    ///
    /// # Arguments
    /// * `route` - Route de destination
    /// * `name_hint` - Nom affichable transmis par le lien, s'il y en a un
    ///
    /// # Retourne
    /// * `Vec<FetchRequest>` - Les fetchs émis par les nouvelles clés
    pub fn navigate(&mut self, route: Route, name_hint: Option<String>) -> Vec<FetchRequest> {
        info!(path = %route.path(), "Navigating");
        self.route = route;
        self.name_hint = name_hint;
        self.status_message = None;
        self.sync_queries()
    }

    /// Ouvre la monnaie sélectionnée dans la liste
    ///
    /// Équivaut à suivre le lien de la ligne : la route porte l'id, le
    /// nom part en name_hint.
    pub fn open_selected(&mut self) -> Vec<FetchRequest> {
        let Some((id, name)) = self
            .selected_coin()
            .map(|coin| (coin.id.clone(), coin.name.clone()))
        else {
            return Vec::new();
        };

        self.navigate(Route::Coin { id, tab: None }, Some(name))
    }

    /// Active l'onglet graphique de la vue détail
    pub fn show_chart_tab(&mut self) -> Vec<FetchRequest> {
        self.switch_tab(Some(Tab::Chart))
    }

    /// Active l'onglet prix de la vue détail
    pub fn show_price_tab(&mut self) -> Vec<FetchRequest> {
        self.switch_tab(Some(Tab::Price))
    }

    /// Retourne à la liste des monnaies
    pub fn back_to_coins(&mut self) -> Vec<FetchRequest> {
        self.navigate(Route::Coins, None)
    }

    /// Change d'onglet sans perdre le name_hint de la vue détail
    fn switch_tab(&mut self, tab: Option<Tab>) -> Vec<FetchRequest> {
        let Route::Coin { id, .. } = &self.route else {
            return Vec::new();
        };
        let id = id.clone();
        let hint = self.name_hint.clone();
        self.navigate(Route::Coin { id, tab }, hint)
    }

    /// Clés de cache requises par une route, avec leurs options
    ///
    /// La vue détail souscrit fiche + cotation quel que soit l'onglet ;
    /// l'onglet graphique ajoute l'historique. L'onglet prix réutilise
    /// la cotation déjà souscrite par le parent, il n'ajoute rien.
    fn required_queries(route: &Route) -> Vec<(QueryKey, QueryOptions)> {
        match route {
            Route::Coins => vec![(QueryKey::Coins, QueryOptions::default())],
            Route::Coin { id, tab } => {
                let mut queries = vec![
                    (QueryKey::Info(id.clone()), QueryOptions::default()),
                    (
                        QueryKey::Tickers(id.clone()),
                        QueryOptions::with_interval(REFETCH_INTERVAL),
                    ),
                ];
                if *tab == Some(Tab::Chart) {
                    queries.push((
                        QueryKey::History(id.clone()),
                        QueryOptions::with_interval(REFETCH_INTERVAL),
                    ));
                }
                queries
            }
        }
    }

    /// Aligne les souscriptions sur la route courante
    ///
    /// Les clés quittées sont release (le nettoyage est garanti ici,
    /// pas dans les vues), les clés entrantes sont acquire. Les clés
    /// conservées gardent leur souscription : changer d'onglet ne
    /// relance pas les requêtes du parent.
    fn sync_queries(&mut self) -> Vec<FetchRequest> {
        let needed = Self::required_queries(&self.route);
        let needed_keys: Vec<QueryKey> = needed.iter().map(|(key, _)| key.clone()).collect();
        let previous = std::mem::take(&mut self.mounted);

        for key in &previous {
            if !needed_keys.contains(key) {
                debug!(%key, "Releasing query");
                self.cache.release(key);
            }
        }

        let mut requests = Vec::new();
        for (key, options) in needed {
            if !previous.contains(&key) {
                if let Some(request) = self.cache.acquire(key, options) {
                    requests.push(request);
                }
            }
        }

        self.mounted = needed_keys;
        requests
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// Fait avancer les refetchs périodiques du cache.
    pub fn tick(&mut self, now: Instant) -> Vec<FetchRequest> {
        self.cache.poll_due(now)
    }

    // ========================================================================
    // Liste des monnaies
    // ========================================================================

    /// Monnaies visibles dans la liste (les 100 premières)
    pub fn visible_coins(&self) -> &[CoinSummary] {
        match self.cache.state(&QueryKey::Coins) {
            QueryState::Success(payload) => {
                let coins = payload.as_coins().unwrap_or(&[]);
                &coins[..coins.len().min(COIN_LIST_LIMIT)]
            }
            _ => &[],
        }
    }

    /// Monnaie sélectionnée dans la liste
    pub fn selected_coin(&self) -> Option<&CoinSummary> {
        self.visible_coins().get(self.selected_index)
    }

    /// Navigue vers le haut dans la liste
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans la liste, bornée au dernier visible
    pub fn navigate_down(&mut self) {
        let max_index = self.visible_coins().len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    // ========================================================================
    // Titre de fenêtre
    // ========================================================================

    /// Titre de la fenêtre pour la route courante
    ///
    /// Vue détail : name_hint du lien suivi, sinon le nom de la fiche
    /// chargée, sinon "Loading...".
    pub fn window_title(&self) -> String {
        match &self.route {
            Route::Coins => "Coins".to_string(),
            Route::Coin { id, .. } => {
                if let Some(hint) = &self.name_hint {
                    return hint.clone();
                }
                match self.cache.state(&QueryKey::Info(id.clone())) {
                    QueryState::Success(payload) => payload
                        .as_info()
                        .map(|info| info.name.clone())
                        .unwrap_or_else(|| "Loading...".to_string()),
                    _ => "Loading...".to_string(),
                }
            }
        }
    }

    // ========================================================================
    // Cycle de vie
    // ========================================================================

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Première pression de 'q' : attend la confirmation
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Prompt "go to" : entrée directe de chemin
    // ========================================================================

    /// Ouvre le prompt de chemin
    pub fn start_goto(&mut self) {
        self.goto_buffer = Some(String::new());
    }

    /// Ferme le prompt sans naviguer
    pub fn cancel_goto(&mut self) {
        self.goto_buffer = None;
    }

    /// Vérifie si le prompt de chemin est ouvert
    pub fn is_in_goto_mode(&self) -> bool {
        self.goto_buffer.is_some()
    }

    /// Ajoute un caractère au buffer du prompt
    pub fn goto_append(&mut self, c: char) {
        if let Some(buffer) = &mut self.goto_buffer {
            buffer.push(c);
        }
    }

    /// Supprime le dernier caractère du buffer du prompt
    pub fn goto_backspace(&mut self) {
        if let Some(buffer) = &mut self.goto_buffer {
            buffer.pop();
        }
    }

    /// Valide le prompt : navigue si le chemin est une route valide
    ///
    /// L'entrée directe ne porte pas de name_hint. Un chemin invalide
    /// laisse la route en place et pose un message de statut.
    pub fn submit_goto(&mut self) -> Vec<FetchRequest> {
        let Some(raw) = self.goto_buffer.take() else {
            return Vec::new();
        };

        let path = raw.trim().to_string();
        match Route::parse(&path) {
            Some(route) => self.navigate(route, None),
            None => {
                warn!(path = %path, "Rejected invalid path");
                self.status_message = Some(format!("Invalid path: {}", path));
                Vec::new()
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryPayload;

    fn coin(id: &str, name: &str) -> CoinSummary {
        CoinSummary {
            id: id.to_string(),
            name: name.to_string(),
            symbol: id.split('-').next().unwrap_or("x").to_uppercase(),
            rank: 1,
            is_new: false,
            is_active: true,
            kind: "coin".to_string(),
        }
    }

    /// Monte la liste et commit un payload de monnaies
    fn app_with_coins(coins: Vec<CoinSummary>) -> App {
        let mut app = App::new();
        let requests = app.navigate(Route::Coins, None);
        assert_eq!(requests.len(), 1);
        app.cache.commit(
            &QueryKey::Coins,
            requests[0].seq,
            Ok(QueryPayload::Coins(coins)),
            Instant::now(),
        );
        app
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert_eq!(app.route, Route::Coins);
        assert!(!app.theme.read());
        assert!(app.visible_coins().is_empty());
    }

    #[test]
    fn test_detail_navigation_fetches_info_and_tickers_once() {
        let mut app = App::new();
        let requests = app.navigate(
            Route::Coin {
                id: "btc-bitcoin".to_string(),
                tab: None,
            },
            Some("Bitcoin".to_string()),
        );

        let keys: Vec<&QueryKey> = requests.iter().map(|r| &r.key).collect();
        assert_eq!(requests.len(), 2);
        assert!(keys.contains(&&QueryKey::Info("btc-bitcoin".to_string())));
        assert!(keys.contains(&&QueryKey::Tickers("btc-bitcoin".to_string())));
    }

    #[test]
    fn test_tab_switch_does_not_refetch_parent_queries() {
        let mut app = App::new();
        app.navigate(
            Route::Coin {
                id: "btc-bitcoin".to_string(),
                tab: None,
            },
            Some("Bitcoin".to_string()),
        );

        // L'onglet graphique n'ajoute que l'historique
        let requests = app.show_chart_tab();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].key, QueryKey::History("btc-bitcoin".to_string()));

        // Le name_hint du lien suivi survit au changement d'onglet
        assert_eq!(app.name_hint.as_deref(), Some("Bitcoin"));

        // L'onglet prix n'ajoute rien et relâche l'historique
        let requests = app.show_price_tab();
        assert!(requests.is_empty());
        assert_eq!(
            app.cache
                .subscribers(&QueryKey::History("btc-bitcoin".to_string())),
            0
        );

        // Fiche et cotation sont restées souscrites tout du long
        assert_eq!(
            app.cache
                .subscribers(&QueryKey::Info("btc-bitcoin".to_string())),
            1
        );
        assert_eq!(
            app.cache
                .subscribers(&QueryKey::Tickers("btc-bitcoin".to_string())),
            1
        );
    }

    #[test]
    fn test_back_to_list_releases_detail_queries() {
        let mut app = App::new();
        app.navigate(
            Route::Coin {
                id: "btc-bitcoin".to_string(),
                tab: Some(Tab::Chart),
            },
            None,
        );
        app.back_to_coins();

        assert_eq!(
            app.cache
                .subscribers(&QueryKey::Info("btc-bitcoin".to_string())),
            0
        );
        assert_eq!(
            app.cache
                .subscribers(&QueryKey::Tickers("btc-bitcoin".to_string())),
            0
        );
        assert_eq!(
            app.cache
                .subscribers(&QueryKey::History("btc-bitcoin".to_string())),
            0
        );
        assert_eq!(app.cache.subscribers(&QueryKey::Coins), 1);
    }

    #[test]
    fn test_ticker_query_carries_refetch_interval() {
        let mut app = App::new();
        let requests = app.navigate(
            Route::Coin {
                id: "btc-bitcoin".to_string(),
                tab: None,
            },
            None,
        );

        let t0 = Instant::now();
        for request in &requests {
            app.cache
                .commit(&request.key, request.seq, Ok(dummy_payload(&request.key)), t0);
        }

        // Seule la cotation repart à l'échéance, pas la fiche
        let due = app.tick(t0 + REFETCH_INTERVAL);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].key, QueryKey::Tickers("btc-bitcoin".to_string()));
    }

    #[test]
    fn test_open_selected_navigates_with_name_hint() {
        let mut app = app_with_coins(vec![
            coin("btc-bitcoin", "Bitcoin"),
            coin("eth-ethereum", "Ethereum"),
        ]);

        app.navigate_down();
        let requests = app.open_selected();

        assert_eq!(
            app.route,
            Route::Coin {
                id: "eth-ethereum".to_string(),
                tab: None,
            }
        );
        assert_eq!(app.name_hint.as_deref(), Some("Ethereum"));
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn test_navigation_is_bounded_by_visible_list() {
        let mut app = app_with_coins(vec![
            coin("btc-bitcoin", "Bitcoin"),
            coin("eth-ethereum", "Ethereum"),
            coin("usdt-tether", "Tether"),
        ]);

        for _ in 0..10 {
            app.navigate_down();
        }
        assert_eq!(app.selected_index, 2);

        for _ in 0..10 {
            app.navigate_up();
        }
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_visible_coins_truncated_to_limit() {
        let coins: Vec<CoinSummary> = (0..250)
            .map(|i| coin(&format!("c{}-coin", i), &format!("Coin {}", i)))
            .collect();
        let app = app_with_coins(coins);

        assert_eq!(app.visible_coins().len(), COIN_LIST_LIMIT);
    }

    #[test]
    fn test_goto_valid_path_navigates_without_hint() {
        let mut app = App::new();
        app.start_goto();
        for c in "/eth-ethereum/chart".chars() {
            app.goto_append(c);
        }
        let requests = app.submit_goto();

        assert_eq!(
            app.route,
            Route::Coin {
                id: "eth-ethereum".to_string(),
                tab: Some(Tab::Chart),
            }
        );
        assert_eq!(app.name_hint, None);
        assert_eq!(requests.len(), 3);
        assert!(!app.is_in_goto_mode());
    }

    #[test]
    fn test_goto_invalid_path_is_rejected() {
        let mut app = App::new();
        let initial_route = app.route.clone();

        app.start_goto();
        for c in "/a/b/c".chars() {
            app.goto_append(c);
        }
        let requests = app.submit_goto();

        assert!(requests.is_empty());
        assert_eq!(app.route, initial_route);
        assert!(app.status_message.as_deref().unwrap().contains("/a/b/c"));
    }

    #[test]
    fn test_window_title_prefers_name_hint() {
        let mut app = App::new();
        assert_eq!(app.window_title(), "Coins");

        app.navigate(
            Route::Coin {
                id: "btc-bitcoin".to_string(),
                tab: None,
            },
            Some("Bitcoin".to_string()),
        );
        assert_eq!(app.window_title(), "Bitcoin");

        // Sans hint (entrée directe), affiche Loading... avant la fiche
        app.back_to_coins();
        app.navigate(
            Route::Coin {
                id: "btc-bitcoin".to_string(),
                tab: None,
            },
            None,
        );
        assert_eq!(app.window_title(), "Loading...");
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::new();
        assert!(!app.is_awaiting_quit_confirmation());

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_running());

        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }

    /// Payload factice de la bonne variante pour une clé
    fn dummy_payload(key: &QueryKey) -> QueryPayload {
        match key {
            QueryKey::Coins => QueryPayload::Coins(Vec::new()),
            QueryKey::Info(id) => {
                let json = format!(
                    r#"{{"id": "{id}", "name": "X", "symbol": "X", "rank": 1, "type": "coin",
                        "logo": null, "description": null, "message": null,
                        "open_source": false, "hardware_wallet": false, "started_at": null,
                        "development_status": null, "proof_type": null, "org_structure": null,
                        "hash_algorithm": null, "first_data_at": null, "last_data_at": null,
                        "is_new": false, "is_active": true}}"#
                );
                QueryPayload::Info(Box::new(serde_json::from_str(&json).unwrap()))
            }
            QueryKey::Tickers(id) => {
                let json = format!(
                    r#"{{"id": "{id}", "name": "X", "symbol": "X", "rank": 1,
                        "total_supply": 0, "max_supply": 0, "beta_value": 0.0,
                        "first_data_at": null, "last_updated": null,
                        "quotes": {{"USD": {{"price": 1.0, "volume_24h": 0.0,
                        "volume_24h_change_24h": 0.0, "market_cap": 0.0,
                        "percent_change_15m": 0.0, "percent_change_30m": 0.0,
                        "percent_change_1h": 0.0, "percent_change_6h": 0.0,
                        "percent_change_12h": 0.0, "percent_change_24h": 0.0,
                        "percent_change_7d": 0.0, "percent_change_30d": 0.0,
                        "percent_change_1y": 0.0, "ath_price": null, "ath_date": null,
                        "percent_from_price_ath": null}}}}}}"#
                );
                QueryPayload::Tickers(Box::new(serde_json::from_str(&json).unwrap()))
            }
            QueryKey::History(_) => QueryPayload::History(Vec::new()),
        }
    }
}
