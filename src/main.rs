// ============================================================================
// LazyCoins - Suivi de cryptomonnaies dans le terminal
// ============================================================================
// Programme TUI : liste des monnaies Coinpaprika, vue détail avec
// onglets graphique et cotation, navigation par chemins
//
// Les fetchs HTTP tournent dans un worker thread : l'event loop envoie
// des FetchRequest estampillés par le cache, le worker renvoie des
// FetchOutcome que la boucle committe.
// ============================================================================

use std::io;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use lazycoins::api::paprika::fetch_payload;
use lazycoins::app::App;
use lazycoins::query::{FetchRequest, QueryKey, QueryPayload};
use lazycoins::router::Route;
use lazycoins::ui::{events::EventHandler, render};

/// Résultat d'un fetch exécuté par le worker
///
/// Porte la clé et le numéro de séquence du FetchRequest d'origine :
/// le cache s'en sert pour jeter les livraisons périmées.
#[derive(Debug)]
struct FetchOutcome {
    key: QueryKey,
    seq: u64,
    result: Result<QueryPayload, String>,
}

// ============================================================================
// Initialisation du logging
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - Linux/WSL : ~/.local/share/lazycoins/logs/lazycoins.log
/// - macOS : ~/Library/Application Support/lazycoins/logs/lazycoins.log
/// - Windows : C:\Users\<user>\AppData\Local\lazycoins\logs\lazycoins.log
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazycoins/logs/lazycoins.log
///
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=lazycoins=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("lazycoins").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("./logs"));

    // Crée le répertoire s'il n'existe pas
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // Rotation quotidienne : lazycoins.log.2026-08-25, etc.
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazycoins.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: lazycoins::api::paprika)
                .with_thread_ids(true) // Inclut l'ID du thread (utile pour le worker)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazycoins, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazycoins=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Logging d'abord : si init échoue, on continue sans
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    println!("LazyCoins starting up");
    info!("LazyCoins starting up");

    // Setup du terminal en mode TUI
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new();

    // Trace les bascules de thème dans les logs
    app.theme.subscribe(|dark| info!(dark, "Theme changed"));

    // Channels vers et depuis le worker
    let (command_tx, command_rx) = mpsc::channel::<FetchRequest>();
    let (result_tx, result_rx) = mpsc::channel::<FetchOutcome>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx);

    // Première navigation : monte la liste et émet le fetch initial
    let initial = app.navigate(Route::Coins, None);
    send_requests(&command_tx, initial);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================

/// Worker thread qui exécute les fetchs HTTP en arrière-plan
///
/// Un runtime tokio vit dans ce thread : chaque FetchRequest reçu est
/// exécuté avec block_on, puis le FetchOutcome repart vers l'event
/// loop. Le worker ne touche jamais à l'état de l'application.
///
/// # Arguments
/// * `command_rx` - Receiver des fetchs à exécuter
/// * `result_tx` - Sender des résultats
fn spawn_background_worker(
    command_rx: mpsc::Receiver<FetchRequest>,
    result_tx: mpsc::Sender<FetchOutcome>,
) {
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

        loop {
            match command_rx.recv() {
                Ok(request) => {
                    info!(key = %request.key, seq = request.seq, "Worker received fetch");

                    // block_on bloque le worker, pas l'UI
                    let result = runtime.block_on(fetch_payload(&request.key));

                    match &result {
                        Ok(_) => {
                            info!(key = %request.key, seq = request.seq, "Fetch succeeded");
                        }
                        Err(e) => {
                            error!(key = %request.key, seq = request.seq, error = ?e, "Fetch failed");
                        }
                    }

                    let FetchRequest { key, seq } = request;
                    let _ = result_tx.send(FetchOutcome {
                        key,
                        seq,
                        result: result.map_err(|e| e.to_string()),
                    });
                }
                Err(_) => {
                    // Channel fermé, on quitte
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================

/// Exécute la boucle principale de l'application
///
/// À chaque itération : committe les résultats du worker, synchronise
/// le titre de la fenêtre, dessine, traite l'entrée clavier, puis
/// émet les refetchs périodiques arrivés à échéance.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: mpsc::Sender<FetchRequest>,
    result_rx: mpsc::Receiver<FetchOutcome>,
) -> Result<()> {
    let mut last_title = String::new();

    loop {
        if !app.is_running() {
            break;
        }

        // ========================================
        // 0. RÉSULTATS : commit des fetchs terminés
        // ========================================
        loop {
            match result_rx.try_recv() {
                Ok(outcome) => {
                    let FetchOutcome { key, seq, result } = outcome;
                    app.cache.commit(&key, seq, result, Instant::now());
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker thread disconnected!");
                    break;
                }
            }
        }

        // Titre de la fenêtre : nom de la route courante
        let title = app.window_title();
        if title != last_title {
            debug!(title = %title, "Window title updated");
            execute!(terminal.backend_mut(), SetTitle(title.as_str()))?;
            last_title = title;
        }

        // ========================================
        // 1. RENDER : Dessine l'interface
        // ========================================
        terminal.draw(|frame| render(frame, app))?;

        // ========================================
        // 2. INPUT : Traite les événements
        // ========================================
        match events.next() {
            Ok(event) => handle_event(app, event, &command_tx),
            Err(_) => {
                // Erreur lors de la lecture d'événement
            }
        }

        // ========================================
        // 3. UPDATE : refetchs périodiques
        // ========================================
        let due = app.tick(Instant::now());
        send_requests(&command_tx, due);
    }

    Ok(())
}

/// Envoie des fetchs au worker
fn send_requests(command_tx: &mpsc::Sender<FetchRequest>, requests: Vec<FetchRequest>) {
    for request in requests {
        debug!(key = %request.key, seq = request.seq, "Dispatching fetch to worker");
        let _ = command_tx.send(request);
    }
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// Le prompt "go to" capte toutes les touches tant qu'il est ouvert.
/// Le reste est contextuel à la route courante.
fn handle_event(app: &mut App, event: lazycoins::ui::events::Event, command_tx: &mpsc::Sender<FetchRequest>) {
    use lazycoins::ui::events::{
        get_char_from_event, is_backspace_event, is_chart_tab_event, is_down_event,
        is_enter_event, is_escape_event, is_goto_event, is_path_char_event, is_price_tab_event,
        is_quit_event, is_theme_event, is_up_event, Event,
    };

    match event {
        // ========================================
        // Mode "go to" : saisie d'un chemin
        // ========================================
        Event::Key(_) if is_escape_event(&event) && app.is_in_goto_mode() => {
            info!("User cancelled goto prompt");
            app.cancel_goto();
        }

        Event::Key(_) if is_enter_event(&event) && app.is_in_goto_mode() => {
            let requests = app.submit_goto();
            send_requests(command_tx, requests);
        }

        Event::Key(_) if is_backspace_event(&event) && app.is_in_goto_mode() => {
            app.goto_backspace();
        }

        Event::Key(_) if is_path_char_event(&event) && app.is_in_goto_mode() => {
            if let Some(c) = get_char_from_event(&event) {
                app.goto_append(c);
            }
        }

        // Les autres touches sont ignorées pendant la saisie
        Event::Key(_) if app.is_in_goto_mode() => {}

        // ========================================
        // Touches globales
        // ========================================

        // 'q' : quit avec confirmation two-step
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // 't' : bascule clair/sombre
        Event::Key(_) if is_theme_event(&event) => {
            app.cancel_quit();
            app.theme.toggle();
        }

        // 'g' : ouvre le prompt de chemin
        Event::Key(_) if is_goto_event(&event) => {
            app.cancel_quit();
            info!("User opened goto prompt");
            app.start_goto();
        }

        // ========================================
        // Liste des monnaies
        // ========================================
        Event::Key(_) if is_up_event(&event) && matches!(app.route, Route::Coins) => {
            app.cancel_quit();
            debug!("User navigated up");
            app.navigate_up();
        }

        Event::Key(_) if is_down_event(&event) && matches!(app.route, Route::Coins) => {
            app.cancel_quit();
            debug!("User navigated down");
            app.navigate_down();
        }

        // Enter : suit le lien de la ligne sélectionnée
        Event::Key(_) if is_enter_event(&event) && matches!(app.route, Route::Coins) => {
            app.cancel_quit();
            let requests = app.open_selected();
            send_requests(command_tx, requests);
        }

        // ========================================
        // Vue détail : onglets et retour
        // ========================================
        Event::Key(_) if is_chart_tab_event(&event) && app.route.coin_id().is_some() => {
            app.cancel_quit();
            let requests = app.show_chart_tab();
            send_requests(command_tx, requests);
        }

        Event::Key(_) if is_price_tab_event(&event) && app.route.coin_id().is_some() => {
            app.cancel_quit();
            let requests = app.show_price_tab();
            send_requests(command_tx, requests);
        }

        Event::Key(_)
            if (is_escape_event(&event) || is_backspace_event(&event))
                && app.route.coin_id().is_some() =>
        {
            app.cancel_quit();
            debug!("User returned to coin list");
            let requests = app.back_to_coins();
            send_requests(command_tx, requests);
        }

        Event::Tick => {
            // Tick régulier : les refetchs sont gérés dans run()
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation si active
            app.cancel_quit();
        }

        _ => {
            // Autres événements : ignorés
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// Raw mode + alternate screen. Toujours restaurer le terminal avant
// de quitter, même en cas d'erreur.
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture // Active la souris (optionnel)
    )?;

    let backend = CrosstermBackend::new(stdout);

    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
