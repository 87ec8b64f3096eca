// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod chart;  // Rendu du graphique ligne (onglet chart)
pub mod coin;   // Rendu de la vue détail d'une monnaie
pub mod coins;  // Rendu de la liste des monnaies
pub mod events; // Gestion des événements clavier
pub mod price;  // Rendu du détail de cotation (onglet price)

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::router::Route;

/// Dessine l'interface complète selon la route active
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `app` - État de l'application
pub fn render(frame: &mut Frame, app: &App) {
    match &app.route {
        Route::Coins => coins::render(frame, app),
        Route::Coin { id, tab } => coin::render(frame, app, id, *tab),
    }
}

/// Crée le layout principal (header, content, footer)
pub fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

/// Dessine le header commun : titre, chemin courant et compteurs du cache
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();
    let stats = app.cache.stats();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg))
        .title(" LazyCoins ")
        .title_alignment(Alignment::Center);

    let text = vec![Line::from(vec![
        Span::styled(
            app.route.path(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  ({} cached, {} in flight)",
                stats.entries, stats.in_flight
            ),
            Style::default().fg(Color::Gray),
        ),
    ])];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le footer commun
///
/// Par priorité : prompt "go to" ouvert, confirmation de quit, message
/// de statut (chemin rejeté ou dernier fetch échoué), puis les
/// raccourcis de la route courante.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();

    if app.is_in_goto_mode() {
        render_goto_footer(frame, app, area);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(message) = &app.status_message {
        Line::from(vec![
            Span::styled(
                message.as_str(),
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  [g]", Style::default().fg(Color::Yellow)),
            Span::raw(" Try again"),
        ])
    } else if let Some((key, cause)) = app.cache.last_failure() {
        Line::from(vec![
            Span::styled(
                format!("⚠ {}: {}", key, cause),
                Style::default().fg(Color::Yellow),
            ),
        ])
    } else {
        route_shortcuts(app)
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Raccourcis clavier de la route courante
fn route_shortcuts(app: &App) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    match &app.route {
        Route::Coins => Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", key_style),
            Span::raw(" Navigate  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Open  "),
            Span::styled("[g]", key_style),
            Span::raw(" Go to  "),
            Span::styled("[t]", key_style),
            Span::raw(" Theme"),
        ]),
        Route::Coin { .. } => Line::from(vec![
            Span::styled("[c]", key_style),
            Span::raw(" Chart  "),
            Span::styled("[p]", key_style),
            Span::raw(" Price  "),
            Span::styled("[ESC]", key_style),
            Span::raw(" Back  "),
            Span::styled("[g]", key_style),
            Span::raw(" Go to  "),
            Span::styled("[t]", key_style),
            Span::raw(" Theme  "),
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ]),
    }
}

/// Dessine le footer en mode "go to" avec la ligne de saisie
fn render_goto_footer(frame: &mut Frame, app: &App, area: Rect) {
    let palette = app.theme.palette();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green)) // Vert : mode saisie
        .style(Style::default().bg(palette.bg));

    let buffer = app.goto_buffer.as_deref().unwrap_or("");
    let input_line = Line::from(vec![
        Span::styled(
            "Go to: ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(buffer.to_string(), Style::default().fg(palette.text)),
        Span::styled(
            "█", // Curseur
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::raw("   "),
        Span::styled(
            "[Enter]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Navigate  "),
        Span::styled(
            "[ESC]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Cancel"),
    ]);

    let paragraph = Paragraph::new(vec![input_line])
        .block(block)
        .alignment(Alignment::Left); // Alignement à gauche pour l'input

    frame.render_widget(paragraph, area);
}

/// Affiche un message d'erreur dans une zone
pub fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Error ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "[g] Go to another path  [ESC] Back",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Affiche un indicateur de chargement dans une zone
///
/// Visuellement distinct d'une erreur : gris, sans bordure rouge.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
