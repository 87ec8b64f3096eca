// ============================================================================
// Coin - Rendu de la vue détail d'une monnaie
// ============================================================================
// La route /:coinId et ses onglets. Le bandeau profil et la barre
// d'onglets sont toujours dessinés ; le contenu de l'onglet actif
// (graphique ou cotation) s'affiche en dessous.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::{coin, CoinInfo};
use crate::query::{QueryKey, QueryState};
use crate::router::Tab;
use crate::ui;

/// Dessine l'écran détail complet
pub fn render(frame: &mut Frame, app: &App, id: &str, tab: Option<Tab>) {
    let size = frame.size();
    let chunks = ui::create_layout(size);

    ui::render_header(frame, app, chunks[0]);
    render_detail(frame, app, id, tab, chunks[1]);
    ui::render_footer(frame, app, chunks[2]);
}

/// Dessine le contenu de la vue détail
fn render_detail(frame: &mut Frame, app: &App, id: &str, tab: Option<Tab>, area: Rect) {
    let info_key = QueryKey::Info(id.to_string());

    // Fiche en erreur sans rien en cache : écran d'erreur dédié
    if let QueryState::Error(cause) = app.cache.state(&info_key) {
        ui::render_error(frame, area, cause);
        return;
    }

    let chunks: Vec<Rect> = match tab {
        // Vue d'ensemble : profil, description, offre, onglets
        None => Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Profil
                Constraint::Min(4),    // Description
                Constraint::Length(3), // Offre en circulation
                Constraint::Length(3), // Onglets
            ])
            .split(area)
            .to_vec(),
        // Onglet actif : le contenu prend la place de la description
        Some(_) => Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Profil
                Constraint::Length(3), // Onglets
                Constraint::Min(0),    // Contenu de l'onglet
            ])
            .split(area)
            .to_vec(),
    };

    render_profile(frame, app, id, chunks[0]);

    match tab {
        None => {
            render_about(frame, app, &info_key, chunks[1]);
            render_supply(frame, app, id, chunks[2]);
            render_tabs(frame, app, tab, chunks[3]);
        }
        Some(active) => {
            render_tabs(frame, app, tab, chunks[1]);
            match active {
                Tab::Chart => ui::chart::render_chart(frame, app, id, chunks[2]),
                Tab::Price => ui::price::render_price(frame, app, id, chunks[2]),
            }
        }
    }
}

/// Bandeau profil : rang, symbole et prix courant
///
/// Le prix vient de la cotation, rafraîchie indépendamment de la
/// fiche : chaque cellule affiche son propre état de chargement.
fn render_profile(frame: &mut Frame, app: &App, id: &str, area: Rect) {
    let palette = app.theme.palette();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.strong_bg))
        .title(format!(" 💰 {} ", app.window_title()));

    let (rank_span, symbol_span) = match app.cache.state(&QueryKey::Info(id.to_string())) {
        QueryState::Success(payload) => match payload.as_info() {
            Some(info) => (
                Span::styled(
                    format!("RANK #{}", info.rank),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{} ({})", info.symbol, info.kind),
                    Style::default().fg(palette.text),
                ),
            ),
            None => placeholder_spans(),
        },
        _ => placeholder_spans(),
    };

    let price_span = match app.cache.state(&QueryKey::Tickers(id.to_string())) {
        QueryState::Success(payload) => match payload.as_tickers() {
            Some(ticker) => Span::styled(
                ticker.usd().price_label(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("...", Style::default().fg(Color::Gray)),
        },
        QueryState::Error(_) => Span::styled("price unavailable", Style::default().fg(Color::Red)),
        QueryState::Loading => Span::styled("Loading...", Style::default().fg(Color::Gray)),
    };

    let line = Line::from(vec![
        rank_span,
        Span::raw("   "),
        symbol_span,
        Span::raw("   "),
        price_span,
    ]);

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn placeholder_spans() -> (Span<'static>, Span<'static>) {
    (
        Span::styled("RANK #...", Style::default().fg(Color::Gray)),
        Span::styled("...", Style::default().fg(Color::Gray)),
    )
}

/// Bloc description de la vue d'ensemble
fn render_about(frame: &mut Frame, app: &App, info_key: &QueryKey, area: Rect) {
    let palette = app.theme.palette();

    let QueryState::Success(payload) = app.cache.state(info_key) else {
        ui::render_loading(frame, area, "Loading profile...");
        return;
    };
    let Some(info) = payload.as_info() else {
        ui::render_loading(frame, area, "Loading profile...");
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg))
        .title(" About ");

    let mut text = vec![
        Line::from(Span::styled(
            info.description_text().to_string(),
            Style::default().fg(palette.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            meta_line(info),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("Icon: {}", coin::icon_url(&info.symbol)),
            Style::default().fg(Color::Gray),
        )),
    ];

    // Avertissement de l'API (monnaie délistée, données gelées, etc.)
    if let Some(message) = &info.message {
        if !message.is_empty() {
            text.push(Line::from(Span::styled(
                format!("⚠ {}", message),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Ligne de métadonnées de la fiche, champs absents omis
fn meta_line(info: &CoinInfo) -> String {
    let mut parts = vec![format!(
        "Open source: {}",
        if info.open_source { "yes" } else { "no" }
    )];

    if let Some(proof) = &info.proof_type {
        parts.push(format!("Proof: {}", proof));
    }
    if let Some(algorithm) = &info.hash_algorithm {
        parts.push(format!("Algorithm: {}", algorithm));
    }
    if let Some(started) = &info.started_at {
        parts.push(format!("Since: {}", started));
    }

    parts.join("  •  ")
}

/// Bloc offre : offre totale et offre maximale
fn render_supply(frame: &mut Frame, app: &App, id: &str, area: Rect) {
    let palette = app.theme.palette();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg))
        .title(" Supply ");

    let line = match app.cache.state(&QueryKey::Tickers(id.to_string())) {
        QueryState::Success(payload) => match payload.as_tickers() {
            Some(ticker) => {
                let max_supply = if ticker.max_supply > 0 {
                    ticker.max_supply.to_string()
                } else {
                    "—".to_string()
                };
                Line::from(vec![
                    Span::styled("TOTAL SUPPLY: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        ticker.total_supply.to_string(),
                        Style::default().fg(palette.text),
                    ),
                    Span::raw("   "),
                    Span::styled("MAX SUPPLY: ", Style::default().fg(Color::Gray)),
                    Span::styled(max_supply, Style::default().fg(palette.text)),
                ])
            }
            None => Line::from(Span::styled("Loading...", Style::default().fg(Color::Gray))),
        },
        _ => Line::from(Span::styled("Loading...", Style::default().fg(Color::Gray))),
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Barre d'onglets Chart / Price
fn render_tabs(frame: &mut Frame, app: &App, active: Option<Tab>, area: Rect) {
    let palette = app.theme.palette();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.strong_bg));

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    for (tab, key) in [(Tab::Chart, "[c]"), (Tab::Price, "[p]")] {
        let label_style = if active == Some(tab) {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(palette.text)
        };

        spans.push(Span::styled(key, key_style));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", tab.label()), label_style));
        spans.push(Span::raw("   "));
    }

    let paragraph = Paragraph::new(vec![Line::from(spans)])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
