// ============================================================================
// Coins - Rendu de la liste des monnaies
// ============================================================================
// L'écran d'accueil : le top 100 des monnaies par rang, chaque ligne
// étant un lien vers la vue détail (/:coinId)
// ============================================================================

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::query::{QueryKey, QueryState};
use crate::ui;

/// Dessine l'écran liste complet
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let chunks = ui::create_layout(size);

    ui::render_header(frame, app, chunks[0]);
    render_coin_list(frame, app, chunks[1]);
    ui::render_footer(frame, app, chunks[2]);
}

/// Dessine la liste des monnaies
fn render_coin_list(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let palette = app.theme.palette();

    match app.cache.state(&QueryKey::Coins) {
        QueryState::Loading => {
            ui::render_loading(frame, area, "Loading coins...");
            return;
        }
        QueryState::Error(cause) => {
            ui::render_error(frame, area, cause);
            return;
        }
        QueryState::Success(_) => {}
    }

    let coins = app.visible_coins();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg))
        .title(format!(" 🪙 Coins ({}) ", coins.len()));

    if coins.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No active coins returned",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = coins
        .iter()
        .enumerate()
        .map(|(index, coin)| {
            // Couleur selon l'état de la monnaie
            let style = if !coin.is_active {
                Style::default().fg(Color::Gray)
            } else if coin.is_new {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.text)
            };

            let line = format!(
                " {:>4}  {:<8} {:<24} → {}",
                coin.rank,
                coin.symbol,
                coin.name,
                coin.route_path()
            );

            let mut list_item = ListItem::new(line).style(style);

            if index == app.selected_index {
                list_item = list_item.style(
                    style
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                );
            }

            list_item
        })
        .collect();

    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}
