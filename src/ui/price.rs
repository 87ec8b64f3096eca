// ============================================================================
// Price - Rendu du détail de cotation
// ============================================================================
// L'onglet price de la vue détail. Ne lit que la cotation déjà
// souscrite par la vue parente : aucune requête supplémentaire.
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::format_usd;
use crate::query::{QueryKey, QueryState};
use crate::ui;

/// Dessine le détail de la cotation USD
pub fn render_price(frame: &mut Frame, app: &App, id: &str, area: Rect) {
    let palette = app.theme.palette();

    let ticker = match app.cache.state(&QueryKey::Tickers(id.to_string())) {
        QueryState::Loading => {
            ui::render_loading(frame, area, "Loading price...");
            return;
        }
        QueryState::Error(cause) => {
            ui::render_error(frame, area, cause);
            return;
        }
        QueryState::Success(payload) => match payload.as_tickers() {
            Some(ticker) => ticker,
            None => {
                ui::render_loading(frame, area, "Loading price...");
                return;
            }
        },
    };

    let quote = ticker.usd();
    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default().fg(palette.text);

    let mut text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!(" {:<14}", "PRICE"), label_style),
            Span::styled(
                quote.price_label(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(format!(" {:<14}", "VOLUME 24H"), label_style),
            Span::styled(format_usd(quote.volume_24h), value_style),
        ]),
        Line::from(vec![
            Span::styled(format!(" {:<14}", "MARKET CAP"), label_style),
            Span::styled(format_usd(quote.market_cap), value_style),
        ]),
    ];

    // Plus haut historique, si l'API le fournit
    if let Some(ath_price) = quote.ath_price {
        let mut spans = vec![
            Span::styled(format!(" {:<14}", "ATH"), label_style),
            Span::styled(format_usd(ath_price), value_style),
        ];
        if let Some(date) = quote.ath_date_label() {
            spans.push(Span::styled(format!("  ({})", date), label_style));
        }
        if let Some(from_ath) = quote.percent_from_price_ath {
            spans.push(Span::styled(
                format!("  {:+.2}% from ATH", from_ath),
                Style::default().fg(Color::Red),
            ));
        }
        text.push(Line::from(spans));
    }

    text.push(Line::from(""));

    // Variations par horizon de temps
    for (horizon, change) in quote.change_rows() {
        let (arrow, color) = if change >= 0.0 {
            ("▲", Color::Green)
        } else {
            ("▼", Color::Red)
        };

        text.push(Line::from(vec![
            Span::styled(format!(" {:<14}", horizon.to_uppercase()), label_style),
            Span::styled(
                format!("{} {:+.2}%", arrow, change),
                Style::default().fg(color),
            ),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.bg))
        .title(format!(" 💵 {} / USD ", ticker.symbol));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
