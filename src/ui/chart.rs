// ============================================================================
// Chart - Rendu du graphique de clôtures
// ============================================================================
// L'onglet chart de la vue détail : une ligne des prix de clôture sur
// la fenêtre d'historique, un point par entrée OHLCV, sans
// rééchantillonnage
// ============================================================================

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::api::paprika::HISTORY_WINDOW_DAYS;
use crate::app::App;
use crate::models::{format_usd, PricePoint};
use crate::query::{QueryKey, QueryState};
use crate::ui;

/// Dessine le graphique des clôtures
pub fn render_chart(frame: &mut Frame, app: &App, id: &str, area: Rect) {
    let palette = app.theme.palette();

    let history = match app.cache.state(&QueryKey::History(id.to_string())) {
        QueryState::Loading => {
            ui::render_loading(frame, area, "Loading chart...");
            return;
        }
        QueryState::Error(cause) => {
            ui::render_error(frame, area, cause);
            return;
        }
        QueryState::Success(payload) => match payload.as_history() {
            Some(history) => history,
            None => {
                ui::render_loading(frame, area, "Loading chart...");
                return;
            }
        },
    };

    let points = closing_series(history);
    if points.is_empty() {
        ui::render_error(frame, area, "No price history to display");
        return;
    }

    // Horodatages des points retenus, pour les labels de l'axe X
    let labels: Vec<String> = history
        .iter()
        .filter(|point| point.close_price().is_some())
        .map(|point| point.close_label())
        .collect();

    // Bornes des prix en un seul passage
    let (min_price, max_price) = points.iter().fold(
        (f64::MAX, f64::MIN),
        |(min, max), &(_x, y)| (min.min(y), max.max(y)),
    );

    // Marge de 5% pour que le graphique respire
    let margin = (max_price - min_price) * 0.05;
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;

    // Couleur selon la tendance sur la fenêtre
    let first_close = points.first().map(|&(_, y)| y).unwrap_or(0.0);
    let last_close = points.last().map(|&(_, y)| y).unwrap_or(0.0);
    let color = if last_close >= first_close {
        Color::Green
    } else {
        Color::Red
    };

    let datasets = vec![Dataset::default()
        .name(id)
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    let x_axis = Axis::default()
        .title("Time")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len() - 1) as f64])
        .labels(vec![
            Span::raw(labels.first().cloned().unwrap_or_default()),
            Span::raw(labels.get(labels.len() / 2).cloned().unwrap_or_default()),
            Span::raw(labels.last().cloned().unwrap_or_default()),
        ]);

    let y_axis = Axis::default()
        .title("Price (USD)")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_usd(y_min)),
            Span::raw(format_usd((y_min + y_max) / 2.0)),
            Span::raw(format_usd(y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .style(Style::default().bg(palette.bg))
                .title(format!(" 📈 {} - last {} days ", id, HISTORY_WINDOW_DAYS)),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Convertit l'historique OHLCV en points (x, y) de clôture
///
/// Les clôtures arrivent en chaînes : celles qui ne se parsent pas
/// sont ignorées, sans trou dans l'axe X.
pub fn closing_series(history: &[PricePoint]) -> Vec<(f64, f64)> {
    history
        .iter()
        .filter_map(|point| point.close_price())
        .enumerate()
        .map(|(i, close)| (i as f64, close))
        .collect()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn point(close: &str) -> PricePoint {
        serde_json::from_str(&format!(
            r#"{{
                "time_open": 1711000000,
                "time_close": 1711065599,
                "open": "100.0",
                "high": "110.0",
                "low": "90.0",
                "close": "{}",
                "volume": "12345",
                "market_cap": 1000.0
            }}"#,
            close
        ))
        .unwrap()
    }

    #[test]
    fn test_closing_series_parses_string_closes() {
        let history = vec![point("100.5"), point("101.25"), point("99.875")];
        let series = closing_series(&history);

        assert_eq!(series, vec![(0.0, 100.5), (1.0, 101.25), (2.0, 99.875)]);
    }

    #[test]
    fn test_closing_series_skips_malformed_entries() {
        let history = vec![point("100.5"), point("not-a-price"), point("101.2")];
        let series = closing_series(&history);

        // L'entrée illisible est ignorée, l'axe X reste contigu
        assert_eq!(series, vec![(0.0, 100.5), (1.0, 101.2)]);
    }

    #[test]
    fn test_closing_series_empty_history() {
        assert!(closing_series(&[]).is_empty());
    }
}
