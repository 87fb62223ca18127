//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout.

pub mod detail;
pub mod filters;
pub mod grid;
pub mod search;
pub mod theme;

pub use detail::DetailView;
pub use filters::FilterPanel;
pub use grid::MovieGrid;
pub use search::SearchBox;
pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::{App, AppState, InputMode};
use crate::models::Filters;
use crate::store::MoviesStore;

/// Render the whole screen
pub fn draw(frame: &mut Frame, app: &mut App, store: &MoviesStore) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let search_area = render_header(frame, chunks[0], app, store.filters());

    match app.state {
        AppState::Browse => {
            app.grid.focused = app.input_mode == InputMode::Normal;
            app.grid.render(frame, chunks[1], store.movies(), store.loading());
        }
        AppState::Detail => {
            // Never show the previous movie while the next one loads
            let details = store
                .selected_movie()
                .filter(|d| Some(d.id()) == app.detail_id);
            app.detail
                .render(frame, chunks[1], details, app.detail_loading);
        }
        AppState::Filters => {
            let editing_year = app.input_mode == InputMode::Editing;
            app.filters.render(frame, chunks[1], editing_year);
        }
        AppState::Recent => render_recent(frame, chunks[1], app, store),
    }

    render_status_bar(frame, chunks[2], app);

    // Dropdown draws over the content area
    app.search.render_suggestions(frame, search_area, chunks[1]);

    if let Some(error) = store.error() {
        render_error_popup(frame, area, error);
    }
}

/// Render logo, search box and filter summary; returns the search box area
fn render_header(frame: &mut Frame, area: Rect, app: &App, filters: &Filters) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Logo
            Constraint::Min(20),    // Search box
            Constraint::Length(36), // Active filters
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("CINE", Theme::title()),
        Span::styled("GRID", Theme::secondary().add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, chunks[0]);

    app.search.render(frame, chunks[1]);

    let summary = Paragraph::new(Span::styled(
        filter_summary(filters, &app.filters),
        Theme::secondary(),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .title(Span::styled(" FILTERS (f) ", Theme::title())),
    );
    frame.render_widget(summary, chunks[2]);

    chunks[1]
}

/// One-line description of the active filters
pub fn filter_summary(filters: &Filters, panel: &FilterPanel) -> String {
    if filters.is_empty() {
        return "none".to_string();
    }

    let mut parts = Vec::new();
    if let Some(query) = filters.active_query() {
        parts.push(format!("\"{}\"", query));
    }
    if !filters.selected_genres.is_empty() {
        let names: Vec<String> = filters
            .selected_genres
            .iter()
            .map(|id| {
                panel
                    .genres
                    .iter()
                    .find(|g| g.id == *id)
                    .map(|g| g.name.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect();
        parts.push(names.join("+"));
    }
    if let Some(year) = filters.release_year {
        parts.push(year.to_string());
    }
    if let Some(sort) = filters.sort_by {
        parts.push(sort.label().to_string());
    }
    parts.join(" · ")
}

fn render_recent(frame: &mut Frame, area: Rect, app: &App, store: &MoviesStore) {
    let recent = store.recently_viewed();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(
            format!(" RECENTLY VIEWED ({}) ", recent.len()),
            Theme::title(),
        ));

    if recent.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("Nothing viewed yet", Theme::dimmed()))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = recent
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let is_selected = i == app.recent.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    movie.title.clone(),
                    if is_selected {
                        Theme::list_item_selected()
                    } else {
                        Theme::list_item()
                    },
                ),
                Span::styled(format!(" ({})", movie.year), Theme::year()),
                Span::raw(" "),
                Span::styled(
                    format!("★ {:.1}", movie.rating),
                    Theme::rating(movie.rating, is_selected),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let state_indicator = Span::styled(
        format!(" {} ", format!("{:?}", app.state).to_uppercase()),
        Style::default().fg(Theme::DIM),
    );

    let hints: &[(&str, &str)] = match (app.state, app.input_mode) {
        (_, InputMode::Editing) => &[("↵", "submit"), ("↓", "suggestions"), ("esc", "done")],
        (AppState::Browse, _) => &[
            ("↵", "details"),
            ("/", "search"),
            ("f", "filters"),
            ("c", "clear"),
            ("r", "recent"),
            ("q", "quit"),
        ],
        (AppState::Detail, _) => &[("↑↓", "scroll"), ("tab", "cast"), ("esc", "back")],
        (AppState::Filters, _) => &[
            ("space", "toggle"),
            ("y", "year"),
            ("s", "sort"),
            ("↵", "apply"),
            ("c", "clear"),
            ("esc", "cancel"),
        ],
        (AppState::Recent, _) => &[("↵", "details"), ("esc", "back")],
    };

    let mut spans = vec![mode_indicator, state_indicator, Span::raw("│")];
    for (key, desc) in hints {
        spans.push(Span::styled(format!(" {}", key), Theme::keybind()));
        spans.push(Span::styled(format!(":{}", desc), Theme::keybind_desc()));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Theme::status_bar()),
        area,
    );
}

fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 5.min(area.height);

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}
