//! Search box component
//!
//! Single-line input with a cursor and a suggestion dropdown fed by the
//! debounced search controller.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
};

use crate::controller::MIN_QUERY_LEN;
use crate::models::Movie;
use crate::ui::Theme;

/// Most suggestions shown at once
pub const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Default)]
pub struct SearchBox {
    pub query: String,
    /// Cursor position in characters
    pub cursor: usize,
    pub focused: bool,
    pub suggestions: Vec<Movie>,
    /// Highlighted suggestion, if the user moved into the dropdown
    pub selected: Option<usize>,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self) -> usize {
        self.query
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index();
        self.query.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index();
            self.query.remove(idx);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let idx = self.byte_index();
            self.query.remove(idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Clear query and suggestions
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.set_suggestions(Vec::new());
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<Movie>) {
        self.suggestions = suggestions;
        self.selected = None;
    }

    /// Move the dropdown highlight down
    pub fn next_suggestion(&mut self) {
        let len = self.suggestions.len().min(MAX_SUGGESTIONS);
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    /// Move the dropdown highlight up; above the first entry returns to the input
    pub fn prev_suggestion(&mut self) {
        self.selected = match self.selected {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn selected_suggestion(&self) -> Option<&Movie> {
        self.selected.and_then(|i| self.suggestions.get(i))
    }

    /// Render the input line
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_for(self.focused))
            .title(Span::styled(" SEARCH (/) ", Theme::title()));

        let content = if self.query.is_empty() && !self.focused {
            Line::from(Span::styled(
                format!("Search movies (min. {} characters)...", MIN_QUERY_LEN),
                Theme::dimmed(),
            ))
        } else if self.focused {
            let idx = self.byte_index();
            let (before, rest) = self.query.split_at(idx);
            let mut chars = rest.chars();
            let at = chars.next().map(String::from).unwrap_or_else(|| " ".into());
            Line::from(vec![
                Span::styled(before.to_string(), Theme::input()),
                Span::styled(at, Theme::input_cursor()),
                Span::styled(chars.collect::<String>(), Theme::input()),
            ])
        } else {
            Line::from(Span::styled(self.query.clone(), Theme::text()))
        };

        frame.render_widget(Paragraph::new(content).block(block), area);
    }

    /// Render the dropdown below `input_area`, clipped to `bounds`
    pub fn render_suggestions(&self, frame: &mut Frame, input_area: Rect, bounds: Rect) {
        if !self.focused || self.suggestions.is_empty() {
            return;
        }

        let shown = self.suggestions.len().min(MAX_SUGGESTIONS);
        let y = input_area.y + input_area.height;
        let height = (shown as u16 + 2).min(bounds.bottom().saturating_sub(y));
        if height < 3 {
            return;
        }
        let area = Rect {
            x: input_area.x,
            y,
            width: input_area.width,
            height,
        };

        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .take(shown)
            .enumerate()
            .map(|(i, movie)| {
                let is_selected = self.selected == Some(i);
                let title_style = if is_selected {
                    Theme::list_item_selected()
                } else {
                    Theme::list_item()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(movie.title.clone(), title_style),
                    Span::styled(format!(" ({})", movie.year), Theme::year()),
                ]))
            })
            .collect();

        frame.render_widget(Clear, area);
        frame.render_widget(
            List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Theme::border_focused())
                    .style(Theme::text()),
            ),
            area,
        );
    }
}
