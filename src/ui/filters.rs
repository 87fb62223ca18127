//! Filter panel
//!
//! Genre multi-select, release year input and sort order. The panel edits a
//! working copy; nothing reaches the store until the filters are applied.

use std::collections::BTreeSet;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};

use crate::models::{Filters, Genre, SortKey};
use crate::ui::Theme;

/// Focused field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Genres,
    Year,
    Sort,
}

impl FilterField {
    pub fn next(self) -> Self {
        match self {
            FilterField::Genres => FilterField::Year,
            FilterField::Year => FilterField::Sort,
            FilterField::Sort => FilterField::Genres,
        }
    }
}

#[derive(Debug, Default)]
pub struct FilterPanel {
    pub genres: Vec<Genre>,
    pub cursor: usize,
    pub selected: BTreeSet<u64>,
    /// Raw year text as typed
    pub year: String,
    pub sort_by: Option<SortKey>,
    pub field: FilterField,
    /// Carried through unchanged so applying filters keeps the search text
    query: Option<String>,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_genres(&mut self, genres: Vec<Genre>) {
        self.genres = genres;
        if self.cursor >= self.genres.len() {
            self.cursor = self.genres.len().saturating_sub(1);
        }
    }

    /// Load the working copy from the active filters
    pub fn open(&mut self, filters: &Filters) {
        self.selected = filters.selected_genres.clone();
        self.year = filters
            .release_year
            .map(|y| y.to_string())
            .unwrap_or_default();
        self.sort_by = filters.sort_by;
        self.query = filters.query.clone();
        self.field = FilterField::Genres;
        self.cursor = 0;
    }

    /// Build filters from the working copy
    ///
    /// A year that is not a 4-digit number is dropped.
    pub fn to_filters(&self) -> Filters {
        let release_year = self
            .year
            .parse::<u16>()
            .ok()
            .filter(|_| self.year.len() == 4);

        Filters {
            query: self.query.clone(),
            selected_genres: self.selected.clone(),
            release_year,
            sort_by: self.sort_by,
        }
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.genres.len() {
            self.cursor += 1;
        }
    }

    /// Toggle the genre under the cursor
    pub fn toggle(&mut self) {
        if let Some(genre) = self.genres.get(self.cursor) {
            if !self.selected.remove(&genre.id) {
                self.selected.insert(genre.id);
            }
        }
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    /// Cycle sort forward; wraps back to "unset" after the last key
    pub fn sort_next(&mut self) {
        self.sort_by = match self.sort_by {
            None => Some(SortKey::ALL[0]),
            Some(key) if key == SortKey::ALL[SortKey::ALL.len() - 1] => None,
            Some(key) => Some(key.next()),
        };
    }

    pub fn sort_prev(&mut self) {
        self.sort_by = match self.sort_by {
            None => Some(SortKey::ALL[SortKey::ALL.len() - 1]),
            Some(key) if key == SortKey::ALL[0] => None,
            Some(key) => Some(key.prev()),
        };
    }

    /// Append a digit to the year (max 4)
    pub fn year_push(&mut self, c: char) {
        if c.is_ascii_digit() && self.year.len() < 4 {
            self.year.push(c);
        }
    }

    pub fn year_backspace(&mut self) {
        self.year.pop();
    }

    /// Render the panel
    pub fn render(&self, frame: &mut Frame, area: Rect, editing_year: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3), Constraint::Length(3)])
            .split(area);

        self.render_genres(frame, chunks[0]);

        let year_style = if editing_year {
            Theme::input_cursor()
        } else {
            Theme::input()
        };
        let year_text = if self.year.is_empty() && !editing_year {
            Span::styled("any", Theme::dimmed())
        } else {
            Span::styled(self.year.clone(), year_style)
        };
        frame.render_widget(
            Paragraph::new(Line::from(year_text)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Theme::border_for(self.field == FilterField::Year))
                    .title(Span::styled(" RELEASE YEAR (y) ", Theme::title())),
            ),
            chunks[1],
        );

        let sort_text = self
            .sort_by
            .map(|k| k.label())
            .unwrap_or("Default (most popular)");
        frame.render_widget(
            Paragraph::new(Span::styled(sort_text, Theme::secondary())).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Theme::border_for(self.field == FilterField::Sort))
                    .title(Span::styled(" SORT (s/S) ", Theme::title())),
            ),
            chunks[2],
        );
    }

    fn render_genres(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_for(self.field == FilterField::Genres))
            .title(Span::styled(
                format!(" GENRES ({} selected) ", self.selected.len()),
                Theme::title(),
            ));

        if self.genres.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No genres loaded", Theme::dimmed()))
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
            return;
        }

        let visible = area.height.saturating_sub(2).max(1) as usize;
        let offset = self.cursor.saturating_sub(visible - 1);

        let items: Vec<ListItem> = self
            .genres
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, genre)| {
                let checked = self.selected.contains(&genre.id);
                let mark = if checked { "[x] " } else { "[ ] " };
                let style = if i == self.cursor && self.field == FilterField::Genres {
                    Theme::list_item_selected()
                } else if checked {
                    Theme::genre_checked()
                } else {
                    Theme::list_item()
                };
                ListItem::new(Line::from(Span::styled(
                    format!("{}{}", mark, genre.name),
                    style,
                )))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
