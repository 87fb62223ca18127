//! Movie card grid
//!
//! Lays movie cards out in as many columns as the width allows and keeps a
//! 2-D cursor visible while scrolling by rows. The grid reports its scroll
//! position so the list controller can load further pages.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::controller::ScrollMetrics;
use crate::models::Movie;
use crate::ui::Theme;

/// Card footprint in cells, borders included
pub const CARD_WIDTH: u16 = 30;
pub const CARD_HEIGHT: u16 = 6;

#[derive(Debug)]
pub struct MovieGrid {
    /// Index of the card under the cursor
    pub selected: usize,
    /// First visible row
    pub offset: usize,
    pub focused: bool,
    columns: usize,
    visible_rows: usize,
    len: usize,
}

impl Default for MovieGrid {
    fn default() -> Self {
        Self {
            selected: 0,
            offset: 0,
            focused: true,
            columns: 1,
            visible_rows: 1,
            len: 0,
        }
    }
}

impl MovieGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport in cards; normally derived from the render area
    pub fn set_viewport(&mut self, columns: usize, visible_rows: usize) {
        self.columns = columns.max(1);
        self.visible_rows = visible_rows.max(1);
        self.ensure_visible();
    }

    /// Update the number of movies (e.g., when a new page arrives)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        self.ensure_visible();
    }

    /// Back to the first card
    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of rows
    pub fn rows(&self) -> usize {
        self.len.div_ceil(self.columns)
    }

    pub fn selected_row(&self) -> usize {
        self.selected / self.columns
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.offset,
            visible: self.visible_rows,
            total: self.rows(),
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub fn left(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.ensure_visible();
    }

    pub fn right(&mut self) {
        if self.selected + 1 < self.len {
            self.selected += 1;
        }
        self.ensure_visible();
    }

    pub fn up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
        self.ensure_visible();
    }

    /// Move down a row; from a short last row, land on the final card
    pub fn down(&mut self) {
        if self.len == 0 {
            return;
        }
        if self.selected + self.columns < self.len {
            self.selected += self.columns;
        } else if self.selected_row() + 1 < self.rows() {
            self.selected = self.len - 1;
        }
        self.ensure_visible();
    }

    pub fn page_up(&mut self) {
        for _ in 0..self.visible_rows {
            self.up();
        }
    }

    pub fn page_down(&mut self) {
        for _ in 0..self.visible_rows {
            self.down();
        }
    }

    pub fn first(&mut self) {
        self.reset();
    }

    pub fn last(&mut self) {
        self.selected = self.len.saturating_sub(1);
        self.ensure_visible();
    }

    /// Adjust offset so the selected row is on screen
    fn ensure_visible(&mut self) {
        let row = self.selected_row();
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.visible_rows {
            self.offset = row + 1 - self.visible_rows;
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Render the grid for `movies`
    pub fn render(&mut self, frame: &mut Frame, area: Rect, movies: &[Movie], loading: bool) {
        let title = if movies.is_empty() {
            " MOVIES ".to_string()
        } else {
            format!(" MOVIES ({}/{}) ", self.selected + 1, movies.len())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_for(self.focused))
            .title(Span::styled(title, Theme::title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.set_viewport(
            (inner.width / CARD_WIDTH) as usize,
            (inner.height / CARD_HEIGHT) as usize,
        );
        self.set_len(movies.len());

        if movies.is_empty() {
            let message = if loading {
                Span::styled("Loading movies...", Theme::loading())
            } else {
                Span::styled("No movies found", Theme::dimmed())
            };
            frame.render_widget(
                Paragraph::new(message).alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let start = self.offset * self.columns;
        let end = ((self.offset + self.visible_rows) * self.columns).min(movies.len());
        for (index, movie) in movies.iter().enumerate().take(end).skip(start) {
            let slot = index - start;
            let col = (slot % self.columns) as u16;
            let row = (slot / self.columns) as u16;
            let card = Rect {
                x: inner.x + col * CARD_WIDTH,
                y: inner.y + row * CARD_HEIGHT,
                width: CARD_WIDTH.min(inner.width),
                height: CARD_HEIGHT.min(inner.height),
            };
            Self::render_card(frame, card, movie, index == self.selected);
        }

        if loading {
            let footer = Rect {
                x: inner.x,
                y: inner.y + inner.height.saturating_sub(1),
                width: inner.width,
                height: 1,
            };
            frame.render_widget(
                Paragraph::new(Span::styled("Loading more...", Theme::loading()))
                    .alignment(Alignment::Right),
                footer,
            );
        }
    }

    fn render_card(frame: &mut Frame, area: Rect, movie: &Movie, is_selected: bool) {
        let style = if is_selected {
            Theme::card_selected()
        } else {
            Theme::card()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_for(is_selected))
            .style(style);

        let poster = if movie.has_poster() { "▣" } else { "□" };
        let lines = vec![
            Line::from(Span::styled(movie.title.clone(), style)),
            Line::from(vec![
                Span::styled(format!("{} ", poster), Theme::dimmed()),
                Span::styled(movie.year.clone(), Theme::year()),
                Span::raw("  "),
                Span::styled(
                    format!("★ {:.1}", movie.rating),
                    Theme::rating(movie.rating, is_selected),
                ),
            ]),
            Line::from(Span::styled(movie.overview.clone(), Theme::dimmed())),
        ];

        let card = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(card, area);
    }
}
