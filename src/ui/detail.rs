//! Movie detail view
//!
//! Info panel (title, tagline, metadata, overview) beside the billed cast.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::api::tmdb::DEFAULT_IMAGE_BASE_URL;
use crate::models::{format_money, MovieDetails};
use crate::ui::Theme;

/// Which panel has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    #[default]
    Info,
    Cast,
}

#[derive(Debug)]
pub struct DetailView {
    pub focus: DetailFocus,
    /// Info panel scroll (lines)
    pub scroll: u16,
    /// Cast list cursor
    pub cast_selected: usize,
    image_base_url: String,
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl DetailView {
    pub fn new(image_base_url: impl Into<String>) -> Self {
        Self {
            focus: DetailFocus::Info,
            scroll: 0,
            cast_selected: 0,
            image_base_url: image_base_url.into(),
        }
    }

    /// Reset for a newly opened movie
    pub fn reset(&mut self) {
        self.focus = DetailFocus::Info;
        self.scroll = 0;
        self.cast_selected = 0;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DetailFocus::Info => DetailFocus::Cast,
            DetailFocus::Cast => DetailFocus::Info,
        };
    }

    pub fn up(&mut self) {
        match self.focus {
            DetailFocus::Info => self.scroll = self.scroll.saturating_sub(1),
            DetailFocus::Cast => self.cast_selected = self.cast_selected.saturating_sub(1),
        }
    }

    pub fn down(&mut self, cast_len: usize) {
        match self.focus {
            DetailFocus::Info => self.scroll = self.scroll.saturating_add(1),
            DetailFocus::Cast => {
                if self.cast_selected + 1 < cast_len {
                    self.cast_selected += 1;
                }
            }
        }
    }

    /// Render `details`, or a placeholder while loading / when missing
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        details: Option<&MovieDetails>,
        loading: bool,
    ) {
        let Some(details) = details else {
            self.render_empty(frame, area, loading);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        self.render_info_panel(frame, chunks[0], details);
        self.render_cast_panel(frame, chunks[1], details);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect, loading: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border())
            .title(Span::styled(" DETAIL ", Theme::title()));

        let message = if loading {
            Span::styled("Loading movie details...", Theme::loading())
        } else {
            Span::styled("No movie selected", Theme::dimmed())
        };

        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
    }

    fn render_info_panel(&self, frame: &mut Frame, area: Rect, details: &MovieDetails) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_for(self.focus == DetailFocus::Info))
            .title(Span::styled(" INFO ", Theme::title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let movie = &details.movie;
        let mut lines = vec![Line::from(vec![
            Span::styled("▶ ", Theme::accent()),
            Span::styled(movie.title.clone(), Theme::title()),
            Span::styled(format!(" ({})", movie.year), Theme::year()),
        ])];

        if !details.tagline.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("\"{}\"", details.tagline),
                Theme::secondary().add_modifier(Modifier::ITALIC),
            )));
        }

        let mut meta = vec![Span::styled(
            format!("★ {:.1}", movie.rating),
            Theme::rating(movie.rating, false),
        )];
        if let Some(runtime) = details.runtime_str() {
            meta.push(Span::styled(" │ ", Theme::dimmed()));
            meta.push(Span::styled(runtime, Theme::secondary()));
        }
        if !details.language.is_empty() {
            meta.push(Span::styled(" │ ", Theme::dimmed()));
            meta.push(Span::styled(details.language.clone(), Theme::secondary()));
        }
        lines.push(Line::from(meta));

        lines.push(field("Released", &details.release_date));
        lines.push(field("Status", &details.status));
        lines.push(field("Director", &details.credits.director));
        lines.push(field("Budget", &format_money(details.budget)));
        lines.push(field("Revenue", &format_money(details.revenue)));

        let genres = details.genres_str();
        if !genres.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Genres: ", Theme::dimmed()),
                Span::styled(genres, Theme::genre()),
            ]));
        }
        if !details.production_companies.is_empty() {
            lines.push(field("Studios", &details.production_companies.join(", ")));
        }
        if movie.has_poster() {
            lines.push(field("Poster", &movie.poster_url));
        }

        lines.push(Line::from(Span::styled(
            "─".repeat(inner.width as usize),
            Theme::dimmed(),
        )));

        if !movie.overview.is_empty() {
            lines.push(Line::from(Span::styled("OVERVIEW", Theme::accent())));
            for line in movie.overview.lines() {
                lines.push(Line::from(Span::styled(line.to_string(), Theme::text())));
            }
        }

        let paragraph = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, inner);
    }

    fn render_cast_panel(&self, frame: &mut Frame, area: Rect, details: &MovieDetails) {
        let cast = &details.credits.cast;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border_for(self.focus == DetailFocus::Cast))
            .title(Span::styled(format!(" CAST ({}) ", cast.len()), Theme::title()));

        if cast.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No cast information", Theme::dimmed()))
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
            return;
        }

        // Two lines per member
        let visible = (area.height.saturating_sub(2) / 2).max(1) as usize;
        let offset = self.cast_selected.saturating_sub(visible.saturating_sub(1));

        let items: Vec<ListItem> = cast
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, member)| {
                let is_selected = i == self.cast_selected && self.focus == DetailFocus::Cast;
                let photo = member
                    .profile_url(&self.image_base_url)
                    .unwrap_or_else(|| "(no photo)".to_string());
                ListItem::new(vec![
                    Line::from(Span::styled(
                        member.to_string(),
                        if is_selected {
                            Theme::list_item_selected()
                        } else {
                            Theme::list_item()
                        },
                    )),
                    Line::from(Span::styled(format!("  {}", photo), Theme::dimmed())),
                ])
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn field(label: &str, value: &str) -> Line<'static> {
    let value = if value.is_empty() { "—" } else { value };
    Line::from(vec![
        Span::styled(format!("{}: ", label), Theme::dimmed()),
        Span::styled(value.to_string(), Theme::text()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_toggle_and_reset() {
        let mut view = DetailView::default();
        view.toggle_focus();
        assert_eq!(view.focus, DetailFocus::Cast);
        view.down(3);
        view.down(3);
        view.down(3);
        assert_eq!(view.cast_selected, 2);
        view.up();
        assert_eq!(view.cast_selected, 1);

        view.reset();
        assert_eq!(view.focus, DetailFocus::Info);
        assert_eq!(view.cast_selected, 0);
    }

    #[test]
    fn test_info_scroll() {
        let mut view = DetailView::default();
        view.up();
        assert_eq!(view.scroll, 0);
        view.down(0);
        view.down(0);
        assert_eq!(view.scroll, 2);
    }
}
