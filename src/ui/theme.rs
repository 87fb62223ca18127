//! Marquee theme for cinegrid
//!
//! Color palette and style helpers for the TUI: a dark auditorium
//! background with gold marquee accents.

use ratatui::style::{Color, Modifier, Style};

/// Marquee color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// #111217, auditorium dark
    pub const BACKGROUND: Color = Color::Rgb(0x11, 0x12, 0x17);
    /// #1b1d25, cards and input fields
    pub const SURFACE: Color = Color::Rgb(0x1b, 0x1d, 0x25);

    /// #f5c518, marquee gold
    pub const PRIMARY: Color = Color::Rgb(0xf5, 0xc5, 0x18);
    /// #7fb3ff, screen blue
    pub const SECONDARY: Color = Color::Rgb(0x7f, 0xb3, 0xff);
    /// #ff8c42, popcorn orange
    pub const ACCENT: Color = Color::Rgb(0xff, 0x8c, 0x42);

    pub const TEXT: Color = Color::Rgb(0xe8, 0xe6, 0xe3);
    pub const DIM: Color = Color::Rgb(0x5a, 0x5d, 0x66);
    /// Unfocused panel edges (dim gold)
    pub const BORDER: Color = Color::Rgb(0x7a, 0x63, 0x0c);

    pub const SUCCESS: Color = Color::Rgb(0x4c, 0xd9, 0x64);
    pub const WARNING: Color = Color::Rgb(0xff, 0xb0, 0x20);
    pub const ERROR: Color = Color::Rgb(0xff, 0x5c, 0x5c);

    fn fg(color: Color) -> Style {
        Style::default().fg(color)
    }

    fn bold(color: Color) -> Style {
        Self::fg(color).add_modifier(Modifier::BOLD)
    }

    /// Dark text on a gold bar, used for anything "selected"
    fn inverted() -> Style {
        Self::bold(Self::BACKGROUND).bg(Self::PRIMARY)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // TEXT
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Self::fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    pub fn dimmed() -> Style {
        Self::fg(Self::DIM)
    }

    pub fn title() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn secondary() -> Style {
        Self::fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Self::bold(Self::ACCENT)
    }

    pub fn loading() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn error() -> Style {
        Self::bold(Self::ERROR)
    }

    pub fn success() -> Style {
        Self::bold(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Self::bold(Self::WARNING)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // BORDERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn border() -> Style {
        Self::fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Self::bold(Self::PRIMARY)
    }

    pub fn border_for(focused: bool) -> Style {
        if focused {
            Self::border_focused()
        } else {
            Self::border()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENTS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn card() -> Style {
        Self::fg(Self::TEXT).bg(Self::SURFACE)
    }

    pub fn card_selected() -> Style {
        Self::inverted()
    }

    pub fn list_item() -> Style {
        Self::fg(Self::TEXT)
    }

    pub fn list_item_selected() -> Style {
        Self::inverted()
    }

    pub fn input() -> Style {
        Self::fg(Self::TEXT).bg(Self::SURFACE)
    }

    pub fn input_cursor() -> Style {
        Self::fg(Self::BACKGROUND).bg(Self::PRIMARY)
    }

    pub fn status_bar() -> Style {
        Self::fg(Self::TEXT).bg(Self::SURFACE)
    }

    /// Key name in the status bar hints
    pub fn keybind() -> Style {
        Self::fg(Self::ACCENT)
    }

    pub fn keybind_desc() -> Style {
        Self::fg(Self::DIM)
    }

    pub fn year() -> Style {
        Self::fg(Self::SECONDARY)
    }

    pub fn genre() -> Style {
        Self::fg(Self::SECONDARY)
    }

    pub fn genre_checked() -> Style {
        Self::bold(Self::SUCCESS)
    }

    /// Rating color by band (>= 7.5 good, >= 6 fair, >= 4 weak, else poor)
    pub fn rating(rating: f32, is_selected: bool) -> Style {
        match rating {
            _ if is_selected => Self::accent(),
            r if r >= 7.5 => Self::success(),
            r if r >= 6.0 => Self::warning(),
            r if r >= 4.0 => Self::dimmed(),
            _ => Self::error(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTRAST
// ═══════════════════════════════════════════════════════════════════════════

pub type Rgb = (u8, u8, u8);

/// WCAG 2.0 relative luminance (https://www.w3.org/TR/WCAG20/#relativeluminancedef)
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |channel: u8| {
        let v = f64::from(channel) / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Ratio in 1.0..=21.0; argument order does not matter
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a.0, a.1, a.2);
    let lb = relative_luminance(b.0, b.1, b.2);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// AA for body text, 4.5:1
pub fn meets_wcag_aa(fg: Rgb, bg: Rgb) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// AA for bold or large text, 3:1
pub fn meets_wcag_aa_large(fg: Rgb, bg: Rgb) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

pub fn color_to_rgb(color: Color) -> Option<Rgb> {
    if let Color::Rgb(r, g, b) = color {
        Some((r, g, b))
    } else {
        None
    }
}
