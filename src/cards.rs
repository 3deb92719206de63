//! Card renderers: the architecture grid and metric tiles

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::dataset::{ArchitectureVariant, DisplayCategory};
use crate::palette;

// ============================================================================
// Architecture cards
// ============================================================================

/// Card colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardStyle {
    /// Winner
    Emerald,
    /// Catastrophic failure
    Rose,
    /// Control run
    Amber,
    /// Baseline, and the fallback style
    Neutral,
}

impl CardStyle {
    /// Fixed four-way mapping from display category
    #[must_use]
    pub const fn for_category(category: DisplayCategory) -> Self {
        match category {
            DisplayCategory::Primary => CardStyle::Emerald,
            DisplayCategory::DegradedAggressive => CardStyle::Rose,
            DisplayCategory::DegradedHybrid => CardStyle::Amber,
            DisplayCategory::Baseline => CardStyle::Neutral,
        }
    }

    /// Card border colour
    #[must_use]
    pub const fn border(self) -> Color {
        match self {
            CardStyle::Emerald => palette::EMERALD,
            CardStyle::Rose => palette::ROSE,
            CardStyle::Amber => palette::AMBER,
            CardStyle::Neutral => palette::BORDER,
        }
    }

    /// Badge colours `(fg, bg)`; only the winner gets a coloured badge
    #[must_use]
    pub const fn badge(self) -> (Color, Color) {
        match self {
            CardStyle::Emerald => (Color::Black, palette::EMERALD),
            _ => (palette::TEXT, palette::SLATE),
        }
    }
}

/// Render one card per architecture side by side
pub fn render_architecture_cards(
    f: &mut Frame<'_>,
    area: Rect,
    architectures: &[ArchitectureVariant],
) {
    if architectures.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = architectures
        .iter()
        .map(|_| Constraint::Ratio(1, architectures.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (arch, column) in architectures.iter().zip(columns.iter()) {
        render_architecture_card(f, *column, arch);
    }
}

fn render_architecture_card(f: &mut Frame<'_>, area: Rect, arch: &ArchitectureVariant) {
    let style = CardStyle::for_category(arch.display_category);
    let (badge_fg, badge_bg) = style.badge();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(style.border()))
        .title(Span::styled(
            format!(" {} ", arch.name),
            Style::default()
                .fg(palette::TEXT)
                .add_modifier(Modifier::BOLD),
        ));

    let hadamard = if arch.uses_hadamard {
        Span::styled(
            "Yes",
            Style::default()
                .fg(palette::ROSE)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("No", Style::default().fg(palette::TEXT))
    };

    let label = |text: &'static str| Span::styled(text, Style::default().fg(palette::MUTED));
    let lines = vec![
        Line::from(Span::styled(
            format!(" {} ", arch.short_label),
            Style::default().fg(badge_fg).bg(badge_bg),
        )),
        Line::from(Span::styled(
            arch.description,
            Style::default().fg(palette::MUTED),
        )),
        Line::from(""),
        Line::from(vec![
            label("Weights      "),
            Span::raw(arch.weight_precision),
        ]),
        Line::from(vec![
            label("Activations  "),
            Span::raw(arch.activation_precision),
        ]),
        Line::from(vec![label("Hadamard     "), hadamard]),
        Line::from(vec![label("Params       "), Span::raw(arch.parameter_count)]),
    ];

    let card = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(card, area);
}

// ============================================================================
// Metric tile
// ============================================================================

/// Direction of a headline metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Positive
    Up,
    /// Negative
    Down,
    /// Informational
    Neutral,
}

impl Trend {
    /// Icon and accent colour
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Trend::Up => palette::EMERALD,
            Trend::Down => palette::ROSE,
            Trend::Neutral => palette::BLUE,
        }
    }
}

/// Tile icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Layer stack
    Layers,
    /// Lightning bolt
    Zap,
    /// Rising arrow
    TrendingUp,
    /// Warning triangle
    AlertTriangle,
}

impl Icon {
    /// Single-column glyph
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Icon::Layers => "≡",
            Icon::Zap => "ϟ",
            Icon::TrendingUp => "↗",
            Icon::AlertTriangle => "▲",
        }
    }
}

/// A labelled headline metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricTile {
    /// Caption above the value
    pub title: &'static str,
    /// Headline value
    pub value: &'static str,
    /// Optional footnote
    pub subtext: Option<&'static str>,
    /// Icon
    pub icon: Icon,
    /// Colour selector
    pub trend: Trend,
}

/// Render a metric tile
pub fn render_metric_tile(f: &mut Frame<'_>, area: Rect, tile: &MetricTile) {
    let accent = tile.trend.color();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette::BORDER));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", tile.icon.glyph()),
                Style::default().fg(Color::Black).bg(accent),
            ),
            Span::raw(" "),
            Span::styled(tile.title, Style::default().fg(palette::MUTED)),
        ]),
        Line::from(Span::styled(
            tile.value,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(subtext) = tile.subtext {
        lines.push(Line::from(Span::styled(
            subtext,
            Style::default().fg(palette::MUTED),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
