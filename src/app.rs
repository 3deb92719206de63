//! View controller
//!
//! Holds the only interactive state (the active tab) and composes the page:
//! header, tab bar, exactly one view body, footer and status line.
//!
//! ```text
//! ┌ BitSkip Visualizer ─────────────────────────── Bhuvaneswaran & Liu ┐
//! │ Overview & Architecture │ Phase 1: Intrinsic │ Phase 2: Early Exit │
//! ├────────────────────────────────────────────────────────────────────┤
//! │                        active view body                            │
//! ├────────────────────────────────────────────────────────────────────┤
//! │                 provenance footer + key hints                      │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use tracing::debug;

use crate::cards::{self, Icon, MetricTile, Trend};
use crate::charts::{EarlyExitScatter, IntrinsicChart, QualityDropChart, VarianceChart};
use crate::dataset::{self, Viability};
use crate::palette;

// ============================================================================
// State
// ============================================================================

/// Top-level view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Tab {
    /// Overview & Architecture
    #[default]
    Overview,
    /// Phase 1: Intrinsic Analysis
    Intrinsic,
    /// Phase 2: Early Exit Results
    #[value(name = "earlyexit")]
    EarlyExit,
}

impl Tab {
    /// All tabs in navigation order
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Intrinsic, Tab::EarlyExit];

    /// Navigation control label
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview & Architecture",
            Tab::Intrinsic => "Phase 1: Intrinsic Analysis",
            Tab::EarlyExit => "Phase 2: Early Exit Results",
        }
    }

    /// Position in the tab bar
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Intrinsic => 1,
            Tab::EarlyExit => 2,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Application state
#[derive(Debug, Clone, Default)]
pub struct App {
    active_tab: Tab,
    should_quit: bool,
}

impl App {
    /// App starting on `tab`
    #[must_use]
    pub fn new(tab: Tab) -> Self {
        Self {
            active_tab: tab,
            should_quit: false,
        }
    }

    /// Currently displayed tab
    #[must_use]
    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// Whether the event loop should exit
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Switch to `tab`; selecting the active tab is a no-op
    pub fn select(&mut self, tab: Tab) {
        if tab != self.active_tab {
            debug!(from = ?self.active_tab, to = ?tab, "tab selected");
            self.active_tab = tab;
        }
    }

    /// Cycle forward
    pub fn next_tab(&mut self) {
        self.select(self.active_tab.next());
    }

    /// Cycle backward
    pub fn prev_tab(&mut self) {
        self.select(self.active_tab.prev());
    }

    /// Apply a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            },
            KeyCode::Char('1') => self.select(Tab::Overview),
            KeyCode::Char('2') => self.select(Tab::Intrinsic),
            KeyCode::Char('3') => self.select(Tab::EarlyExit),
            KeyCode::Tab | KeyCode::Right => self.next_tab(),
            KeyCode::BackTab | KeyCode::Left => self.prev_tab(),
            _ => {},
        }
    }
}

// ============================================================================
// Page composition
// ============================================================================

/// Draw the whole page for the current state
pub fn ui(f: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // View body
            Constraint::Length(3), // Footer
            Constraint::Length(1), // Status
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_tabs(f, chunks[1], app);

    // exactly one body is composed, the others are never drawn
    match app.active_tab {
        Tab::Overview => render_overview(f, chunks[2]),
        Tab::Intrinsic => render_intrinsic(f, chunks[2]),
        Tab::EarlyExit => render_early_exit(f, chunks[2]),
    }

    render_footer(f, chunks[3]);
    render_status(f, chunks[4], app);
}

fn render_header(f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette::BORDER));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(inner);

    let title = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" ▣ ", Style::default().fg(Color::White).bg(palette::INDIGO)),
            Span::raw(" "),
            Span::styled(
                "BitSkip Visualizer",
                Style::default()
                    .fg(palette::TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            "Based on \"BitSkip: An Empirical Analysis of Quantization and Early Exit Composition\"",
            Style::default().fg(palette::MUTED),
        )),
    ]);
    f.render_widget(title, chunks[0]);

    let attribution = Paragraph::new("Bhuvaneswaran & Liu (2025)")
        .style(Style::default().fg(palette::MUTED))
        .alignment(Alignment::Right);
    f.render_widget(attribution, chunks[1]);
}

fn render_tabs(f: &mut Frame<'_>, area: Rect, app: &App) {
    let titles: Vec<Line<'_>> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} [{}]", t.title(), i + 1)))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette::BORDER)),
        )
        .select(app.active_tab.index())
        .style(Style::default().fg(palette::MUTED))
        .highlight_style(
            Style::default()
                .fg(palette::INDIGO)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, area: Rect) {
    let footer = Paragraph::new(vec![
        Line::from(
            "Visualization of \"BitSkip: An Empirical Analysis of Quantization and Early Exit Composition\".",
        ),
        Line::from("Data extracted from tables 1-5 and figures in the paper."),
    ])
    .style(Style::default().fg(palette::MUTED))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(palette::BORDER)),
    );
    f.render_widget(footer, area);
}

fn render_status(f: &mut Frame<'_>, area: Rect, app: &App) {
    let status = Line::from(vec![
        Span::styled(
            format!(" {} ", app.active_tab.title()),
            Style::default().fg(Color::White).bg(palette::INDIGO),
        ),
        Span::styled(
            "  1/2/3 select view | Tab/Shift+Tab cycle | q quit",
            Style::default().fg(palette::MUTED),
        ),
    ]);
    f.render_widget(Paragraph::new(status), area);
}

/// Small coloured badge followed by a bold heading
fn section_heading(badge: &'static str, badge_color: Color, heading: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {badge} "),
            Style::default()
                .fg(Color::Black)
                .bg(badge_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            heading,
            Style::default()
                .fg(palette::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

// ============================================================================
// Overview
// ============================================================================

const RESEARCH_QUESTIONS: [&str; 3] = [
    "Do quantization and dynamic routing interact multiplicatively or destructively?",
    "Does the Hadamard transform help or hurt early exit viability?",
    "Can we predict \"safe\" early exit points in quantized models?",
];

fn render_overview(f: &mut Frame<'_>, area: Rect) {
    let questions = questions_panel();
    let winner = winner_panel();
    // bottom row fits its taller panel, leftover space stays below it
    // line_count wraps at the width it is given, borders excluded
    let half = (area.width / 2).saturating_sub(2);
    let bottom_rows = questions.line_count(half).max(winner.line_count(half));
    let bottom_rows = u16::try_from(bottom_rows).unwrap_or(u16::MAX);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),           // Hero
            Constraint::Length(1),           // Heading
            Constraint::Length(11),          // Cards
            Constraint::Length(bottom_rows), // Questions + winner
            Constraint::Min(0),
        ])
        .split(area);

    let strong = Style::default().fg(palette::EMERALD).add_modifier(Modifier::BOLD);
    let hero = Paragraph::new(vec![
        Line::from(Span::styled(
            "Can we skip layers in quantized models?",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("BitSkip introduces a framework to explore the interaction between "),
            Span::styled("Quantization", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" and "),
            Span::styled("Early Exit", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(". The findings are counter-intuitive: a simple 8-bit model outperforms complex Hadamard-enhanced variants, achieving "),
            Span::styled("32.5% speedup", strong),
            Span::raw(" with only "),
            Span::styled("4% quality loss", strong),
            Span::raw("."),
        ]),
        Line::from(vec![
            Span::styled(" ϟ Efficiency ", Style::default().fg(palette::AMBER)),
            Span::raw(" "),
            Span::styled(" ↗ Dynamic Routing ", Style::default().fg(palette::EMERALD)),
            Span::raw(" "),
            Span::styled(" ▲ Hadamard Risks ", Style::default().fg(palette::ROSE)),
        ]),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(palette::INDIGO)),
    );
    f.render_widget(hero, chunks[0]);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("▤ ", Style::default().fg(palette::INDIGO)),
            Span::styled(
                "Architectural Variants",
                Style::default()
                    .fg(palette::TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
        ])),
        chunks[1],
    );

    cards::render_architecture_cards(f, chunks[2], dataset::architectures());

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    f.render_widget(questions, bottom[0]);
    f.render_widget(winner, bottom[1]);
}

fn questions_panel() -> Paragraph<'static> {
    let questions: Vec<Line<'static>> = RESEARCH_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| {
            Line::from(vec![
                Span::styled(
                    format!(" {} ", i + 1),
                    Style::default().fg(Color::White).bg(palette::INDIGO),
                ),
                Span::raw(" "),
                Span::raw(*q),
            ])
        })
        .collect();
    Paragraph::new(questions).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette::BORDER))
            .title(" Key Research Questions "),
    )
}

fn winner_panel() -> Paragraph<'static> {
    let winner = dataset::early_exit_result(dataset::Variant::V1);
    let arch = dataset::architectures()
        .iter()
        .find(|a| a.variant == dataset::Variant::V1);
    let hadamard = match arch {
        Some(a) if a.uses_hadamard => "Yes",
        _ => "No",
    };

    let figure = Style::default()
        .fg(palette::EMERALD)
        .add_modifier(Modifier::BOLD);
    let caption = Style::default().fg(palette::MUTED);
    let lines = vec![
        Line::from(Span::styled(
            "Unlike the hypothesis that complex transformations (Hadamard) are needed for low-bit stability, the simplest approach won.",
            Style::default().fg(palette::TEXT),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{:.2}", winner.base_perplexity), figure),
            Span::styled(" PERPLEXITY   ", caption),
            Span::styled(format!("+{:.1}%", winner.speed_gain_percent), figure),
            Span::styled(" SPEED   ", caption),
            Span::styled(hadamard, figure),
            Span::styled(" HADAMARD", caption),
        ]),
    ];
    Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette::EMERALD))
            .title(Span::styled(
                " The Winner: BitSkip-V1 ",
                Style::default()
                    .fg(palette::EMERALD)
                    .add_modifier(Modifier::BOLD),
            )),
    )
}

// ============================================================================
// Phase 1
// ============================================================================

fn render_intrinsic(f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Heading
            Constraint::Length(2), // Explanation
            Constraint::Min(10),   // Charts
            Constraint::Length(6), // Callout
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(section_heading(
            "PHASE 1",
            palette::BLUE,
            "Intrinsic Analysis (Standard Training)",
        )),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(
            "Before adding early-exit capabilities, the authors tested the base stability of the architectures. \
             The results revealed a massive instability in the Hadamard-based models (V2).",
        )
        .style(Style::default().fg(palette::MUTED))
        .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    IntrinsicChart::encode(dataset::intrinsic_measurements()).render(f, charts[0]);
    VarianceChart::encode(dataset::variance_samples()).render(f, charts[1]);

    let callout = Paragraph::new(vec![Line::from(vec![
        Span::raw("The variance chart shows BitSkip-V3 (amber) has extremely stable activation variance (~1.5). "),
        Span::raw("Ideally, this should mean stable training. However, it performed poorly. "),
        Span::raw("BitSkip-V1 (green) had increasing variance but excellent quality. "),
        Span::styled("Conclusion:", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" Statistical stability does not guarantee representational quality."),
    ])])
    .style(Style::default().fg(palette::ROSE))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(palette::ROSE))
            .title(Span::styled(
                " ▲ The Variance-Quality Paradox ",
                Style::default()
                    .fg(palette::ROSE)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(callout, chunks[3]);
}

// ============================================================================
// Phase 2
// ============================================================================

/// Headline tiles of the early-exit view
pub const EARLY_EXIT_TILES: [MetricTile; 4] = [
    MetricTile {
        title: "Optimal Layer",
        value: "18",
        subtext: Some("out of 24 layers"),
        icon: Icon::Layers,
        trend: Trend::Neutral,
    },
    MetricTile {
        title: "V1 Speedup",
        value: "32.5%",
        subtext: Some("at Layer 18"),
        icon: Icon::Zap,
        trend: Trend::Up,
    },
    MetricTile {
        title: "V1 Quality Loss",
        value: "4.0%",
        subtext: Some("PPL Increase vs Full"),
        icon: Icon::TrendingUp,
        trend: Trend::Down,
    },
    MetricTile {
        title: "Llama3 Quality Loss",
        value: "48.3%",
        subtext: Some("PPL Increase vs Full"),
        icon: Icon::AlertTriangle,
        trend: Trend::Down,
    },
];

fn render_early_exit(f: &mut Frame<'_>, area: Rect) {
    let table_height = dataset::summary_rows().len() as u16 + 4;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Heading
            Constraint::Length(2),            // Explanation
            Constraint::Length(5),            // Tiles
            Constraint::Min(10),              // Charts
            Constraint::Length(table_height), // Summary table
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(section_heading(
            "PHASE 2",
            palette::PURPLE,
            "Early Exit & Co-Design Results",
        )),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(
            "Training with the \"Early Exit Loss\" objective. BitSkip-V1 outperforms the full precision baseline \
             because 8-bit quantization acts as a regularizer, making the model more robust to layer skipping.",
        )
        .style(Style::default().fg(palette::MUTED))
        .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[2]);
    for (tile, slot) in EARLY_EXIT_TILES.iter().zip(tiles.iter()) {
        cards::render_metric_tile(f, *slot, tile);
    }

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    EarlyExitScatter::encode(dataset::early_exit_results()).render(f, charts[0]);
    QualityDropChart::encode(dataset::early_exit_results()).render(f, charts[1]);

    render_summary_table(f, chunks[4]);
}

fn render_summary_table(f: &mut Frame<'_>, area: Rect) {
    let header_style = Style::default()
        .fg(palette::MUTED)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("MODEL"),
        Cell::from("QUALITY RANK"),
        Cell::from("SPEED RANK"),
        Cell::from("VIABILITY"),
        Cell::from("RATIO (Q/S)"),
    ])
    .style(header_style)
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row<'_>> = dataset::summary_rows()
        .iter()
        .map(|row| {
            let verdict = match row.viability {
                Viability::Excellent => palette::EMERALD,
                Viability::Poor => palette::ROSE,
            };
            let ratio_style = if row.best {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(row.model).style(Style::default().fg(row.variant.color())),
                Cell::from(row.quality_rank.to_string()),
                Cell::from(row.speed_rank.to_string()),
                Cell::from(row.viability.label()).style(Style::default().fg(verdict)),
                Cell::from(row.ratio_label()).style(ratio_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(24),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(22),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette::BORDER))
            .title(Span::styled(
                " Summary Table: Quality-Speed Tradeoff ",
                Style::default()
                    .fg(palette::TEXT)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(table, area);
}
