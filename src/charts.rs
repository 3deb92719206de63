//! Chart renderers
//!
//! Each chart is split in two steps:
//!
//! 1. `encode` binds a dataset slice to a plain encoding value (categories,
//!    series, projected coordinates, colours). This is pure and is what the
//!    tests inspect.
//! 2. `render` turns the encoding into ratatui widgets inside a titled panel.
//!
//! ```text
//! dataset ──encode──▶ IntrinsicChart ──render──▶ BarChart (log height)
//!         ──encode──▶ VarianceChart  ──render──▶ Chart (4 lines, 2 dashed)
//!         ──encode──▶ EarlyExitScatter ─render─▶ Chart (scatter, log y)
//!         ──encode──▶ QualityDropChart ─render─▶ BarChart (horizontal)
//! ```

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
    },
    Frame,
};

use crate::dataset::{EarlyExitResult, IntrinsicMeasurement, Variant, VarianceSample};
use crate::derive::{ceil_to, format_gain, LogScale};
use crate::palette;

/// Draw a bordered chart panel with a title and a one-paragraph caption,
/// returning the area left for the chart itself.
fn panel(f: &mut Frame<'_>, area: Rect, title: &str, caption: &str) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette::BORDER))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(palette::TEXT).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let caption = Paragraph::new(caption)
        .style(Style::default().fg(palette::MUTED))
        .wrap(Wrap { trim: true });
    // never let the caption take more than a third of the panel
    let caption_rows = u16::try_from(caption.line_count(inner.width))
        .unwrap_or(u16::MAX)
        .min(inner.height / 3)
        .max(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(caption_rows), Constraint::Min(0)])
        .split(inner);

    f.render_widget(caption, chunks[0]);
    chunks[1]
}

/// Coloured legend entries packed into lines of at most `width` columns.
///
/// An entry is never split across lines.
fn legend_lines(
    entries: impl IntoIterator<Item = (&'static str, Color)>,
    width: u16,
) -> Vec<Line<'static>> {
    const SEPARATOR: &str = "   ";
    let mut lines = Vec::new();
    let mut spans = Vec::new();
    let mut used = 0usize;
    for (label, color) in entries {
        let entry = label.chars().count() + 2;
        if used > 0 && used + SEPARATOR.len() + entry > usize::from(width) {
            lines.push(Line::from(std::mem::take(&mut spans)));
            used = 0;
        }
        if used > 0 {
            spans.push(Span::raw(SEPARATOR));
            used += SEPARATOR.len();
        }
        spans.push(Span::styled("■ ", Style::default().fg(color)));
        spans.push(Span::styled(label, Style::default().fg(color)));
        used += entry;
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

// ============================================================================
// Phase 1: intrinsic quality, grouped bars on a log axis
// ============================================================================

/// Variants plotted in the intrinsic chart. V3 has no intrinsic run.
pub const INTRINSIC_SERIES: [Variant; 3] = [Variant::Llama, Variant::V1, Variant::V2];

/// Bar height resolution: units per decade
const LOG_UNITS_PER_DECADE: f64 = 100.0;

/// One bar series across all depth categories
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// Series identity
    pub variant: Variant,
    /// Raw perplexity per category, `None` when not measured
    pub values: Vec<Option<f64>>,
}

/// Grouped-bar encoding of Table 3
#[derive(Debug, Clone, PartialEq)]
pub struct IntrinsicChart {
    /// Depth labels in dataset order
    pub categories: Vec<&'static str>,
    /// One series per plotted variant
    pub series: Vec<BarSeries>,
    /// Decade-aligned quality axis
    pub scale: LogScale,
}

impl IntrinsicChart {
    /// Bind intrinsic measurements to bar groups
    #[must_use]
    pub fn encode(measurements: &[IntrinsicMeasurement]) -> Self {
        let categories = measurements.iter().map(|m| m.depth_label).collect();
        let series: Vec<BarSeries> = INTRINSIC_SERIES
            .iter()
            .map(|&variant| BarSeries {
                variant,
                values: measurements.iter().map(|m| m.perplexity(variant)).collect(),
            })
            .collect();
        let scale = LogScale::covering(
            series
                .iter()
                .flat_map(|s| s.values.iter().flatten().copied()),
        );
        Self {
            categories,
            series,
            scale,
        }
    }

    /// Bar height for a raw value, measured from the axis floor
    #[must_use]
    pub fn bar_height(&self, value: f64) -> u64 {
        let [lo, _] = self.scale.bounds();
        ((self.scale.project_clamped(value) - lo) * LOG_UNITS_PER_DECADE).round() as u64
    }

    /// Height of the axis ceiling
    #[must_use]
    pub fn max_height(&self) -> u64 {
        let [lo, hi] = self.scale.bounds();
        ((hi - lo) * LOG_UNITS_PER_DECADE).round() as u64
    }

    /// Render inside a titled panel
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let inner = panel(
            f,
            area,
            "Phase 1: Intrinsic Quality (Lower is Better)",
            "Perplexity (PPL) without early-exit training. Log scale, BitSkip-V2 fails by orders of magnitude.",
        );
        let legend = legend_lines(
            self.series.iter().map(|s| (s.variant.label(), s.variant.color())),
            inner.width,
        );
        let values = self.value_lines();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(legend.len() as u16),
                Constraint::Length(values.len() as u16),
            ])
            .split(inner);

        let groups = self.categories.len().max(1) as u16;
        let bars_per_group = self.series.len().max(1) as u16;
        let bar_gap = 1;
        let group_gap = 3;
        let usable = chunks[0]
            .width
            .saturating_sub(group_gap * groups.saturating_sub(1))
            .saturating_sub(bar_gap * groups * bars_per_group.saturating_sub(1));
        let bar_width = (usable / (groups * bars_per_group)).clamp(1, 9);

        let mut chart = BarChart::default()
            .bar_width(bar_width)
            .bar_gap(bar_gap)
            .group_gap(group_gap)
            .max(self.max_height())
            .label_style(Style::default().fg(palette::SLATE));

        // exact values live in the table below, bars only carry height
        for (ci, category) in self.categories.iter().enumerate() {
            let bars: Vec<Bar<'_>> = self
                .series
                .iter()
                .map(|s| {
                    let height = s
                        .values
                        .get(ci)
                        .copied()
                        .flatten()
                        .map_or(0, |v| self.bar_height(v));
                    Bar::default()
                        .value(height)
                        .text_value(String::new())
                        .style(Style::default().fg(s.variant.color()))
                })
                .collect();
            chart = chart.data(BarGroup::default().label(Line::from(*category)).bars(&bars));
        }
        f.render_widget(chart, chunks[0]);

        let axis = format!(
            "PPL axis (log): {}",
            self.scale.decade_labels().join(" | ")
        );
        f.render_widget(
            Paragraph::new(axis).style(Style::default().fg(palette::MUTED)),
            chunks[1],
        );
        f.render_widget(Paragraph::new(legend), chunks[2]);
        f.render_widget(Paragraph::new(values), chunks[3]);
    }

    /// Header plus one row per depth with the exact perplexity of each series
    fn value_lines(&self) -> Vec<Line<'static>> {
        let header_style = Style::default()
            .fg(palette::MUTED)
            .add_modifier(Modifier::BOLD);
        let mut header = vec![Span::styled(format!("{:<11}", "PPL"), header_style)];
        header.extend(self.series.iter().map(|s| {
            Span::styled(
                format!("{:>10}", s.variant.short_name()),
                Style::default()
                    .fg(s.variant.color())
                    .add_modifier(Modifier::BOLD),
            )
        }));

        let mut lines = vec![Line::from(header)];
        for (ci, category) in self.categories.iter().enumerate() {
            let mut row = vec![Span::styled(
                format!("{category:<11}"),
                Style::default().fg(palette::SLATE),
            )];
            row.extend(self.series.iter().map(|s| {
                let text = s
                    .values
                    .get(ci)
                    .copied()
                    .flatten()
                    .map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
                Span::styled(format!("{text:>10}"), Style::default().fg(s.variant.color()))
            }));
            lines.push(Line::from(row));
        }
        lines
    }
}

// ============================================================================
// Figure 1: activation variance, one line per variant
// ============================================================================

/// Line stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// Continuous line
    Solid,
    /// Every other segment drawn
    Dashed,
}

impl Stroke {
    /// Hadamard variants are dashed: stabilized variance, poor quality
    #[must_use]
    pub const fn for_variant(variant: Variant) -> Self {
        if variant.uses_hadamard() {
            Stroke::Dashed
        } else {
            Stroke::Solid
        }
    }
}

/// Draw order of the variance lines
pub const VARIANCE_SERIES: [Variant; 4] = [Variant::Llama, Variant::V1, Variant::V2, Variant::V3];

/// One variance line
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    /// Series identity
    pub variant: Variant,
    /// Stroke pattern
    pub stroke: Stroke,
    /// Drawn bold
    pub emphasized: bool,
    /// `(layer, variance)` in ascending layer order
    pub points: Vec<(f64, f64)>,
}

impl LineSeries {
    /// Segments actually drawn: all of them when solid, alternating when dashed
    #[must_use]
    pub fn segments(&self) -> Vec<&[(f64, f64)]> {
        let step = match self.stroke {
            Stroke::Solid => return vec![self.points.as_slice()],
            Stroke::Dashed => 2,
        };
        self.points.windows(2).step_by(step).collect()
    }
}

/// Multi-line encoding of Figure 1
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceChart {
    /// One line per variant
    pub lines: Vec<LineSeries>,
    /// Layer axis bounds
    pub x_bounds: [f64; 2],
    /// Variance axis bounds
    pub y_bounds: [f64; 2],
}

impl VarianceChart {
    /// Bind variance samples to four lines
    #[must_use]
    pub fn encode(samples: &[VarianceSample]) -> Self {
        let lines: Vec<LineSeries> = VARIANCE_SERIES
            .iter()
            .map(|&variant| LineSeries {
                variant,
                stroke: Stroke::for_variant(variant),
                emphasized: variant == Variant::V1,
                points: samples
                    .iter()
                    .map(|s| (s.layer_index as f64, s.variance(variant)))
                    .collect(),
            })
            .collect();
        let x_max = samples.last().map_or(1.0, |s| s.layer_index as f64);
        let y_max = lines
            .iter()
            .flat_map(|l| l.points.iter().map(|&(_, y)| y))
            .fold(0.0, f64::max);
        Self {
            lines,
            x_bounds: [0.0, x_max],
            y_bounds: [0.0, ceil_to(y_max.max(1.0), 1.0)],
        }
    }

    /// Render inside a titled panel
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let inner = panel(
            f,
            area,
            "The Variance-Quality Paradox",
            "Activation variance across layers. Hadamard (V2, V3, dashed) stabilizes variance, yet destroys learning capability.",
        );

        let legend = legend_lines(
            self.lines.iter().map(|l| (l.variant.label(), l.variant.color())),
            inner.width,
        );
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(legend.len() as u16)])
            .split(inner);

        let mut datasets = Vec::new();
        for line in &self.lines {
            let mut style = Style::default().fg(line.variant.color());
            if line.emphasized {
                style = style.add_modifier(Modifier::BOLD);
            }
            // unnamed datasets: the legend is drawn below the chart
            for segment in line.segments() {
                datasets.push(
                    Dataset::default()
                        .marker(symbols::Marker::Braille)
                        .graph_type(GraphType::Line)
                        .style(style)
                        .data(segment),
                );
            }
        }

        let [x_lo, x_hi] = self.x_bounds;
        let [y_lo, y_hi] = self.y_bounds;
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("Layer Depth")
                    .style(Style::default().fg(palette::SLATE))
                    .bounds(self.x_bounds)
                    .labels(vec![
                        Span::raw(format!("{x_lo:.0}")),
                        Span::raw(format!("{:.0}", (x_lo + x_hi) / 2.0)),
                        Span::raw(format!("{x_hi:.0}")),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("Variance (std dev)")
                    .style(Style::default().fg(palette::SLATE))
                    .bounds(self.y_bounds)
                    .labels(vec![
                        Span::raw(format!("{y_lo:.1}")),
                        Span::raw(format!("{:.1}", (y_lo + y_hi) / 2.0)),
                        Span::raw(format!("{y_hi:.1}")),
                    ]),
            );
        f.render_widget(chart, chunks[0]);
        f.render_widget(Paragraph::new(legend), chunks[1]);
    }
}

// ============================================================================
// Phase 2: quality vs speed at layer 18
// ============================================================================

/// Columns taken by the y-axis labels and line
const SCATTER_AXIS_COLS: u16 = 8;

/// Rows taken by the x-axis labels, line and titles
const SCATTER_AXIS_ROWS: u16 = 4;

/// Perplexity axis domain of the scatter
pub const SCATTER_PPL_DOMAIN: [f64; 2] = [1.0, 1000.0];

/// One scatter point
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Point identity
    pub variant: Variant,
    /// Display name
    pub name: &'static str,
    /// Layer-18 speed (tok/s)
    pub speed: f64,
    /// Layer-18 perplexity
    pub perplexity: f64,
    /// Reported speed gain
    pub speed_gain_percent: f64,
    /// `(speed, log10 perplexity)`, unclamped
    pub position: (f64, f64),
    /// Point colour
    pub color: Color,
}

impl ScatterPoint {
    /// Detail line shown next to the chart
    #[must_use]
    pub fn detail(&self) -> String {
        format!(
            "{:<11} PPL {:>6.2}  {:>5.1} tok/s  {}",
            self.name,
            self.perplexity,
            self.speed,
            format_gain(self.speed_gain_percent)
        )
    }
}

/// Scatter encoding of Tables 4 and 5
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyExitScatter {
    /// One point per result
    pub points: Vec<ScatterPoint>,
    /// Speed axis bounds
    pub x_bounds: [f64; 2],
    /// Perplexity axis, clamped to [`SCATTER_PPL_DOMAIN`]
    pub y_scale: LogScale,
}

impl EarlyExitScatter {
    /// Bind early-exit results to scatter points
    #[must_use]
    pub fn encode(results: &[EarlyExitResult]) -> Self {
        let y_scale = LogScale::new(SCATTER_PPL_DOMAIN[0], SCATTER_PPL_DOMAIN[1]);
        let points: Vec<ScatterPoint> = results
            .iter()
            .map(|r| ScatterPoint {
                variant: r.variant,
                name: r.name,
                speed: r.layer18_speed,
                perplexity: r.layer18_perplexity,
                speed_gain_percent: r.speed_gain_percent,
                position: (r.layer18_speed, LogScale::project(r.layer18_perplexity)),
                color: r.display_color(),
            })
            .collect();
        let x_max = points.iter().map(|p| p.speed).fold(0.0, f64::max);
        Self {
            points,
            x_bounds: [0.0, ceil_to(x_max.max(1.0), 20.0)],
            y_scale,
        }
    }

    /// Plot coordinates for a chart area of `cols` x `rows` cells.
    ///
    /// A point that would land in the same terminal cell as an earlier one is
    /// shifted right one cell at a time until it has a cell of its own, so
    /// every point stays visible. [`ScatterPoint::position`] is unchanged.
    #[must_use]
    pub fn plot_positions(&self, cols: u16, rows: u16) -> Vec<(f64, f64)> {
        let [x_lo, x_hi] = self.x_bounds;
        let [y_lo, y_hi] = self.y_scale.bounds();
        // upper bounds on one cell in data units, the axes take the rest
        let cell_w = (x_hi - x_lo) / f64::from(cols.saturating_sub(SCATTER_AXIS_COLS).max(1));
        let cell_h = (y_hi - y_lo) / f64::from(rows.saturating_sub(SCATTER_AXIS_ROWS).max(1));

        let mut placed: Vec<(f64, f64)> = Vec::with_capacity(self.points.len());
        for point in &self.points {
            let (mut x, y) = point.position;
            while placed
                .iter()
                .any(|&(px, py)| (px - x).abs() < cell_w && (py - y).abs() < cell_h)
            {
                x += cell_w;
            }
            placed.push((x, y));
        }
        placed
    }

    /// Whether a point falls inside both axes
    #[must_use]
    pub fn is_visible(&self, point: &ScatterPoint) -> bool {
        let [x_lo, x_hi] = self.x_bounds;
        (x_lo..=x_hi).contains(&point.speed) && self.y_scale.contains(point.perplexity)
    }

    /// Render inside a titled panel
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let inner = panel(
            f,
            area,
            "Phase 2: Early Exit Efficiency (Layer 18)",
            "Quality (PPL, log scale) vs. Speed (tok/s). BitSkip-V1 dominates the trade-off.",
        );
        let detail_rows = self.points.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(detail_rows)])
            .split(inner);

        let positions = self.plot_positions(chunks[0].width, chunks[0].height);
        // unnamed datasets: the detail lines below act as the legend
        let datasets: Vec<Dataset<'_>> = self
            .points
            .iter()
            .zip(&positions)
            .map(|(p, position)| {
                Dataset::default()
                    .marker(symbols::Marker::Block)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(p.color))
                    .data(std::slice::from_ref(position))
            })
            .collect();

        let [x_lo, x_hi] = self.x_bounds;
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("Inference Speed (tok/s)")
                    .style(Style::default().fg(palette::SLATE))
                    .bounds(self.x_bounds)
                    .labels(vec![
                        Span::raw(format!("{x_lo:.0}")),
                        Span::raw(format!("{:.0}", (x_lo + x_hi) / 2.0)),
                        Span::raw(format!("{x_hi:.0}")),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("PPL (log)")
                    .style(Style::default().fg(palette::SLATE))
                    .bounds(self.y_scale.bounds())
                    .labels(
                        self.y_scale
                            .decade_labels()
                            .into_iter()
                            .map(Span::raw)
                            .collect::<Vec<_>>(),
                    ),
            );
        f.render_widget(chart, chunks[0]);

        let details: Vec<Line<'_>> = self
            .points
            .iter()
            .map(|p| {
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(p.color)),
                    Span::raw(p.detail()),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(details), chunks[1]);
    }
}

// ============================================================================
// Phase 2: quality degradation ranking
// ============================================================================

/// Degradation below this magnitude counts as acceptable
pub const DROP_THRESHOLD_PERCENT: f64 = 10.0;

/// Binary classification of a quality drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropClass {
    /// `|change| < 10`, drawn in the primary colour
    Acceptable,
    /// Everything else, drawn in the baseline colour
    Severe,
}

impl DropClass {
    /// Classify a signed perplexity change
    #[must_use]
    pub fn classify(change_percent: f64) -> Self {
        if change_percent.abs() < DROP_THRESHOLD_PERCENT {
            DropClass::Acceptable
        } else {
            DropClass::Severe
        }
    }

    /// Bar colour
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            DropClass::Acceptable => Variant::V1.color(),
            DropClass::Severe => Variant::Llama.color(),
        }
    }
}

/// One ranking bar
#[derive(Debug, Clone, PartialEq)]
pub struct RankingBar {
    /// Category label
    pub name: &'static str,
    /// `|perplexity change|` in percent
    pub magnitude: f64,
    /// Reported speed gain, for the detail line
    pub speed_gain_percent: f64,
    /// Colour class
    pub class: DropClass,
}

/// Horizontal ranking encoding of quality loss at layer 18
#[derive(Debug, Clone, PartialEq)]
pub struct QualityDropChart {
    /// One bar per result, dataset order
    pub bars: Vec<RankingBar>,
}

impl QualityDropChart {
    /// Bind early-exit results to ranking bars
    #[must_use]
    pub fn encode(results: &[EarlyExitResult]) -> Self {
        let bars = results
            .iter()
            .map(|r| RankingBar {
                name: r.name,
                magnitude: r.perplexity_change_percent.abs(),
                speed_gain_percent: r.speed_gain_percent,
                class: DropClass::classify(r.perplexity_change_percent),
            })
            .collect();
        Self { bars }
    }

    /// Render inside a titled panel
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let inner = panel(
            f,
            area,
            "Quality Degradation at Layer 18",
            "Percentage change in perplexity relative to the full model (lower drop is better).",
        );
        let detail_rows = self.bars.len() as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(detail_rows)])
            .split(inner);

        // tenths of a percent keep one decimal in the integer bar value
        let max_magnitude = self.bars.iter().map(|b| b.magnitude).fold(0.0, f64::max);
        let max_tenths = (ceil_to(max_magnitude.max(1.0), 10.0) * 10.0) as u64;

        let bars: Vec<Bar<'_>> = self
            .bars
            .iter()
            .map(|b| {
                let color = b.class.color();
                Bar::default()
                    .label(Line::from(b.name))
                    .value((b.magnitude * 10.0).round() as u64)
                    .text_value(format!("{:.1}%", b.magnitude))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();

        let chart = BarChart::default()
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(1)
            .max(max_tenths)
            .label_style(Style::default().fg(palette::SLATE))
            .data(BarGroup::default().bars(&bars));
        f.render_widget(chart, chunks[0]);

        let details: Vec<Line<'_>> = self
            .bars
            .iter()
            .map(|b| {
                Line::from(vec![
                    Span::raw(format!("{:<12} ", b.name)),
                    Span::raw("PPL Drop: "),
                    Span::styled(format!("{:.1}%", b.magnitude), Style::default().fg(palette::ROSE)),
                    Span::raw("  Speed Gain: "),
                    Span::styled(
                        format_gain(b.speed_gain_percent),
                        Style::default().fg(palette::EMERALD),
                    ),
                ])
            })
            .collect();
        f.render_widget(Paragraph::new(details), chunks[1]);
    }
}
