//! Visual regression tests for the dashboard
//!
//! Every tab is rendered headlessly through ratatui's `TestBackend` and the
//! resulting text frame is checked for its structure and key values.
//!
//! # Running
//! ```bash
//! cargo test --test visual_regression -- --nocapture
//! ```
//!
//! # Golden Baseline Approach
//!
//! 1. Render each tab at the default snapshot size
//! 2. Check the page chrome (header, tabs, footer) on every tab
//! 3. Check each tab shows its own content and nothing from the others
//! 4. Check plotted cells and legends by symbol and colour in the buffer

use bitskip_viz::app::{App, Tab};
use bitskip_viz::charts::{
    EarlyExitScatter, IntrinsicChart, QualityDropChart, INTRINSIC_SERIES, VARIANCE_SERIES,
};
use bitskip_viz::dataset::{self, Variant};
use bitskip_viz::palette;
use bitskip_viz::tui::{render_to_buffer, render_to_string, TuiConfig};
use bitskip_viz::DashboardError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::Rect;
use ratatui::style::Color;

// ============================================================================
// GOLDEN BASELINE DEFINITIONS
// ============================================================================

/// Render `tab` at the default snapshot size
fn snapshot(tab: Tab) -> String {
    let config = TuiConfig::default();
    render_to_string(&App::new(tab), config.width, config.height).expect("render")
}

/// Heading that only appears on its own tab
fn unique_heading(tab: Tab) -> &'static str {
    match tab {
        Tab::Overview => "Can we skip layers in quantized models?",
        Tab::Intrinsic => "Intrinsic Analysis (Standard Training)",
        Tab::EarlyExit => "Early Exit & Co-Design Results",
    }
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

/// Render `tab` at the default snapshot size, keeping cell styles
fn cells(tab: Tab) -> Buffer {
    let config = TuiConfig::default();
    render_to_buffer(&App::new(tab), config.width, config.height).expect("render")
}

/// Top-left cell of the first occurrence of `text` inside `area`
fn find_text(buffer: &Buffer, area: Rect, text: &str) -> Option<(u16, u16)> {
    let needle: Vec<String> = text.chars().map(String::from).collect();
    for y in area.top()..area.bottom() {
        let row: Vec<&str> = (area.left()..area.right())
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        let hit = row
            .windows(needle.len())
            .position(|w| w.iter().zip(&needle).all(|(a, b)| *a == b.as_str()));
        if let Some(i) = hit {
            return Some((area.left() + i as u16, y));
        }
    }
    None
}

/// Bordered panel whose top border carries `title`
fn panel_rect(buffer: &Buffer, title: &str) -> Rect {
    let (tx, top) = find_text(buffer, buffer.area, title)
        .unwrap_or_else(|| panic!("panel '{title}' not rendered"));
    let left = (0..tx)
        .rev()
        .find(|&x| buffer[(x, top)].symbol() == "┌")
        .expect("top-left corner");
    let right = (tx..buffer.area.right())
        .find(|&x| buffer[(x, top)].symbol() == "┐")
        .expect("top-right corner");
    let bottom = (top + 1..buffer.area.bottom())
        .find(|&y| buffer[(left, y)].symbol() == "└")
        .expect("bottom-left corner");
    Rect::new(left, top, right - left + 1, bottom - top + 1)
}

/// Cells strictly inside a panel's border
fn interior<'a>(buffer: &'a Buffer, panel: Rect) -> impl Iterator<Item = &'a Cell> + 'a {
    (panel.top() + 1..panel.bottom() - 1).flat_map(move |y| {
        (panel.left() + 1..panel.right() - 1).map(move |x| &buffer[(x, y)])
    })
}

fn is_braille(cell: &Cell) -> bool {
    cell.symbol()
        .chars()
        .next()
        .is_some_and(|c| ('\u{2801}'..='\u{28FF}').contains(&c))
}

/// Assert `text` is drawn inside `panel` entirely in `color`
fn assert_text_color(buffer: &Buffer, panel: Rect, text: &str, color: Color) {
    let (x, y) = find_text(buffer, panel, text)
        .unwrap_or_else(|| panic!("'{text}' missing from panel at {panel:?}"));
    for offset in 0..text.chars().count() as u16 {
        assert_eq!(
            buffer[(x + offset, y)].fg,
            color,
            "'{text}' cell {offset} has the wrong colour"
        );
    }
}

/// Blank interior rows between the last drawn row and the bottom border
fn trailing_blank_rows(buffer: &Buffer, panel: Rect) -> u16 {
    (panel.top() + 1..panel.bottom() - 1)
        .rev()
        .take_while(|&y| {
            (panel.left() + 1..panel.right() - 1).all(|x| buffer[(x, y)].symbol() == " ")
        })
        .count() as u16
}

// ============================================================================
// PAGE CHROME
// ============================================================================

#[test]
fn test_chrome_present_on_every_tab() {
    println!("Page chrome on every tab");

    let required = [
        ("Title", "BitSkip Visualizer"),
        ("Attribution", "Bhuvaneswaran & Liu (2025)"),
        ("Tab 1", "Overview & Architecture"),
        ("Tab 2", "Phase 1: Intrinsic Analysis"),
        ("Tab 3", "Phase 2: Early Exit Results"),
        ("Footer", "Data extracted from tables 1-5 and figures in the paper."),
        ("Key hints", "q quit"),
    ];

    for tab in Tab::ALL {
        let output = snapshot(tab);
        for (name, expected) in required {
            assert!(
                output.contains(expected),
                "{:?}: missing {}: '{}'",
                tab,
                name,
                expected
            );
        }
        println!("  ✓ {:?}", tab);
    }
}

#[test]
fn test_frame_dimensions() {
    let config = TuiConfig::default();
    for tab in Tab::ALL {
        let output = snapshot(tab);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), config.height as usize);
        for (i, line) in lines.iter().enumerate() {
            assert!(
                line.chars().count() <= config.width as usize,
                "{:?} line {} too wide",
                tab,
                i
            );
        }
    }
}

// ============================================================================
// VIEW EXCLUSIVITY
// ============================================================================

#[test]
fn test_exactly_one_view_rendered() {
    println!("View exclusivity");

    for tab in Tab::ALL {
        let output = snapshot(tab);
        for other in Tab::ALL {
            let heading = unique_heading(other);
            assert_eq!(
                output.contains(heading),
                tab == other,
                "{:?} snapshot and heading of {:?}",
                tab,
                other
            );
        }
        println!("  ✓ {:?} shows only its own view", tab);
    }
}

// ============================================================================
// TAB CONTENT
// ============================================================================

#[test]
fn test_overview_content() {
    let output = snapshot(Tab::Overview);

    println!("=== GOLDEN BASELINE: Overview ===");
    println!("{}", output);
    println!("=== END BASELINE ===");

    for expected in [
        "Architectural Variants",
        "Key Research Questions",
        "The Winner: BitSkip-V1",
        "Efficiency",
        "Dynamic Routing",
        "Hadamard Risks",
        "PERPLEXITY",
        "+32.5%",
    ] {
        assert!(output.contains(expected), "Missing '{}'", expected);
    }
}

#[test]
fn test_intrinsic_content() {
    let output = snapshot(Tab::Intrinsic);

    println!("=== GOLDEN BASELINE: Intrinsic ===");
    println!("{}", output);
    println!("=== END BASELINE ===");

    for expected in [
        "PHASE 1",
        "The Variance-Quality Paradox",
        "Intrinsic Quality",
        "Activation variance across layers",
        "PPL axis (log)",
    ] {
        assert!(output.contains(expected), "Missing '{}'", expected);
    }
    assert!(
        !output.contains("Summary Table"),
        "Early-exit table leaked into intrinsic view"
    );
}

#[test]
fn test_early_exit_content() {
    let output = snapshot(Tab::EarlyExit);

    println!("=== GOLDEN BASELINE: Early Exit ===");
    println!("{}", output);
    println!("=== END BASELINE ===");

    let required = [
        ("Badge", "PHASE 2"),
        ("Tile", "Optimal Layer"),
        ("Tile value", "48.3%"),
        ("Scatter", "Early Exit Efficiency"),
        ("Ranking", "Quality Degradation at Layer 18"),
        ("Table", "Summary Table: Quality-Speed Tradeoff"),
        ("Best ratio", "0.80x (Best)"),
        ("Verdict", "Excellent"),
        ("Llama row", "Llama3 FP32"),
    ];
    for (name, expected) in required {
        assert!(output.contains(expected), "Missing {}: '{}'", name, expected);
    }
}

#[test]
fn test_v2_point_inside_scatter_domain() {
    // 301.67 lies inside [1, 1000] and must not be dropped
    let output = snapshot(Tab::EarlyExit);
    assert!(output.contains("301.67"));
}

#[test]
fn test_scatter_details_keep_gain() {
    let output = snapshot(Tab::EarlyExit);
    for perplexity in ["301.67", "481.60"] {
        let line = output
            .lines()
            .find(|l| l.contains(perplexity))
            .unwrap_or_else(|| panic!("no detail line for {perplexity}"));
        assert!(line.contains("+33.2%"), "gain cut from '{line}'");
        assert!(line.contains("tok/s"), "speed cut from '{line}'");
    }
}

#[test]
fn test_intrinsic_lists_every_v2_value() {
    let output = snapshot(Tab::Intrinsic);
    for m in dataset::intrinsic_measurements() {
        let value = m.perplexity(Variant::V2).expect("v2 measured");
        let text = format!("{value:.2}");
        assert!(output.contains(&text), "{}: '{}' missing", m.depth_label, text);
    }
    // decade ticks between the endpoints
    for tick in ["100", "1000", "10.0k", "100.0k"] {
        assert!(output.contains(tick), "axis tick '{}' missing", tick);
    }
}

#[test]
fn test_chart_captions_not_cut() {
    // last word of each caption, wrapping may split earlier phrases
    let intrinsic = snapshot(Tab::Intrinsic);
    for expected in ["capability.", "magnitude."] {
        assert!(intrinsic.contains(expected), "caption cut before '{}'", expected);
    }
    let early_exit = snapshot(Tab::EarlyExit);
    for expected in ["trade-off.", "better)."] {
        assert!(early_exit.contains(expected), "caption cut before '{}'", expected);
    }
}

#[test]
fn test_overview_bottom_panels_fit_content() {
    let buffer = cells(Tab::Overview);
    let questions = panel_rect(&buffer, "Key Research Questions");
    let winner = panel_rect(&buffer, "The Winner: BitSkip-V1");
    assert_eq!(questions.height, winner.height);

    assert!(find_text(&buffer, questions, "models?").is_some());
    assert!(trailing_blank_rows(&buffer, questions) <= 1, "{questions:?}");
    assert!(trailing_blank_rows(&buffer, winner) <= 2, "{winner:?}");
}

// ============================================================================
// PLOTTED CELLS
// ============================================================================

#[test]
fn test_scatter_plots_every_point() {
    println!("Scatter points by colour");

    let buffer = cells(Tab::EarlyExit);
    let panel = panel_rect(&buffer, "Phase 2: Early Exit Efficiency (Layer 18)");
    let scatter = EarlyExitScatter::encode(dataset::early_exit_results());

    for point in &scatter.points {
        let plotted = interior(&buffer, panel).any(|c| c.symbol() == "█" && c.fg == point.color);
        assert!(plotted, "{} has no plotted cell", point.name);
        println!("  ✓ {}", point.name);
    }
    // V2 and V3 share a speed, both must stay visible
    let rose = interior(&buffer, panel).filter(|c| c.symbol() == "█" && c.fg == palette::ROSE);
    assert!(rose.count() >= 1);
}

#[test]
fn test_scatter_points_visible_at_other_sizes() {
    let scatter = EarlyExitScatter::encode(dataset::early_exit_results());
    for (width, height) in [(140u16, 48u16), (160, 60)] {
        let buffer = render_to_buffer(&App::new(Tab::EarlyExit), width, height).expect("render");
        let panel = panel_rect(&buffer, "Phase 2: Early Exit Efficiency (Layer 18)");
        for point in &scatter.points {
            assert!(
                interior(&buffer, panel).any(|c| c.symbol() == "█" && c.fg == point.color),
                "{} hidden at {}x{}",
                point.name,
                width,
                height
            );
        }
    }
}

#[test]
fn test_intrinsic_bars_and_legend_colours() {
    let buffer = cells(Tab::Intrinsic);
    let panel = panel_rect(&buffer, "Phase 1: Intrinsic Quality (Lower is Better)");

    for variant in INTRINSIC_SERIES {
        assert!(
            interior(&buffer, panel).any(|c| c.symbol() == "█" && c.fg == variant.color()),
            "no {:?} bar",
            variant
        );
        assert_text_color(&buffer, panel, variant.label(), variant.color());
    }
    assert_text_color(&buffer, panel, "BitSkip-V2 (4-bit + H)", palette::ROSE);

    let chart = IntrinsicChart::encode(dataset::intrinsic_measurements());
    let v2 = chart
        .series
        .iter()
        .find(|s| s.variant == Variant::V2)
        .expect("v2 series");
    for value in v2.values.iter().flatten() {
        assert_text_color(&buffer, panel, &format!("{value:.2}"), palette::ROSE);
    }
}

#[test]
fn test_variance_lines_and_legend_colours() {
    let buffer = cells(Tab::Intrinsic);
    let panel = panel_rect(&buffer, "The Variance-Quality Paradox");

    for variant in VARIANCE_SERIES {
        assert!(
            interior(&buffer, panel).any(|c| is_braille(c) && c.fg == variant.color()),
            "no {:?} line cells",
            variant
        );
        assert_text_color(&buffer, panel, variant.label(), variant.color());
    }
    assert_text_color(&buffer, panel, "BitSkip-V3 (8-bit + H)", palette::AMBER);
}

#[test]
fn test_ranking_bars_coloured_by_class() {
    let buffer = cells(Tab::EarlyExit);
    let panel = panel_rect(&buffer, "Quality Degradation at Layer 18");
    let chart = QualityDropChart::encode(dataset::early_exit_results());

    for bar in &chart.bars {
        let color = bar.class.color();
        let (x, y) = find_text(&buffer, panel, bar.name)
            .unwrap_or_else(|| panic!("no bar label for {}", bar.name));
        let start = x + bar.name.chars().count() as u16;
        let drawn = (start..panel.right() - 1).any(|x| {
            let cell = &buffer[(x, y)];
            (cell.symbol() == "█" && cell.fg == color) || cell.bg == color
        });
        assert!(drawn, "{} bar not drawn in {:?}", bar.name, color);
    }
}

// ============================================================================
// INTERACTION
// ============================================================================

#[test]
fn test_key_navigation_changes_rendered_view() {
    println!("Key navigation");

    let mut app = App::default();
    let steps = [
        (KeyCode::Char('3'), Tab::EarlyExit),
        (KeyCode::Tab, Tab::Overview),
        (KeyCode::BackTab, Tab::EarlyExit),
        (KeyCode::Left, Tab::Intrinsic),
        (KeyCode::Char('2'), Tab::Intrinsic),
    ];

    for (key, expected) in steps {
        press(&mut app, key);
        assert_eq!(app.active_tab(), expected, "after {:?}", key);
        let output = render_to_string(&app, 120, 48).expect("render");
        assert!(output.contains(unique_heading(expected)));
        println!("  ✓ {:?} -> {:?}", key, expected);
    }
}

#[test]
fn test_repeated_selection_renders_identically() {
    let mut app = App::new(Tab::Intrinsic);
    let before = render_to_string(&app, 120, 48).expect("render");
    app.select(Tab::Intrinsic);
    let after = render_to_string(&app, 120, 48).expect("render");
    assert_eq!(before, after);
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_zero_dimensions_rejected() {
    for (w, h) in [(0, 48), (120, 0)] {
        let err = render_to_string(&App::default(), w, h).unwrap_err();
        assert!(
            matches!(err, DashboardError::InvalidDimensions { width, height } if width == w && height == h)
        );
    }
}
