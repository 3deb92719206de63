//! Colour tokens shared by every renderer.
//!
//! The dashboard uses a small fixed palette. Variant colours double as
//! semantic colours: emerald is "good", rose is "bad", slate is neutral.

use ratatui::style::Color;

/// Emerald 500, the primary variant and positive trends
pub const EMERALD: Color = Color::Rgb(16, 185, 129);
/// Rose 500, the aggressive variant and negative trends
pub const ROSE: Color = Color::Rgb(244, 63, 94);
/// Amber 500, the hybrid-control variant
pub const AMBER: Color = Color::Rgb(245, 158, 11);
/// Slate 500, the baseline variant and neutral chrome
pub const SLATE: Color = Color::Rgb(100, 116, 139);
/// Blue 500, informational accents
pub const BLUE: Color = Color::Rgb(59, 130, 246);
/// Indigo 600, header and selected tab accent
pub const INDIGO: Color = Color::Rgb(79, 70, 229);
/// Purple 500, phase-two badge
pub const PURPLE: Color = Color::Rgb(168, 85, 247);
/// Slate 300, borders and grid lines
pub const BORDER: Color = Color::Rgb(203, 213, 225);
/// Slate 400, secondary text
pub const MUTED: Color = Color::Rgb(148, 163, 184);
/// Slate 100, body text on dark terminals
pub const TEXT: Color = Color::Rgb(241, 245, 249);
