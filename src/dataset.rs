//! Experimental results from the BitSkip paper
//!
//! Every collection is a compile-time constant except the variance figure,
//! which is synthesized once from closed-form curves (see
//! [`crate::derive::variance_at`]) and then held for the process lifetime.
//!
//! All collections join on [`Variant`]. There are no string keys to drift.
//!
//! ## Example
//!
//! ```rust
//! use bitskip_viz::dataset::{self, Variant};
//!
//! let v1 = dataset::early_exit_result(Variant::V1);
//! assert_eq!(v1.layer18_perplexity, 1.18);
//! assert_eq!(dataset::variance_samples().len(), 25);
//! ```

use std::sync::LazyLock;

use ratatui::style::Color;
use serde::Serialize;

use crate::derive;
use crate::palette;

// ============================================================================
// Variant identity
// ============================================================================

/// One of the four evaluated model configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 1.58-bit weights, 8-bit activations
    V1,
    /// 1.58-bit weights, 4-bit activations, Hadamard
    V2,
    /// 1.58-bit weights, 8-bit activations, Hadamard
    V3,
    /// Full-precision Llama3 baseline
    Llama,
}

impl Variant {
    /// All variants in canonical order
    pub const ALL: [Variant; 4] = [Variant::V1, Variant::V2, Variant::V3, Variant::Llama];

    /// Short key used in figure legends and JSON output
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Variant::V1 => "v1",
            Variant::V2 => "v2",
            Variant::V3 => "v3",
            Variant::Llama => "llama",
        }
    }

    /// Resolve a short key
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }

    /// Position in [`Variant::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Variant::V1 => 0,
            Variant::V2 => 1,
            Variant::V3 => 2,
            Variant::Llama => 3,
        }
    }

    /// Chart legend label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Variant::V1 => "BitSkip-V1 (8-bit)",
            Variant::V2 => "BitSkip-V2 (4-bit + H)",
            Variant::V3 => "BitSkip-V3 (8-bit + H)",
            Variant::Llama => "Llama3 (FP32)",
        }
    }

    /// Column header for compact tables
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Variant::V1 => "V1",
            Variant::V2 => "V2",
            Variant::V3 => "V3",
            Variant::Llama => "Llama3",
        }
    }

    /// Presentation colour
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Variant::V1 => palette::EMERALD,
            Variant::V2 => palette::ROSE,
            Variant::V3 => palette::AMBER,
            Variant::Llama => palette::SLATE,
        }
    }

    /// Whether the variant applies the Hadamard transform
    #[must_use]
    pub const fn uses_hadamard(self) -> bool {
        matches!(self, Variant::V2 | Variant::V3)
    }
}

// ============================================================================
// Table 2: architecture comparison
// ============================================================================

/// Presentation category of an architecture card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayCategory {
    /// The winning configuration
    Primary,
    /// Extreme quantization that failed
    DegradedAggressive,
    /// Control run isolating the Hadamard effect
    DegradedHybrid,
    /// Full-precision reference
    Baseline,
}

/// Architecture descriptor for one variant
#[derive(Debug, Clone, Serialize)]
pub struct ArchitectureVariant {
    /// Join key
    pub variant: Variant,
    /// Display name
    pub name: &'static str,
    /// Badge text
    pub short_label: &'static str,
    /// Weight precision
    pub weight_precision: &'static str,
    /// Activation precision
    pub activation_precision: &'static str,
    /// Hadamard transform applied to activations
    pub uses_hadamard: bool,
    /// Parameter count
    pub parameter_count: &'static str,
    /// Card style selector, no computational meaning
    pub display_category: DisplayCategory,
    /// One-line summary
    pub description: &'static str,
}

static ARCHITECTURES: [ArchitectureVariant; 4] = [
    ArchitectureVariant {
        variant: Variant::V1,
        name: "BitSkip-V1",
        short_label: "The Hero",
        weight_precision: "1.58-bit (Ternary)",
        activation_precision: "8-bit",
        uses_hadamard: false,
        parameter_count: "1.06B",
        display_category: DisplayCategory::Primary,
        description: "Simple 8-bit quantization. Best performer.",
    },
    ArchitectureVariant {
        variant: Variant::V2,
        name: "BitSkip-V2",
        short_label: "Aggressive",
        weight_precision: "1.58-bit (Ternary)",
        activation_precision: "4-bit",
        uses_hadamard: true,
        parameter_count: "1.06B",
        display_category: DisplayCategory::DegradedAggressive,
        description: "Extreme 4-bit quantization with Hadamard. Catastrophic failure.",
    },
    ArchitectureVariant {
        variant: Variant::V3,
        name: "BitSkip-V3",
        short_label: "Hybrid Control",
        weight_precision: "1.58-bit (Ternary)",
        activation_precision: "8-bit",
        uses_hadamard: true,
        parameter_count: "1.06B",
        display_category: DisplayCategory::DegradedHybrid,
        description: "Isolates Hadamard effect. Shows activation stability but poor learning.",
    },
    ArchitectureVariant {
        variant: Variant::Llama,
        name: "Llama3 Baseline",
        short_label: "Standard",
        weight_precision: "32-bit (FP32)",
        activation_precision: "32-bit (FP32)",
        uses_hadamard: false,
        parameter_count: "1.06B",
        display_category: DisplayCategory::Baseline,
        description: "Full precision baseline with LayerSkip routing.",
    },
];

/// Architecture descriptors in display order
#[must_use]
pub fn architectures() -> &'static [ArchitectureVariant] {
    &ARCHITECTURES
}

// ============================================================================
// Table 3: intrinsic performance (no early-exit training)
// ============================================================================

/// Perplexity at one truncation depth
#[derive(Debug, Clone, Serialize)]
pub struct IntrinsicMeasurement {
    /// Depth label, not a layer index ("Full Model" is a valid label)
    pub depth_label: &'static str,
    /// Positive perplexity per measured variant
    pub perplexity: &'static [(Variant, f64)],
}

impl IntrinsicMeasurement {
    /// Perplexity of `variant` at this depth, if it was measured
    #[must_use]
    pub fn perplexity(&self, variant: Variant) -> Option<f64> {
        self.perplexity
            .iter()
            .find(|(v, _)| *v == variant)
            .map(|&(_, ppl)| ppl)
    }
}

static INTRINSIC: [IntrinsicMeasurement; 4] = [
    IntrinsicMeasurement {
        depth_label: "Full Model",
        perplexity: &[
            (Variant::V1, 1966.49),
            (Variant::V2, 26048.98),
            (Variant::Llama, 846.34),
        ],
    },
    IntrinsicMeasurement {
        depth_label: "Layer 6",
        perplexity: &[
            (Variant::V1, 14701.50),
            (Variant::V2, 65109.99),
            (Variant::Llama, 12471.16),
        ],
    },
    IntrinsicMeasurement {
        depth_label: "Layer 12",
        perplexity: &[
            (Variant::V1, 4330.83),
            (Variant::V2, 49916.51),
            (Variant::Llama, 3059.27),
        ],
    },
    IntrinsicMeasurement {
        depth_label: "Layer 18",
        perplexity: &[
            (Variant::V1, 2478.66),
            (Variant::V2, 41969.68),
            (Variant::Llama, 1246.45),
        ],
    },
];

/// Intrinsic measurements in paper order
#[must_use]
pub fn intrinsic_measurements() -> &'static [IntrinsicMeasurement] {
    &INTRINSIC
}

// ============================================================================
// Figure 1: activation variance
// ============================================================================

/// Number of transformer layers plotted in the variance figure
pub const LAYER_COUNT: usize = 25;

/// Activation variance of every variant at one layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VarianceSample {
    /// Layer index in `0..LAYER_COUNT`
    pub layer_index: usize,
    /// Variance indexed by [`Variant::index`]
    pub variance: [f64; 4],
}

impl VarianceSample {
    /// Variance of `variant` at this layer
    #[must_use]
    pub fn variance(&self, variant: Variant) -> f64 {
        self.variance[variant.index()]
    }
}

static VARIANCE: LazyLock<Vec<VarianceSample>> = LazyLock::new(|| {
    (0..LAYER_COUNT)
        .map(|layer_index| VarianceSample {
            layer_index,
            variance: Variant::ALL.map(|v| derive::variance_at(v, layer_index)),
        })
        .collect()
});

/// Variance samples ordered by layer index
#[must_use]
pub fn variance_samples() -> &'static [VarianceSample] {
    &VARIANCE
}

// ============================================================================
// Tables 4 and 5: early exit at layer 18
// ============================================================================

/// Early-exit quality and speed for one variant
#[derive(Debug, Clone, Serialize)]
pub struct EarlyExitResult {
    /// Join key
    pub variant: Variant,
    /// Display name
    pub name: &'static str,
    /// Full-depth perplexity
    pub base_perplexity: f64,
    /// Full-depth speed (tok/s)
    pub base_speed: f64,
    /// Perplexity exiting at layer 18
    pub layer18_perplexity: f64,
    /// Speed exiting at layer 18 (tok/s)
    pub layer18_speed: f64,
    /// Reported speed gain, not derived from the speed pair
    pub speed_gain_percent: f64,
    /// Reported perplexity change, stored negative
    pub perplexity_change_percent: f64,
}

impl EarlyExitResult {
    /// Point and bar colour for this result
    #[must_use]
    pub const fn display_color(&self) -> Color {
        self.variant.color()
    }
}

static EARLY_EXIT: [EarlyExitResult; 4] = [
    EarlyExitResult {
        variant: Variant::V1,
        name: "BitSkip-V1",
        base_perplexity: 1.13,
        base_speed: 32.0,
        layer18_perplexity: 1.18,
        layer18_speed: 42.4,
        speed_gain_percent: 32.5,
        perplexity_change_percent: -4.0,
    },
    EarlyExitResult {
        variant: Variant::Llama,
        name: "Llama3 FP32",
        base_perplexity: 1.19,
        base_speed: 97.8,
        layer18_perplexity: 1.77,
        layer18_speed: 128.5,
        speed_gain_percent: 31.2,
        perplexity_change_percent: -48.3,
    },
    EarlyExitResult {
        variant: Variant::V2,
        name: "BitSkip-V2",
        base_perplexity: 210.24,
        base_speed: 5.0,
        layer18_perplexity: 301.67,
        layer18_speed: 6.6,
        speed_gain_percent: 33.2,
        perplexity_change_percent: -43.5,
    },
    EarlyExitResult {
        variant: Variant::V3,
        name: "BitSkip-V3",
        base_perplexity: 427.94,
        base_speed: 5.0,
        layer18_perplexity: 481.60,
        layer18_speed: 6.6,
        speed_gain_percent: 33.2,
        perplexity_change_percent: -12.5,
    },
];

/// Early-exit results in paper order
#[must_use]
pub fn early_exit_results() -> &'static [EarlyExitResult] {
    &EARLY_EXIT
}

/// Early-exit result of one variant
#[must_use]
pub fn early_exit_result(variant: Variant) -> &'static EarlyExitResult {
    // every variant has exactly one row, checked in tests
    &EARLY_EXIT[match variant {
        Variant::V1 => 0,
        Variant::Llama => 1,
        Variant::V2 => 2,
        Variant::V3 => 3,
    }]
}

// ============================================================================
// Summary table: quality-speed tradeoff
// ============================================================================

/// Early-exit viability verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Viability {
    /// Usable with early exit
    Excellent,
    /// Quality collapses
    Poor,
}

impl Viability {
    /// Table cell text
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Viability::Excellent => "Excellent",
            Viability::Poor => "Poor",
        }
    }
}

/// One row of the tradeoff summary table
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    /// Join key
    pub variant: Variant,
    /// Model column text
    pub model: &'static str,
    /// Rank by quality (1 = best)
    pub quality_rank: u8,
    /// Rank by speed (1 = fastest)
    pub speed_rank: u8,
    /// Verdict
    pub viability: Viability,
    /// Reported quality/speed ratio
    pub ratio: f64,
    /// Marked as the best ratio
    pub best: bool,
}

impl SummaryRow {
    /// Ratio column text, e.g. `0.80x (Best)`
    #[must_use]
    pub fn ratio_label(&self) -> String {
        if self.best {
            format!("{:.2}x (Best)", self.ratio)
        } else {
            format!("{:.2}x", self.ratio)
        }
    }
}

static SUMMARY: [SummaryRow; 4] = [
    SummaryRow {
        variant: Variant::V1,
        model: "BitSkip-V1",
        quality_rank: 1,
        speed_rank: 2,
        viability: Viability::Excellent,
        ratio: 0.80,
        best: true,
    },
    SummaryRow {
        variant: Variant::Llama,
        model: "Llama3 FP32",
        quality_rank: 2,
        speed_rank: 1,
        viability: Viability::Poor,
        ratio: 1.49,
        best: false,
    },
    SummaryRow {
        variant: Variant::V3,
        model: "BitSkip-V3",
        quality_rank: 4,
        speed_rank: 3,
        viability: Viability::Poor,
        ratio: 2.64,
        best: false,
    },
    SummaryRow {
        variant: Variant::V2,
        model: "BitSkip-V2",
        quality_rank: 3,
        speed_rank: 4,
        viability: Viability::Poor,
        ratio: 1.31,
        best: false,
    },
];

/// Summary table rows in display order
#[must_use]
pub fn summary_rows() -> &'static [SummaryRow] {
    &SUMMARY
}

// ============================================================================
// Export
// ============================================================================

/// Borrowed view over every collection, for JSON export
#[derive(Debug, Serialize)]
pub struct DatasetExport {
    /// Table 2
    pub architectures: &'static [ArchitectureVariant],
    /// Table 3
    pub intrinsic: &'static [IntrinsicMeasurement],
    /// Figure 1
    pub variance: &'static [VarianceSample],
    /// Tables 4 and 5
    pub early_exit: &'static [EarlyExitResult],
    /// Tradeoff summary
    pub summary: &'static [SummaryRow],
}

impl DatasetExport {
    /// Collect every collection
    #[must_use]
    pub fn collect() -> Self {
        Self {
            architectures: architectures(),
            intrinsic: intrinsic_measurements(),
            variance: variance_samples(),
            early_exit: early_exit_results(),
            summary: summary_rows(),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_variant_key_roundtrip() {
        for v in Variant::ALL {
            assert_eq!(Variant::from_key(v.key()), Some(v));
        }
        assert_eq!(Variant::from_key("v4"), None);
        assert_eq!(Variant::from_key("Llama"), None);
    }

    #[test]
    fn test_variant_index_matches_all() {
        for (i, v) in Variant::ALL.iter().enumerate() {
            assert_eq!(v.index(), i);
        }
    }

    #[test]
    fn test_hadamard_flag_consistent_with_architectures() {
        for arch in architectures() {
            assert_eq!(
                arch.uses_hadamard,
                arch.variant.uses_hadamard(),
                "{}",
                arch.name
            );
        }
    }

    #[test]
    fn test_every_collection_covers_each_variant_once() {
        let arch: HashSet<_> = architectures().iter().map(|a| a.variant).collect();
        let exits: HashSet<_> = early_exit_results().iter().map(|r| r.variant).collect();
        let summary: HashSet<_> = summary_rows().iter().map(|r| r.variant).collect();
        assert_eq!(arch.len(), 4);
        assert_eq!(exits.len(), 4);
        assert_eq!(summary.len(), 4);
    }

    #[test]
    fn test_early_exit_lookup() {
        for v in Variant::ALL {
            assert_eq!(early_exit_result(v).variant, v);
        }
        assert_eq!(early_exit_result(Variant::V2).layer18_perplexity, 301.67);
    }

    #[test]
    fn test_intrinsic_values_positive_and_v3_absent() {
        for m in intrinsic_measurements() {
            assert!(m.perplexity(Variant::V3).is_none(), "{}", m.depth_label);
            for v in [Variant::V1, Variant::V2, Variant::Llama] {
                let ppl = m.perplexity(v).expect("measured");
                assert!(ppl > 0.0);
            }
        }
    }

    #[test]
    fn test_intrinsic_depth_order() {
        let labels: Vec<_> = intrinsic_measurements()
            .iter()
            .map(|m| m.depth_label)
            .collect();
        assert_eq!(labels, ["Full Model", "Layer 6", "Layer 12", "Layer 18"]);
    }

    #[test]
    fn test_variance_layers_contiguous_and_non_negative() {
        let samples = variance_samples();
        assert_eq!(samples.len(), LAYER_COUNT);
        for (i, s) in samples.iter().enumerate() {
            assert_eq!(s.layer_index, i);
            for v in Variant::ALL {
                assert!(s.variance(v) >= 0.0, "layer {i} {v:?}");
            }
        }
    }

    #[test]
    fn test_summary_ratio_labels() {
        let labels: Vec<_> = summary_rows().iter().map(SummaryRow::ratio_label).collect();
        assert_eq!(labels, ["0.80x (Best)", "1.49x", "2.64x", "1.31x"]);
    }

    #[test]
    fn test_export_json_shape() {
        let json = DatasetExport::collect().to_json().expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["architectures"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["variance"].as_array().map(Vec::len), Some(25));
        assert_eq!(value["early_exit"][0]["variant"], "v1");
        assert_eq!(
            value["architectures"][1]["display_category"],
            "degraded-aggressive"
        );
    }
}
