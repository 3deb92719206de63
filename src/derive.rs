//! Derivation and formatting helpers
//!
//! Pure functions between the dataset and the renderers: the variance
//! curves of Figure 1, log-axis projection, and number formatting.

use crate::dataset::Variant;

// ============================================================================
// Figure 1 curves
// ============================================================================

/// Activation variance of `variant` at `layer`.
///
/// Closed-form approximations of the published figure:
/// - Llama: exponential growth `0.5 e^(0.1 i)`
/// - V1: linear growth from 0.5 to 2.2 over 24 layers
/// - V2: ramps for `i < 5`, then decays linearly
/// - V3: ramps for `i < 2`, then oscillates around 1.4
///
/// Output is clamped to be non-negative.
#[must_use]
pub fn variance_at(variant: Variant, layer: usize) -> f64 {
    let i = layer as f64;
    let raw = match variant {
        Variant::Llama => 0.5 * (0.1 * i).exp(),
        Variant::V1 => 0.5 + (1.7 / 24.0) * i,
        Variant::V2 => {
            if layer < 5 {
                0.5 + i * 0.3
            } else {
                2.0 - (i - 5.0) * 0.05
            }
        },
        Variant::V3 => {
            if layer < 2 {
                0.5 + i * 0.4
            } else {
                1.4 + i.sin() * 0.1
            }
        },
    };
    raw.max(0.0)
}

// ============================================================================
// Log axis
// ============================================================================

/// Base-10 logarithmic axis over a positive domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    min: f64,
    max: f64,
}

impl LogScale {
    /// Scale over `[min, max]`; both bounds must be positive and ordered
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min > 0.0 && max > min, "invalid log domain");
        Self { min, max }
    }

    /// Smallest decade-aligned scale containing every value
    ///
    /// Falls back to `[1, 10]` when no positive value is present.
    #[must_use]
    pub fn covering(values: impl IntoIterator<Item = f64>) -> Self {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| *v > 0.0)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() {
            return Self::new(1.0, 10.0);
        }
        let lo_exp = lo.log10().floor();
        let mut hi_exp = hi.log10().ceil();
        if hi_exp <= lo_exp {
            hi_exp = lo_exp + 1.0;
        }
        Self::new(10f64.powi(lo_exp as i32), 10f64.powi(hi_exp as i32))
    }

    /// Domain lower bound
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Domain upper bound
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Axis bounds in projected (log10) space
    #[must_use]
    pub fn bounds(&self) -> [f64; 2] {
        [self.min.log10(), self.max.log10()]
    }

    /// Project a value into log10 space without clamping.
    ///
    /// Independent of any domain: values outside a scale land outside its
    /// [`LogScale::bounds`] and are clipped by the chart, not removed from
    /// the data.
    #[must_use]
    pub fn project(value: f64) -> f64 {
        value.max(f64::MIN_POSITIVE).log10()
    }

    /// Project a value and clamp it into the axis bounds
    #[must_use]
    pub fn project_clamped(&self, value: f64) -> f64 {
        let [lo, hi] = self.bounds();
        Self::project(value).clamp(lo, hi)
    }

    /// Whether `value` lies inside the domain
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Decade tick labels from min to max, e.g. `1, 10, 100, 1000`
    #[must_use]
    pub fn decade_labels(&self) -> Vec<String> {
        let [lo, hi] = self.bounds();
        let (lo, hi) = (lo.floor() as i32, hi.ceil() as i32);
        (lo..=hi).map(|e| format_compact(10f64.powi(e))).collect()
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Compact number: `846`, `12.5k`, `1.2M`
#[must_use]
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e4 {
        format!("{:.1}k", value / 1e3)
    } else if abs >= 100.0 || value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Signed percentage with one decimal, e.g. `+32.5%`
#[must_use]
pub fn format_gain(percent: f64) -> String {
    format!("{percent:+.1}%")
}

/// Round `value` up to the next multiple of `step`
#[must_use]
pub fn ceil_to(value: f64, step: f64) -> f64 {
    (value / step).ceil() * step
}
