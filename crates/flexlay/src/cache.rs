//! Measurement Cache
//!
//! Each node keeps a small ring of cached measurements plus one dedicated
//! slot for the last full layout. A cached entry can be reused not only on
//! an exact constraint match but also when the new constraints provably
//! cannot change the result (see the per-axis compatibility rules below).

use crate::config::Config;
use crate::measure::MeasureMode;
use crate::round::round_value_to_pixel_grid;
use flexlay_style::num;

/// Measurement ring size per node.
pub const MAX_CACHED_RESULTS: usize = 16;

/// One cached measurement: the constraints it was produced under and the
/// resulting size. Negative computed sizes mark an unused slot.
#[derive(Debug, Clone, Copy)]
pub struct CachedMeasurement {
    pub available_width: f32,
    pub available_height: f32,
    pub width_mode: MeasureMode,
    pub height_mode: MeasureMode,
    pub computed_width: f32,
    pub computed_height: f32,
}

impl Default for CachedMeasurement {
    fn default() -> Self {
        Self {
            available_width: f32::NAN,
            available_height: f32::NAN,
            width_mode: MeasureMode::Undefined,
            height_mode: MeasureMode::Undefined,
            computed_width: -1.0,
            computed_height: -1.0,
        }
    }
}

impl CachedMeasurement {
    pub fn matches_spec(
        &self,
        available_width: f32,
        available_height: f32,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
    ) -> bool {
        num::floats_equal(self.available_width, available_width)
            && num::floats_equal(self.available_height, available_height)
            && self.width_mode == width_mode
            && self.height_mode == height_mode
    }
}

fn size_is_exact_and_matches_old_measured_size(
    mode: MeasureMode,
    size: f32,
    last_computed_size: f32,
) -> bool {
    mode == MeasureMode::Exactly && num::floats_equal(size, last_computed_size)
}

fn old_size_is_unspecified_and_still_fits(
    mode: MeasureMode,
    size: f32,
    last_mode: MeasureMode,
    last_computed_size: f32,
) -> bool {
    mode == MeasureMode::AtMost
        && last_mode == MeasureMode::Undefined
        && (size >= last_computed_size || num::floats_equal(size, last_computed_size))
}

fn new_measure_size_is_stricter_and_still_valid(
    mode: MeasureMode,
    size: f32,
    last_mode: MeasureMode,
    last_size: f32,
    last_computed_size: f32,
) -> bool {
    last_mode == MeasureMode::AtMost
        && mode == MeasureMode::AtMost
        && num::is_defined(last_size)
        && num::is_defined(size)
        && num::is_defined(last_computed_size)
        && last_size > size
        && (last_computed_size <= size || num::floats_equal(size, last_computed_size))
}

/// Whether `entry` answers a measurement under the new constraints without
/// re-running layout. When a point scale factor is active, the available
/// sizes are compared after pixel-grid rounding so sub-pixel churn does not
/// defeat the cache.
pub fn can_use_cached_measurement(
    width_mode: MeasureMode,
    available_width: f32,
    height_mode: MeasureMode,
    available_height: f32,
    entry: &CachedMeasurement,
    margin_row: f32,
    margin_column: f32,
    config: &Config,
) -> bool {
    if (num::is_defined(entry.computed_height) && entry.computed_height < 0.0)
        || (num::is_defined(entry.computed_width) && entry.computed_width < 0.0)
    {
        return false;
    }

    let use_rounded_comparison = config.point_scale_factor != 0.0;
    let effective_width = if use_rounded_comparison {
        round_value_to_pixel_grid(available_width, config.point_scale_factor, false, false)
    } else {
        available_width
    };
    let effective_height = if use_rounded_comparison {
        round_value_to_pixel_grid(available_height, config.point_scale_factor, false, false)
    } else {
        available_height
    };
    let effective_last_width = if use_rounded_comparison {
        round_value_to_pixel_grid(entry.available_width, config.point_scale_factor, false, false)
    } else {
        entry.available_width
    };
    let effective_last_height = if use_rounded_comparison {
        round_value_to_pixel_grid(entry.available_height, config.point_scale_factor, false, false)
    } else {
        entry.available_height
    };

    let has_same_width_spec =
        entry.width_mode == width_mode && num::floats_equal(effective_last_width, effective_width);
    let has_same_height_spec = entry.height_mode == height_mode
        && num::floats_equal(effective_last_height, effective_height);

    let width_is_compatible = has_same_width_spec
        || size_is_exact_and_matches_old_measured_size(
            width_mode,
            available_width - margin_row,
            entry.computed_width,
        )
        || old_size_is_unspecified_and_still_fits(
            width_mode,
            available_width - margin_row,
            entry.width_mode,
            entry.computed_width,
        )
        || new_measure_size_is_stricter_and_still_valid(
            width_mode,
            available_width - margin_row,
            entry.width_mode,
            entry.available_width,
            entry.computed_width,
        );

    let height_is_compatible = has_same_height_spec
        || size_is_exact_and_matches_old_measured_size(
            height_mode,
            available_height - margin_column,
            entry.computed_height,
        )
        || old_size_is_unspecified_and_still_fits(
            height_mode,
            available_height - margin_column,
            entry.height_mode,
            entry.computed_height,
        )
        || new_measure_size_is_stricter_and_still_valid(
            height_mode,
            available_height - margin_column,
            entry.height_mode,
            entry.available_height,
            entry.computed_height,
        );

    width_is_compatible && height_is_compatible
}

/// Hit/miss counters for the per-node measurement caches, accumulated over
/// every layout pass of a tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(aw: f32, ah: f32, wm: MeasureMode, hm: MeasureMode, cw: f32, ch: f32) -> CachedMeasurement {
        CachedMeasurement {
            available_width: aw,
            available_height: ah,
            width_mode: wm,
            height_mode: hm,
            computed_width: cw,
            computed_height: ch,
        }
    }

    #[test]
    fn test_unused_slot_never_matches() {
        let config = Config::default();
        let unused = CachedMeasurement::default();
        assert!(!can_use_cached_measurement(
            MeasureMode::Exactly,
            100.0,
            MeasureMode::Exactly,
            100.0,
            &unused,
            0.0,
            0.0,
            &config,
        ));
    }

    #[test]
    fn test_same_spec_matches() {
        let config = Config::default();
        let cached = entry(100.0, 50.0, MeasureMode::Exactly, MeasureMode::AtMost, 100.0, 30.0);
        assert!(can_use_cached_measurement(
            MeasureMode::Exactly,
            100.0,
            MeasureMode::AtMost,
            50.0,
            &cached,
            0.0,
            0.0,
            &config,
        ));
    }

    #[test]
    fn test_at_most_still_fits_previous_unconstrained() {
        let config = Config::default();
        // Measured without a constraint to 40 wide; an at-most 60 request
        // cannot change the answer.
        let cached = entry(f32::NAN, 50.0, MeasureMode::Undefined, MeasureMode::Exactly, 40.0, 50.0);
        assert!(can_use_cached_measurement(
            MeasureMode::AtMost,
            60.0,
            MeasureMode::Exactly,
            50.0,
            &cached,
            0.0,
            0.0,
            &config,
        ));
        // A tighter cap below the measured size must re-measure.
        assert!(!can_use_cached_measurement(
            MeasureMode::AtMost,
            30.0,
            MeasureMode::Exactly,
            50.0,
            &cached,
            0.0,
            0.0,
            &config,
        ));
    }

    #[test]
    fn test_stricter_at_most_still_valid() {
        let config = Config::default();
        let cached = entry(100.0, 50.0, MeasureMode::AtMost, MeasureMode::Exactly, 40.0, 50.0);
        assert!(can_use_cached_measurement(
            MeasureMode::AtMost,
            80.0,
            MeasureMode::Exactly,
            50.0,
            &cached,
            0.0,
            0.0,
            &config,
        ));
        assert!(!can_use_cached_measurement(
            MeasureMode::AtMost,
            30.0,
            MeasureMode::Exactly,
            50.0,
            &cached,
            0.0,
            0.0,
            &config,
        ));
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
        stats.hits = 3;
        stats.misses = 1;
        assert_eq!(stats.hit_rate(), 0.75);
        stats.reset();
        assert_eq!(stats.hits, 0);
    }
}
