//! Timeline interpolator: key frame ownership, lazy interval tables, per-tick dispatch.
//!
//! Methods:
//! - set_key_frames (replace + invalidate), validate (build or force-sync), interpolate (write every target)

use crate::builder::{build_interval_table, IntervalTable};
use crate::config::{Config, IntervalLookup};
use crate::error::TimelineError;
use crate::interval::InterpolationInterval;
use crate::keyframe::{check_key_frames, KeyFrame, Tick};
use crate::target::{TargetKey, TargetRef};

/// Resolves key frames into interpolated writes on their targets.
///
/// Not thread-safe: drive it from a single clock.
#[derive(Debug)]
pub struct TimelineInterpolator {
    cfg: Config,
    key_frames: Vec<KeyFrame>,
    table: IntervalTable,
    invalid: bool,
}

impl Default for TimelineInterpolator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl TimelineInterpolator {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            key_frames: Vec::new(),
            table: IntervalTable::default(),
            invalid: true,
        }
    }

    pub fn with_key_frames(cfg: Config, key_frames: Vec<KeyFrame>) -> Result<Self, TimelineError> {
        let mut this = Self::new(cfg);
        this.set_key_frames(key_frames)?;
        Ok(this)
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Replace the key frame list and invalidate the interval tables.
    /// On error the previous key frames and tables are kept.
    ///
    /// Without `strict_ticks`, decreasing ticks are accepted and the list is
    /// stably ordered by tick (equal ticks keep their relative order).
    pub fn set_key_frames(&mut self, mut key_frames: Vec<KeyFrame>) -> Result<(), TimelineError> {
        if self.cfg.strict_ticks {
            check_key_frames(&key_frames)?;
        } else {
            key_frames.sort_by_key(|kf| kf.tick);
        }
        self.key_frames = key_frames;
        self.invalid = true;
        Ok(())
    }

    #[inline]
    pub fn key_frames(&self) -> &[KeyFrame] {
        &self.key_frames
    }

    /// Largest key frame tick (0 when empty).
    pub fn duration(&self) -> Tick {
        self.key_frames.iter().map(|kf| kf.tick).max().unwrap_or(0)
    }

    /// Whether the interval tables are up to date with the key frames.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.invalid
    }

    /// Rebuild the interval tables if invalid; otherwise, when `force_sync` is set,
    /// resample the deferred start values from the live targets.
    ///
    /// Call with `force_sync = true` when playback (re)starts.
    pub fn validate(&mut self, force_sync: bool) {
        if self.invalid {
            self.table = build_interval_table(&self.key_frames);
            self.invalid = false;
        } else if force_sync {
            log::debug!(
                "force sync: resampling {} deferred start values",
                self.table.undefined_start.len()
            );
            self.table.resync_undefined_starts();
        }
    }

    /// Write the interpolated value at `tick` to every animated target.
    pub fn interpolate(&mut self, tick: Tick) {
        if self.invalid {
            self.validate(false);
        }
        let lookup = self.cfg.interval_lookup;
        for target in &self.table.targets {
            let (index, frac) = locate(&target.intervals, tick, lookup);
            target.intervals[index].interpolate(frac);
        }
    }

    /// Number of animated targets in the current tables.
    pub fn target_count(&self) -> usize {
        self.table.len()
    }

    /// Intervals for `target`, or `None` if it is not animated (or tables are stale).
    pub fn intervals_for(&self, target: &TargetRef) -> Option<&[InterpolationInterval]> {
        if self.invalid {
            return None;
        }
        self.table
            .get(TargetKey::of(target))
            .map(|t| t.intervals.as_slice())
    }

    /// Targets whose first interval starts from a deferred value.
    pub fn undefined_start_targets(&self) -> Vec<TargetKey> {
        self.table
            .undefined_start
            .iter()
            .map(|&slot| self.table.targets[slot].key)
            .collect()
    }
}

#[inline]
fn fraction(tick: Tick, left: Tick, right: Tick) -> f64 {
    if right <= left {
        // Zero-length interval: reached its end instantly.
        return 1.0;
    }
    tick.saturating_sub(left) as f64 / (right - left) as f64
}

/// Find the interval that owns `tick` and the fraction within it.
///
/// The first non-last interval with `tick <= end_tick` wins (a boundary tick
/// completes the arriving interval). Past that, the last interval is used with
/// the fraction clamped to 1.0. `intervals` must be non-empty.
pub(crate) fn locate(
    intervals: &[InterpolationInterval],
    tick: Tick,
    lookup: IntervalLookup,
) -> (usize, f64) {
    let last = intervals.len() - 1;
    match lookup {
        IntervalLookup::Linear => {
            let mut left: Tick = 0;
            for (i, interval) in intervals[..last].iter().enumerate() {
                let right = interval.end_tick();
                if tick <= right {
                    return (i, fraction(tick, left, right));
                }
                left = right;
            }
            (
                last,
                fraction(tick, left, intervals[last].end_tick()).min(1.0),
            )
        }
        IntervalLookup::Binary => {
            let i = intervals[..last].partition_point(|iv| iv.end_tick() < tick);
            let left = if i == 0 { 0 } else { intervals[i - 1].end_tick() };
            let frac = fraction(tick, left, intervals[i].end_tick());
            if i == last {
                (i, frac.min(1.0))
            } else {
                (i, frac)
            }
        }
    }
}
