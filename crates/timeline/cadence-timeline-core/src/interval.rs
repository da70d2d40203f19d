//! Interpolation intervals: one target's span between two defining key frames.

use std::fmt;

use crate::interp::Interpolator;
use crate::keyframe::{KeyValue, Tick};
use crate::target::{TargetKey, TargetName, TargetRef};
use crate::value::Value;

/// Start value of an interval.
#[derive(Clone, Debug, PartialEq)]
pub enum StartValue {
    /// Defined by an earlier key value for the same target.
    Known(Value),
    /// No earlier key value: holds the target's live value as last sampled.
    Deferred(Value),
}

impl StartValue {
    #[inline]
    pub fn value(&self) -> &Value {
        match self {
            StartValue::Known(v) | StartValue::Deferred(v) => v,
        }
    }

    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, StartValue::Deferred(_))
    }
}

/// Interpolation of one target from `start_tick` to `end_tick`.
#[derive(Clone)]
pub struct InterpolationInterval {
    target: TargetRef,
    start_tick: Tick,
    start: StartValue,
    end_tick: Tick,
    end_value: Value,
    interpolator: Interpolator,
}

impl InterpolationInterval {
    /// Interval whose start must be sampled from the target; samples it now.
    pub fn deferred(right: &KeyValue, end_tick: Tick) -> Self {
        let target = right.target().clone();
        let live = target.read();
        Self {
            target,
            start_tick: 0,
            start: StartValue::Deferred(live),
            end_tick,
            end_value: right.value().clone(),
            interpolator: right.interpolator().clone(),
        }
    }

    /// Interval from `left` (held at `start_tick`) to `right` at `end_tick`.
    pub fn between(left: &KeyValue, start_tick: Tick, right: &KeyValue, end_tick: Tick) -> Self {
        debug_assert!(start_tick <= end_tick);
        Self {
            target: right.target().clone(),
            start_tick,
            start: StartValue::Known(left.value().clone()),
            end_tick,
            end_value: right.value().clone(),
            interpolator: right.interpolator().clone(),
        }
    }

    #[inline]
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    #[inline]
    pub fn start_tick(&self) -> Tick {
        self.start_tick
    }

    #[inline]
    pub fn end_tick(&self) -> Tick {
        self.end_tick
    }

    #[inline]
    pub fn duration(&self) -> Tick {
        self.end_tick - self.start_tick
    }

    #[inline]
    pub fn start(&self) -> &StartValue {
        &self.start
    }

    #[inline]
    pub fn start_value(&self) -> &Value {
        self.start.value()
    }

    #[inline]
    pub fn end_value(&self) -> &Value {
        &self.end_value
    }

    #[inline]
    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    /// Resample a deferred start from the target's live value. Known starts are left alone.
    pub fn recalculate_start_value(&mut self) {
        if let StartValue::Deferred(v) = &mut self.start {
            *v = self.target.read();
        }
    }

    /// Value at fraction `frac` of this interval.
    pub fn value_at(&self, frac: f64) -> Value {
        self.interpolator
            .interpolate(self.start.value(), &self.end_value, frac)
    }

    /// Write the value at fraction `frac` to the target.
    pub fn interpolate(&self, frac: f64) {
        self.target.write(self.value_at(frac));
    }
}

impl fmt::Debug for InterpolationInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpolationInterval")
            .field("target", &TargetName(&self.target).to_string())
            .field("start_tick", &self.start_tick)
            .field("start", &self.start)
            .field("end_tick", &self.end_tick)
            .field("end_value", &self.end_value)
            .field("interpolator", &self.interpolator)
            .finish()
    }
}

/// All intervals of one target, ordered by end tick.
#[derive(Clone, Debug)]
pub struct TargetIntervals {
    pub key: TargetKey,
    pub intervals: Vec<InterpolationInterval>,
}

impl TargetIntervals {
    /// Whether the first interval starts from a deferred value.
    pub fn has_deferred_start(&self) -> bool {
        self.intervals
            .first()
            .map(|i| i.start.is_deferred())
            .unwrap_or(false)
    }
}
