//! Key frames and key values.

use std::fmt;

use crate::error::TimelineError;
use crate::interp::Interpolator;
use crate::target::{TargetName, TargetRef};
use crate::value::Value;

/// Integer time unit for key frame timing. Granularity is up to the host.
pub type Tick = u64;

/// Immutable pairing of a target with the value it should hold at a key frame.
#[derive(Clone)]
pub struct KeyValue {
    target: TargetRef,
    value: Value,
    interpolator: Interpolator,
}

impl KeyValue {
    /// Key value with linear interpolation.
    pub fn new(target: TargetRef, value: impl Into<Value>) -> Self {
        Self::with_interpolator(target, value, Interpolator::Linear)
    }

    pub fn with_interpolator(
        target: TargetRef,
        value: impl Into<Value>,
        interpolator: Interpolator,
    ) -> Self {
        Self {
            target,
            value: value.into(),
            interpolator,
        }
    }

    #[inline]
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Interpolator used for the segment arriving at this key value.
    #[inline]
    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }
}

impl fmt::Debug for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValue")
            .field("target", &TargetName(&self.target).to_string())
            .field("value", &self.value)
            .field("interpolator", &self.interpolator)
            .finish()
    }
}

/// A tick plus the key values that apply at it.
#[derive(Clone, Debug, Default)]
pub struct KeyFrame {
    pub tick: Tick,
    pub values: Vec<KeyValue>,
    /// Optional marker name (kept from stored timelines, unused by interpolation).
    pub name: Option<String>,
}

impl KeyFrame {
    pub fn new(tick: Tick, values: Vec<KeyValue>) -> Self {
        Self {
            tick,
            values,
            name: None,
        }
    }

    pub fn named(name: impl Into<String>, tick: Tick, values: Vec<KeyValue>) -> Self {
        Self {
            tick,
            values,
            name: Some(name.into()),
        }
    }
}

/// Check that key frame ticks never decrease.
pub fn check_key_frames(key_frames: &[KeyFrame]) -> Result<(), TimelineError> {
    let mut previous: Tick = 0;
    for (index, kf) in key_frames.iter().enumerate() {
        if kf.tick < previous {
            return Err(TimelineError::NonMonotonicTicks {
                index,
                previous,
                tick: kf.tick,
            });
        }
        previous = kf.tick;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::ValueCell;

    #[test]
    fn equal_ticks_are_allowed() {
        let x: TargetRef = ValueCell::shared("x", Value::f(0.0));
        let frames = vec![
            KeyFrame::new(0, vec![KeyValue::new(x.clone(), 0.0)]),
            KeyFrame::new(5, vec![]),
            KeyFrame::new(5, vec![KeyValue::new(x, 1.0)]),
        ];
        assert!(check_key_frames(&frames).is_ok());
    }

    #[test]
    fn decreasing_tick_is_reported_with_its_index() {
        let frames = vec![
            KeyFrame::new(0, vec![]),
            KeyFrame::new(10, vec![]),
            KeyFrame::new(4, vec![]),
        ];
        assert_eq!(
            check_key_frames(&frames),
            Err(TimelineError::NonMonotonicTicks {
                index: 2,
                previous: 10,
                tick: 4
            })
        );
    }

    #[test]
    fn debug_shows_target_label() {
        let x: TargetRef = ValueCell::shared("opacity", Value::f(0.0));
        let kv = KeyValue::new(x, 0.5);
        assert!(format!("{kv:?}").contains("opacity"));
    }
}
