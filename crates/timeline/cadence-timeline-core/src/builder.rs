//! Interval table construction.
//!
//! Model:
//! - Key frames at tick 0 seed a last-known value per target and produce no intervals.
//! - Every later key value closes an interval for its target, starting from the
//!   previous key value of that target (or from tick 0 and the seed).
//! - A target with neither seed nor earlier key value gets a deferred start: the
//!   live value of the target, resampled on every forced sync.
//! - Targets are stored densely in first-encounter order.

use hashbrown::HashMap;

use crate::interval::{InterpolationInterval, TargetIntervals};
use crate::keyframe::{KeyFrame, KeyValue};
use crate::target::{TargetKey, TargetName};

/// Per-target interval lists plus the targets whose first interval has a deferred start.
#[derive(Clone, Debug, Default)]
pub struct IntervalTable {
    pub targets: Vec<TargetIntervals>,
    /// Indices into `targets`.
    pub undefined_start: Vec<usize>,
    slots: HashMap<TargetKey, usize>,
}

impl IntervalTable {
    /// Interval list for a target, if it is animated.
    pub fn get(&self, key: TargetKey) -> Option<&TargetIntervals> {
        self.slots.get(&key).map(|&slot| &self.targets[slot])
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Resample the deferred start of every undefined-start target.
    pub fn resync_undefined_starts(&mut self) {
        for &slot in &self.undefined_start {
            if let Some(first) = self.targets[slot].intervals.first_mut() {
                first.recalculate_start_value();
            }
        }
    }
}

/// Build the interval table for `key_frames` (ticks assumed non-decreasing).
pub fn build_interval_table(key_frames: &[KeyFrame]) -> IntervalTable {
    let mut last_values: HashMap<TargetKey, &KeyValue> = HashMap::new();

    let seeded = key_frames.iter().take_while(|kf| kf.tick == 0).count();
    for kf in &key_frames[..seeded] {
        for kv in &kf.values {
            last_values.insert(TargetKey::of(kv.target()), kv);
        }
    }

    let mut table = IntervalTable::default();
    for kf in &key_frames[seeded..] {
        for right in &kf.values {
            let key = TargetKey::of(right.target());
            let left = last_values.get(&key).copied();
            let slot = table.slots.get(&key).copied();

            if let Some(left) = left {
                if left.value().kind() != right.value().kind() {
                    log::warn!(
                        "target {}: value kind changes from {:?} to {:?} at tick {}; stepping",
                        TargetName(right.target()),
                        left.value().kind(),
                        right.value().kind(),
                        kf.tick
                    );
                }
            }

            match (slot, left) {
                (Some(slot), Some(left)) => {
                    let intervals = &mut table.targets[slot].intervals;
                    let start_tick = intervals.last().map(|i| i.end_tick()).unwrap_or(0);
                    intervals.push(InterpolationInterval::between(
                        left, start_tick, right, kf.tick,
                    ));
                }
                (None, Some(seed)) => {
                    let interval = InterpolationInterval::between(seed, 0, right, kf.tick);
                    push_target(&mut table, key, interval);
                }
                // A target with intervals always has a last value, so this is a first sighting.
                (_, None) => {
                    table.undefined_start.push(table.targets.len());
                    push_target(
                        &mut table,
                        key,
                        InterpolationInterval::deferred(right, kf.tick),
                    );
                }
            }
            last_values.insert(key, right);
        }
    }

    log::debug!(
        "built interval table: {} key frames ({} seeding), {} targets, {} deferred starts",
        key_frames.len(),
        seeded,
        table.targets.len(),
        table.undefined_start.len()
    );
    table
}

fn push_target(table: &mut IntervalTable, key: TargetKey, interval: InterpolationInterval) {
    table.slots.insert(key, table.targets.len());
    table.targets.push(TargetIntervals {
        key,
        intervals: vec![interval],
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::StartValue;
    use crate::target::{TargetRef, ValueCell};
    use crate::value::Value;

    fn cell(name: &str, v: f32) -> TargetRef {
        ValueCell::shared(name, Value::f(v))
    }

    #[test]
    fn seeds_produce_no_intervals() {
        let x = cell("x", 0.0);
        let table = build_interval_table(&[KeyFrame::new(0, vec![KeyValue::new(x.clone(), 1.0)])]);
        assert!(table.is_empty());
        assert!(table.get(TargetKey::of(&x)).is_none());
    }

    #[test]
    fn chains_intervals_per_target() {
        let x = cell("x", 0.0);
        let frames = vec![
            KeyFrame::new(0, vec![KeyValue::new(x.clone(), 0.0)]),
            KeyFrame::new(10, vec![KeyValue::new(x.clone(), 100.0)]),
            KeyFrame::new(20, vec![KeyValue::new(x.clone(), 50.0)]),
        ];
        let table = build_interval_table(&frames);
        assert_eq!(table.len(), 1);
        assert!(table.undefined_start.is_empty());
        let list = &table.get(TargetKey::of(&x)).unwrap().intervals;
        assert_eq!(list.len(), 2);
        assert_eq!((list[0].start_tick(), list[0].end_tick()), (0, 10));
        assert_eq!(list[0].start(), &StartValue::Known(Value::f(0.0)));
        assert_eq!((list[1].start_tick(), list[1].end_tick()), (10, 20));
        assert_eq!(list[1].start_value(), &Value::f(100.0));
        assert_eq!(list[1].end_value(), &Value::f(50.0));
    }

    #[test]
    fn unseeded_targets_are_indexed_in_encounter_order() {
        let a = cell("a", 1.0);
        let b = cell("b", 2.0);
        let c = cell("c", 3.0);
        let frames = vec![
            KeyFrame::new(0, vec![KeyValue::new(b.clone(), 0.0)]),
            KeyFrame::new(5, vec![KeyValue::new(a.clone(), 10.0), KeyValue::new(b.clone(), 1.0)]),
            KeyFrame::new(8, vec![KeyValue::new(c.clone(), 4.0), KeyValue::new(a.clone(), 0.0)]),
        ];
        let table = build_interval_table(&frames);
        let order: Vec<TargetKey> = table.targets.iter().map(|t| t.key).collect();
        assert_eq!(
            order,
            vec![TargetKey::of(&a), TargetKey::of(&b), TargetKey::of(&c)]
        );
        assert_eq!(table.undefined_start, vec![0, 2]);
        assert!(table.targets[0].has_deferred_start());
        assert!(!table.targets[1].has_deferred_start());
        // a: deferred [0,5] then known [5,8]
        let a_list = &table.targets[0].intervals;
        assert_eq!(a_list[0].start(), &StartValue::Deferred(Value::f(1.0)));
        assert_eq!(a_list[1].start_tick(), 5);
        assert_eq!(a_list[1].start_value(), &Value::f(10.0));
    }

    #[test]
    fn resync_only_touches_deferred_starts() {
        let live = ValueCell::shared("y", Value::f(2.0));
        let y: TargetRef = live.clone();
        let x = cell("x", 0.0);
        let frames = vec![
            KeyFrame::new(0, vec![KeyValue::new(x.clone(), 0.0)]),
            KeyFrame::new(10, vec![KeyValue::new(y.clone(), 5.0), KeyValue::new(x.clone(), 1.0)]),
        ];
        let mut table = build_interval_table(&frames);
        live.set(Value::f(-3.0));
        table.resync_undefined_starts();
        let y_first = &table.get(TargetKey::of(&y)).unwrap().intervals[0];
        assert_eq!(y_first.start(), &StartValue::Deferred(Value::f(-3.0)));
        let x_first = &table.get(TargetKey::of(&x)).unwrap().intervals[0];
        assert_eq!(x_first.start_value(), &Value::f(0.0));
    }
}
