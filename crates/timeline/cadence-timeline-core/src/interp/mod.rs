//! Per-key-value interpolators.
//!
//! An [`Interpolator`] is attached to the key value a segment arrives at. It
//! first eases the raw fraction through its timing curve, then blends the
//! start and end values with [`functions::linear_value`]. Custom interpolators
//! receive the raw fraction and both values and may return anything.

pub mod functions;

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::value::Value;

const EASE_IN_S1: f64 = 25.0 / 9.0;
const EASE_IN_S3: f64 = 10.0 / 9.0;
const EASE_IN_S4: f64 = 1.0 / 9.0;

const EASE_OUT_S1: f64 = -25.0 / 9.0;
const EASE_OUT_S2: f64 = 50.0 / 9.0;
const EASE_OUT_S3: f64 = -16.0 / 9.0;
const EASE_OUT_S4: f64 = 10.0 / 9.0;

/// Host-supplied interpolation: `(start, end, raw fraction) -> value`.
#[derive(Clone)]
pub struct CustomInterpolator(pub Rc<dyn Fn(&Value, &Value, f64) -> Value>);

impl CustomInterpolator {
    pub fn new(f: impl Fn(&Value, &Value, f64) -> Value + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl fmt::Debug for CustomInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomInterpolator(..)")
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolator {
    #[default]
    Linear,
    /// Holds the start value until the fraction reaches 1.0.
    Discrete,
    EaseIn,
    EaseOut,
    EaseBoth,
    /// Cubic-bezier timing with control points (x1, y1, x2, y2).
    Spline([f64; 4]),
    #[serde(skip)]
    Custom(CustomInterpolator),
}

impl Interpolator {
    pub fn custom(f: impl Fn(&Value, &Value, f64) -> Value + 'static) -> Self {
        Interpolator::Custom(CustomInterpolator::new(f))
    }

    /// Timing curve: maps the raw fraction to the eased fraction.
    /// Custom interpolators see the raw fraction, so this is the identity for them.
    pub fn curve(&self, t: f64) -> f64 {
        // The piecewise curves only reach 1.0 up to rounding; pin the end exactly.
        if t >= 1.0 && !matches!(self, Interpolator::Custom(_)) {
            return 1.0;
        }
        match self {
            Interpolator::Linear | Interpolator::Custom(_) => t,
            Interpolator::Discrete => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Interpolator::EaseIn => {
                if t < 0.2 {
                    EASE_IN_S1 * t * t
                } else {
                    EASE_IN_S3 * t - EASE_IN_S4
                }
            }
            Interpolator::EaseOut => {
                if t > 0.8 {
                    EASE_OUT_S1 * t * t + EASE_OUT_S2 * t + EASE_OUT_S3
                } else {
                    EASE_OUT_S4 * t
                }
            }
            Interpolator::EaseBoth => {
                if t < 0.2 {
                    3.125 * t * t
                } else if t > 0.8 {
                    -3.125 * t * t + 6.25 * t - 2.125
                } else {
                    1.25 * t - 0.125
                }
            }
            Interpolator::Spline([x1, y1, x2, y2]) => {
                functions::bezier_ease(t, *x1, *y1, *x2, *y2)
            }
        }
    }

    /// Interpolate between `start` and `end` at raw fraction `t`.
    pub fn interpolate(&self, start: &Value, end: &Value, t: f64) -> Value {
        match self {
            Interpolator::Custom(f) => (f.0)(start, end, t),
            _ => functions::linear_value(start, end, self.curve(t)),
        }
    }
}

impl PartialEq for Interpolator {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Interpolator::Linear, Interpolator::Linear)
            | (Interpolator::Discrete, Interpolator::Discrete)
            | (Interpolator::EaseIn, Interpolator::EaseIn)
            | (Interpolator::EaseOut, Interpolator::EaseOut)
            | (Interpolator::EaseBoth, Interpolator::EaseBoth) => true,
            (Interpolator::Spline(a), Interpolator::Spline(b)) => a == b,
            (Interpolator::Custom(a), Interpolator::Custom(b)) => Rc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-9, "left={a} right={b}");
    }

    #[test]
    fn easing_curves_are_continuous_and_pinned() {
        for interp in [
            Interpolator::Linear,
            Interpolator::EaseIn,
            Interpolator::EaseOut,
            Interpolator::EaseBoth,
            Interpolator::Spline([0.25, 0.1, 0.25, 1.0]),
        ] {
            approx(interp.curve(0.0), 0.0);
            approx(interp.curve(1.0), 1.0);
        }
        // piecewise joins
        approx(Interpolator::EaseIn.curve(0.2), 1.0 / 9.0);
        approx(Interpolator::EaseOut.curve(0.8), 8.0 / 9.0);
        approx(Interpolator::EaseBoth.curve(0.2), 0.125);
        approx(Interpolator::EaseBoth.curve(0.8), 0.875);
    }

    #[test]
    fn discrete_switches_only_at_one() {
        let a = Value::f(0.0);
        let b = Value::f(10.0);
        assert_eq!(Interpolator::Discrete.interpolate(&a, &b, 0.999), a);
        assert_eq!(Interpolator::Discrete.interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn custom_receives_raw_fraction() {
        let interp = Interpolator::custom(|_, _, t| Value::f(t as f32 * 2.0));
        assert_eq!(
            interp.interpolate(&Value::f(0.0), &Value::f(1.0), 0.25),
            Value::f(0.5)
        );
        assert_eq!(interp, interp.clone());
    }

    #[test]
    fn serializes_by_name() {
        let json = serde_json::to_value(Interpolator::EaseBoth).unwrap();
        assert_eq!(json, serde_json::json!("ease-both"));
        let spline: Interpolator =
            serde_json::from_value(serde_json::json!({ "spline": [0.4, 0.0, 0.6, 1.0] })).unwrap();
        assert_eq!(spline, Interpolator::Spline([0.4, 0.0, 0.6, 1.0]));
    }
}
