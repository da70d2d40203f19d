//! Core configuration for cadence-timeline-core.

use serde::{Deserialize, Serialize};

/// How `interpolate` finds the active interval of each target.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum IntervalLookup {
    /// Walk intervals in order.
    Linear,
    /// Binary search over end ticks. Same result as `Linear`, including ties.
    #[default]
    Binary,
}

/// Engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub interval_lookup: IntervalLookup,
    /// Reject key frame lists whose ticks decrease.
    #[serde(default = "default_strict_ticks")]
    pub strict_ticks: bool,
}

fn default_strict_ticks() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_lookup: IntervalLookup::default(),
            strict_ticks: default_strict_ticks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        let cfg: Config = serde_json::from_str(r#"{ "interval_lookup": "Linear" }"#).unwrap();
        assert_eq!(cfg.interval_lookup, IntervalLookup::Linear);
        assert!(cfg.strict_ticks);
    }
}
