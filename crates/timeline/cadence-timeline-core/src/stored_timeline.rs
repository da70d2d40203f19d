//! Stored timelines: JSON key frames with targets named by path, bound through a [`TargetResolver`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::config::Config;
use crate::engine::TimelineInterpolator;
use crate::error::TimelineError;
use crate::interp::Interpolator;
use crate::keyframe::{KeyFrame, KeyValue, Tick};
use crate::target::TargetResolver;
use crate::value::Value;

/// Timeline description with targets named by path, as stored in JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTimeline {
    pub name: String,
    pub key_frames: Vec<StoredKeyFrame>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoredKeyFrame {
    pub tick: Tick,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub values: Vec<StoredKeyValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoredKeyValue {
    pub target: String,
    pub value: Value,
    pub interpolator: Interpolator,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeline {
    #[serde(default)]
    name: String,
    key_frames: Vec<RawKeyFrame>,
}

#[derive(Deserialize)]
struct RawKeyFrame {
    tick: Tick,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    values: Vec<RawKeyValue>,
}

#[derive(Deserialize)]
struct RawKeyValue {
    target: String,
    value: JsonValue,
    #[serde(default)]
    interpolator: Interpolator,
}

/// Parse stored-timeline JSON.
///
/// Values accept the canonical `{ "type": ..., "data": ... }` layout as well as
/// shorthand: numbers, booleans, strings, numeric arrays (length 2/3/4 become
/// Vec2/Vec3/Vec4, anything else a Vector) and single-key objects such as
/// `{ "quat": [0, 0, 0, 1] }`, `{ "color": [1, 0, 0] }` or
/// `{ "transform": { "pos": [..], "rot": [..], "scale": [..] } }`.
pub fn parse_stored_timeline_json(s: &str) -> Result<StoredTimeline, TimelineError> {
    let raw: RawTimeline = serde_json::from_str(s)?;
    let mut key_frames = Vec::with_capacity(raw.key_frames.len());
    for kf in raw.key_frames {
        let mut values = Vec::with_capacity(kf.values.len());
        for kv in kf.values {
            values.push(StoredKeyValue {
                value: to_core_value(&kv.value)?,
                target: kv.target,
                interpolator: kv.interpolator,
            });
        }
        key_frames.push(StoredKeyFrame {
            tick: kf.tick,
            name: kf.name,
            values,
        });
    }
    Ok(StoredTimeline {
        name: raw.name,
        key_frames,
    })
}

impl StoredTimeline {
    /// Resolve every target path and produce engine key frames.
    pub fn bind(&self, resolver: &mut dyn TargetResolver) -> Result<Vec<KeyFrame>, TimelineError> {
        let mut out = Vec::with_capacity(self.key_frames.len());
        for (index, kf) in self.key_frames.iter().enumerate() {
            let mut values = Vec::with_capacity(kf.values.len());
            for kv in &kf.values {
                let target =
                    resolver
                        .resolve(&kv.target)
                        .ok_or_else(|| TimelineError::UnresolvedTarget {
                            path: kv.target.clone(),
                            key_frame: index,
                        })?;
                values.push(KeyValue::with_interpolator(
                    target,
                    kv.value.clone(),
                    kv.interpolator.clone(),
                ));
            }
            out.push(KeyFrame {
                tick: kf.tick,
                values,
                name: kf.name.clone(),
            });
        }
        Ok(out)
    }

    /// Distinct target paths in first-use order.
    pub fn target_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for kv in self.key_frames.iter().flat_map(|kf| kf.values.iter()) {
            if !paths.contains(&kv.target.as_str()) {
                paths.push(kv.target.as_str());
            }
        }
        paths
    }
}

/// Parse, bind and load a stored timeline in one step.
pub fn load_stored_timeline(
    s: &str,
    resolver: &mut dyn TargetResolver,
    cfg: Config,
) -> Result<TimelineInterpolator, TimelineError> {
    let stored = parse_stored_timeline_json(s)?;
    let key_frames = stored.bind(resolver)?;
    log::debug!(
        "loaded stored timeline '{}' with {} key frames",
        stored.name,
        key_frames.len()
    );
    TimelineInterpolator::with_key_frames(cfg, key_frames)
}

fn invalid(reason: impl Into<String>) -> TimelineError {
    TimelineError::InvalidValue {
        reason: reason.into(),
    }
}

fn numbers(v: &JsonValue) -> Option<Vec<f32>> {
    v.as_array()?
        .iter()
        .map(|x| x.as_f64().map(|f| f as f32))
        .collect()
}

fn fixed<const N: usize>(v: &JsonValue, what: &str) -> Result<[f32; N], TimelineError> {
    let nums = numbers(v).ok_or_else(|| invalid(format!("{what} expects a numeric array")))?;
    nums.try_into()
        .map_err(|got: Vec<f32>| invalid(format!("{what} expects {N} numbers, got {}", got.len())))
}

fn numeric_array(nums: Vec<f32>) -> Value {
    match nums.len() {
        2 => Value::Vec2([nums[0], nums[1]]),
        3 => Value::Vec3([nums[0], nums[1], nums[2]]),
        4 => Value::Vec4([nums[0], nums[1], nums[2], nums[3]]),
        _ => Value::Vector(nums),
    }
}

fn to_core_value(v: &JsonValue) -> Result<Value, TimelineError> {
    match v {
        JsonValue::Number(n) => n
            .as_f64()
            .map(|f| Value::Float(f as f32))
            .ok_or_else(|| invalid(format!("unsupported number {n}"))),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::String(s) => Ok(Value::Text(s.clone())),
        JsonValue::Array(_) => numbers(v)
            .map(numeric_array)
            .ok_or_else(|| invalid("arrays must contain only numbers")),
        JsonValue::Object(obj) => object_value(obj),
        JsonValue::Null => Err(invalid("null is not a value")),
    }
}

fn object_value(obj: &Map<String, JsonValue>) -> Result<Value, TimelineError> {
    if obj.contains_key("type") && obj.contains_key("data") {
        return serde_json::from_value(JsonValue::Object(obj.clone()))
            .map_err(|e| invalid(format!("typed value: {e}")));
    }
    let mut entries = obj.iter();
    let (key, data) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => return Err(invalid("shorthand values must have exactly one key")),
    };
    match key.as_str() {
        "float" => data
            .as_f64()
            .map(|f| Value::Float(f as f32))
            .ok_or_else(|| invalid("float expects a number")),
        "bool" => data
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| invalid("bool expects a boolean")),
        "text" => data
            .as_str()
            .map(|s| Value::Text(s.to_string()))
            .ok_or_else(|| invalid("text expects a string")),
        "vec2" => Ok(Value::Vec2(fixed(data, "vec2")?)),
        "vec3" => Ok(Value::Vec3(fixed(data, "vec3")?)),
        "vec4" => Ok(Value::Vec4(fixed(data, "vec4")?)),
        "quat" => Ok(Value::Quat(fixed(data, "quat")?)),
        "color" => {
            let nums = numbers(data).ok_or_else(|| invalid("color expects a numeric array"))?;
            match nums.as_slice() {
                [r, g, b] => Ok(Value::ColorRgba([*r, *g, *b, 1.0])),
                [r, g, b, a] => Ok(Value::ColorRgba([*r, *g, *b, *a])),
                _ => Err(invalid("color expects 3 or 4 numbers")),
            }
        }
        "vector" => numbers(data)
            .map(Value::Vector)
            .ok_or_else(|| invalid("vector expects a numeric array")),
        "transform" => {
            let pos = match data.get("pos") {
                Some(p) => fixed(p, "transform.pos")?,
                None => [0.0; 3],
            };
            let rot = match data.get("rot") {
                Some(r) => fixed(r, "transform.rot")?,
                None => [0.0, 0.0, 0.0, 1.0],
            };
            let scale = match data.get("scale") {
                Some(s) => fixed(s, "transform.scale")?,
                None => [1.0; 3],
            };
            Ok(Value::Transform { pos, rot, scale })
        }
        other => Err(invalid(format!("unknown value shorthand '{other}'"))),
    }
}
