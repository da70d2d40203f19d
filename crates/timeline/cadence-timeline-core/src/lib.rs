//! Cadence Timeline Core (host-agnostic)
//!
//! Resolves an ordered list of key frames, each assigning values to external
//! targets at integer ticks, into per-tick interpolated writes. Interval
//! tables are built lazily and rebuilt wholesale whenever the key frames are
//! replaced. Targets with no key frame at tick 0 start from their live value,
//! resampled each time playback (re)starts.
//!
//! Single-threaded: targets are shared through `Rc` and written through `&self`.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod interp;
pub mod interval;
pub mod keyframe;
pub mod playback;
pub mod stored_timeline;
pub mod target;
pub mod value;

// Re-exports for hosts
pub use builder::IntervalTable;
pub use config::{Config, IntervalLookup};
pub use engine::TimelineInterpolator;
pub use error::TimelineError;
pub use interp::{CustomInterpolator, Interpolator};
pub use interval::{InterpolationInterval, StartValue, TargetIntervals};
pub use keyframe::{check_key_frames, KeyFrame, KeyValue, Tick};
pub use playback::{LoopMode, Playback, PlaybackEvent, PlaybackState};
pub use stored_timeline::{load_stored_timeline, parse_stored_timeline_json, StoredTimeline};
pub use target::{Target, TargetKey, TargetRef, TargetRegistry, TargetResolver, ValueCell};
pub use value::{Value, ValueKind};

/// Result type for timeline operations.
pub type Result<T> = core::result::Result<T, TimelineError>;
