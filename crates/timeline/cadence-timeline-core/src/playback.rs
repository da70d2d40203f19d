//! Playback: a driving clock around [`TimelineInterpolator`].
//!
//! Hosts feed elapsed ticks through [`Playback::advance`]; the playback maps the
//! running position onto the timeline according to its loop mode and calls
//! `interpolate`. Starting from `Stopped` forces a sync so targets without a
//! tick-0 key frame start from their live value.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::TimelineInterpolator;
use crate::error::TimelineError;
use crate::keyframe::{KeyFrame, Tick};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Running,
    Paused,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoopMode {
    #[default]
    Once,
    Loop,
    /// Alternate forward and backward cycles.
    PingPong,
}

/// Discrete signals emitted by playback control and stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum PlaybackEvent {
    Started,
    Paused,
    Resumed,
    Stopped,
    /// A cycle ended; `cycle` counts completed cycles.
    CycleCompleted { cycle: u64 },
    /// Playback reached its end; `tick` is the final timeline tick written.
    Finished { tick: Tick },
}

#[derive(Debug)]
pub struct Playback {
    engine: TimelineInterpolator,
    state: PlaybackState,
    mode: LoopMode,
    /// Cycles to play in `Loop`/`PingPong`; `None` repeats forever.
    cycle_count: Option<u64>,
    rate: f64,
    /// Unwrapped ticks played since start.
    position: f64,
    current_tick: Tick,
    events: Vec<PlaybackEvent>,
}

impl Playback {
    pub fn new(engine: TimelineInterpolator) -> Self {
        Self {
            engine,
            state: PlaybackState::Stopped,
            mode: LoopMode::Once,
            cycle_count: None,
            rate: 1.0,
            position: 0.0,
            current_tick: 0,
            events: Vec::new(),
        }
    }

    pub fn from_key_frames(cfg: Config, key_frames: Vec<KeyFrame>) -> Result<Self, TimelineError> {
        Ok(Self::new(TimelineInterpolator::with_key_frames(
            cfg, key_frames,
        )?))
    }

    #[inline]
    pub fn engine(&self) -> &TimelineInterpolator {
        &self.engine
    }

    #[inline]
    pub fn engine_mut(&mut self) -> &mut TimelineInterpolator {
        &mut self.engine
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Timeline tick most recently written.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.mode = mode;
    }

    pub fn set_cycle_count(&mut self, cycles: Option<u64>) {
        self.cycle_count = cycles;
    }

    /// Playback rate multiplier on advanced ticks. Negative rates are treated as 0.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };
    }

    /// Replace the key frames. Tables are rebuilt on the next write.
    pub fn set_key_frames(&mut self, key_frames: Vec<KeyFrame>) -> Result<(), TimelineError> {
        self.engine.set_key_frames(key_frames)
    }

    /// Start from tick 0 (when stopped) or resume (when paused).
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Stopped => {
                self.engine.validate(true);
                self.position = 0.0;
                self.write(0);
                self.state = PlaybackState::Running;
                log::debug!("playback started, duration {}", self.engine.duration());
                self.events.push(PlaybackEvent::Started);
            }
            PlaybackState::Paused => {
                self.state = PlaybackState::Running;
                self.events.push(PlaybackEvent::Resumed);
            }
            PlaybackState::Running => {}
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
            self.events.push(PlaybackEvent::Paused);
        }
    }

    /// Stop and rewind. Targets keep their last written values.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Stopped {
            self.state = PlaybackState::Stopped;
            self.position = 0.0;
            self.current_tick = 0;
            self.events.push(PlaybackEvent::Stopped);
        }
    }

    /// Move to `tick` on the timeline (first cycle) and write it immediately.
    pub fn jump_to(&mut self, tick: Tick) {
        let tick = tick.min(self.engine.duration());
        self.position = tick as f64;
        self.write(tick);
    }

    /// Advance a running playback by `delta` clock ticks.
    pub fn advance(&mut self, delta: Tick) {
        if self.state != PlaybackState::Running {
            return;
        }
        let duration = self.engine.duration();
        let previous = self.position;
        self.position += delta as f64 * self.rate;

        if duration == 0 {
            self.finish(0);
            return;
        }
        let span = duration as f64;

        if self.mode == LoopMode::Once {
            if self.position >= span {
                self.finish(duration);
            } else {
                self.write(self.position as Tick);
            }
            return;
        }

        let prev_cycle = (previous / span).floor() as u64;
        let cycle = (self.position / span).floor() as u64;
        if let Some(limit) = self.cycle_count {
            if cycle >= limit {
                for done in prev_cycle + 1..limit {
                    let end = self.cycle_end_tick(done - 1, duration);
                    self.write(end);
                    self.complete_cycle(done);
                }
                let end = self.cycle_end_tick(limit.saturating_sub(1), duration);
                self.finish(end);
                return;
            }
        }
        for done in prev_cycle + 1..=cycle {
            // Finish the cycle being left before wrapping.
            let end = self.cycle_end_tick(done - 1, duration);
            self.write(end);
            self.complete_cycle(done);
        }
        let offset = self.position - cycle as f64 * span;
        let local = match self.mode {
            LoopMode::PingPong if cycle % 2 == 1 => span - offset,
            _ => offset,
        };
        self.write(local.clamp(0.0, span) as Tick);
    }

    /// Drain the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Timeline tick at which cycle `cycle` (0-based) ends.
    fn cycle_end_tick(&self, cycle: u64, duration: Tick) -> Tick {
        match self.mode {
            LoopMode::PingPong if cycle % 2 == 1 => 0,
            _ => duration,
        }
    }

    fn complete_cycle(&mut self, done: u64) {
        log::trace!("playback cycle {done} completed");
        self.events.push(PlaybackEvent::CycleCompleted { cycle: done });
    }

    fn finish(&mut self, tick: Tick) {
        self.write(tick);
        self.state = PlaybackState::Stopped;
        self.position = 0.0;
        log::debug!("playback finished at tick {tick}");
        self.events.push(PlaybackEvent::Finished { tick });
    }

    fn write(&mut self, tick: Tick) {
        self.current_tick = tick;
        self.engine.interpolate(tick);
    }
}
