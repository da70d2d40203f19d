use std::cell::RefCell;
use std::rc::Rc;

use cadence_timeline::{
    Config, KeyFrame, KeyValue, LoopMode, Playback, PlaybackEvent, PlaybackState, Target,
    TargetRef, Value, ValueCell,
};

fn ramp(duration: u64) -> (Rc<ValueCell>, Playback) {
    let cell = ValueCell::shared("x", Value::f(0.0));
    let x: TargetRef = cell.clone();
    let playback = Playback::from_key_frames(
        Config::default(),
        vec![
            KeyFrame::new(0, vec![KeyValue::new(x.clone(), 0.0)]),
            KeyFrame::new(duration, vec![KeyValue::new(x, 100.0)]),
        ],
    )
    .expect("valid key frames");
    (cell, playback)
}

fn x(cell: &ValueCell) -> f32 {
    cell.get().as_float().expect("scalar")
}

#[test]
fn once_runs_to_the_end_and_stops() {
    let (cell, mut pb) = ramp(10);
    pb.play();
    assert_eq!(pb.state(), PlaybackState::Running);
    assert_eq!(pb.drain_events(), vec![PlaybackEvent::Started]);
    assert_eq!(x(&cell), 0.0);

    pb.advance(4);
    assert_eq!(x(&cell), 40.0);
    assert_eq!(pb.current_tick(), 4);

    pb.advance(20);
    assert_eq!(x(&cell), 100.0);
    assert_eq!(pb.state(), PlaybackState::Stopped);
    assert_eq!(pb.drain_events(), vec![PlaybackEvent::Finished { tick: 10 }]);

    // stopped playback ignores the clock
    pb.advance(3);
    assert_eq!(cell.writes(), 3);
}

#[test]
fn play_resyncs_deferred_starts() {
    let cell = ValueCell::shared("y", Value::f(0.0));
    let y: TargetRef = cell.clone();
    let mut pb = Playback::from_key_frames(
        Config::default(),
        vec![KeyFrame::new(10, vec![KeyValue::new(y, 5.0)])],
    )
    .unwrap();

    cell.set(Value::f(2.0));
    pb.play();
    assert_eq!(x(&cell), 2.0);
    pb.advance(10);
    assert_eq!(x(&cell), 5.0);
    assert_eq!(pb.state(), PlaybackState::Stopped);

    // replay starts from where the target now is
    pb.play();
    assert_eq!(x(&cell), 5.0);
    cell.set(Value::f(-5.0));
    pb.stop();
    pb.play();
    pb.advance(5);
    assert_eq!(x(&cell), 0.0);
}

#[test]
fn pause_and_resume_hold_position() {
    let (cell, mut pb) = ramp(10);
    pb.play();
    pb.advance(3);
    pb.pause();
    pb.advance(5);
    assert_eq!(x(&cell), 30.0);
    pb.play();
    pb.advance(1);
    assert_eq!(x(&cell), 40.0);
    assert_eq!(
        pb.drain_events(),
        vec![
            PlaybackEvent::Started,
            PlaybackEvent::Paused,
            PlaybackEvent::Resumed
        ]
    );
}

#[test]
fn loop_wraps_and_counts_cycles() {
    let (cell, mut pb) = ramp(10);
    pb.set_loop_mode(LoopMode::Loop);
    pb.play();
    pb.drain_events();

    pb.advance(25);
    assert_eq!(x(&cell), 50.0);
    assert_eq!(
        pb.drain_events(),
        vec![
            PlaybackEvent::CycleCompleted { cycle: 1 },
            PlaybackEvent::CycleCompleted { cycle: 2 }
        ]
    );
    assert_eq!(pb.current_tick(), 5);
}

#[test]
fn ping_pong_reverses_odd_cycles() {
    let (cell, mut pb) = ramp(10);
    pb.set_loop_mode(LoopMode::PingPong);
    pb.play();
    pb.advance(13);
    assert_eq!(x(&cell), 70.0);
    pb.advance(5);
    assert_eq!(x(&cell), 20.0);
    pb.advance(4);
    assert_eq!(x(&cell), 20.0);
}

#[test]
fn cycle_count_finishes_on_the_last_cycle_end() {
    let (cell, mut pb) = ramp(10);
    pb.set_loop_mode(LoopMode::PingPong);
    pb.set_cycle_count(Some(2));
    pb.play();
    pb.drain_events();
    pb.advance(35);
    assert_eq!(x(&cell), 0.0);
    assert_eq!(pb.state(), PlaybackState::Stopped);
    assert_eq!(
        pb.drain_events(),
        vec![
            PlaybackEvent::CycleCompleted { cycle: 1 },
            PlaybackEvent::Finished { tick: 0 }
        ]
    );
}

#[derive(Default)]
struct Recorder {
    written: RefCell<Vec<Value>>,
}

impl Target for Recorder {
    fn read(&self) -> Value {
        self.written.borrow().last().cloned().unwrap_or_default()
    }

    fn write(&self, value: Value) {
        self.written.borrow_mut().push(value);
    }
}

#[test]
fn cycle_limit_writes_every_crossed_cycle_end() {
    let rec = Rc::new(Recorder::default());
    let target: TargetRef = rec.clone();
    let mut pb = Playback::from_key_frames(
        Config::default(),
        vec![
            KeyFrame::new(0, vec![KeyValue::new(target.clone(), 0.0)]),
            KeyFrame::new(10, vec![KeyValue::new(target, 100.0)]),
        ],
    )
    .unwrap();
    pb.set_loop_mode(LoopMode::PingPong);
    pb.set_cycle_count(Some(3));
    pb.play();
    pb.drain_events();

    pb.advance(35);
    assert_eq!(
        *rec.written.borrow(),
        vec![Value::f(0.0), Value::f(100.0), Value::f(0.0), Value::f(100.0)]
    );
    assert_eq!(
        pb.drain_events(),
        vec![
            PlaybackEvent::CycleCompleted { cycle: 1 },
            PlaybackEvent::CycleCompleted { cycle: 2 },
            PlaybackEvent::Finished { tick: 10 }
        ]
    );
}

#[test]
fn rate_scales_advancing() {
    let (cell, mut pb) = ramp(100);
    pb.set_rate(2.5);
    pb.play();
    pb.advance(10);
    assert_eq!(x(&cell), 25.0);
    pb.set_rate(-1.0);
    pb.advance(10);
    assert_eq!(x(&cell), 25.0);
}

#[test]
fn jump_to_writes_immediately_and_clamps() {
    let (cell, mut pb) = ramp(10);
    pb.jump_to(6);
    assert_eq!(x(&cell), 60.0);
    pb.jump_to(50);
    assert_eq!(x(&cell), 100.0);
    assert_eq!(pb.current_tick(), 10);
}

#[test]
fn new_key_frames_apply_on_next_advance() {
    let (cell, mut pb) = ramp(10);
    let x_target: TargetRef = cell.clone();
    pb.play();
    pb.advance(5);
    pb.set_key_frames(vec![
        KeyFrame::new(0, vec![KeyValue::new(x_target.clone(), 0.0)]),
        KeyFrame::new(10, vec![KeyValue::new(x_target, -100.0)]),
    ])
    .unwrap();
    assert!(!pb.engine().is_valid());
    pb.advance(1);
    assert_eq!(x(&cell), -60.0);
}
