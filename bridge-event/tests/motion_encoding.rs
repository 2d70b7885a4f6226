use bridge_event::context::{FixedClock, IdentityTransform, SurfaceNotReady};
use bridge_event::geometry::{Point, PointF};
use bridge_event::input::{
    KeyOccurrence, MotionOccurrence, PointerReadError, PointerSample, TouchPoint, keycode,
    motion_action,
};
use bridge_event::kind::DomKeyLocation;
use bridge_event::{EventEnvelope, EventKind, EventPayload};
use std::f32::consts::FRAC_PI_2;

struct FakeMotion {
    action: i32,
    action_index: usize,
    event_time: i64,
    pointers: Vec<Result<PointerSample, PointerReadError>>,
}

impl MotionOccurrence for FakeMotion {
    fn action_masked(&self) -> i32 {
        self.action
    }
    fn action_index(&self) -> usize {
        self.action_index
    }
    fn event_time(&self) -> i64 {
        self.event_time
    }
    fn meta_state(&self) -> i32 {
        0
    }
    fn pointer_count(&self) -> usize {
        self.pointers.len()
    }
    fn pointer(&self, index: usize) -> Result<PointerSample, PointerReadError> {
        self.pointers
            .get(index)
            .cloned()
            .unwrap_or(Err(PointerReadError::OutOfRange { index }))
    }
}

fn sample(x: f32, y: f32, id: i32, orientation: f32) -> PointerSample {
    PointerSample {
        x,
        y,
        pointer_id: id,
        orientation,
        tool_major: 40.0,
        tool_minor: 20.0,
        pressure: 0.5,
    }
}

fn clock() -> FixedClock {
    FixedClock {
        now_millis: 1_000_000,
        uptime_millis: 5_000,
    }
}

fn motion_of(ev: &EventEnvelope) -> &bridge_event::input::MotionEvent {
    match ev.payload() {
        EventPayload::Motion(m) => m,
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[test]
fn multi_touch_is_encoded_per_point() {
    let m = FakeMotion {
        action: motion_action::POINTER_DOWN,
        action_index: 1,
        event_time: 4_000,
        pointers: vec![
            Ok(sample(10.4, 20.5, 3, FRAC_PI_2)),
            Ok(sample(1.0, 2.0, 7, 0.0)),
        ],
    };
    let ev = EventEnvelope::motion(&m, true, &IdentityTransform, &clock());
    assert_eq!(ev.kind(), EventKind::Motion);

    let motion = motion_of(&ev);
    assert_eq!(motion.time(), 1_000_000 - 5_000 + 4_000);
    assert_eq!(motion.pointer_index(), 1);
    assert_eq!(motion.count(), 2);

    let first = motion.points()[0];
    assert_eq!(first.position, Point::new(10, 21));
    assert_eq!(first.pointer_id, 3);
    // 90° 折叠为 -90° 后平移，走交换长短轴的分支
    assert_eq!(first.orientation, 0.0);
    assert_eq!(first.radius, Point::new(20, 10));

    let second = motion.points()[1];
    assert_eq!(second.orientation, 0.0);
    assert_eq!(second.radius, Point::new(10, 20));
}

#[test]
fn failing_point_degrades_to_placeholder() {
    let m = FakeMotion {
        action: motion_action::MOVE,
        action_index: 0,
        event_time: 0,
        pointers: vec![
            Err(PointerReadError::Sensor("bad read".into())),
            Ok(sample(5.0, 5.0, 1, 0.0)),
        ],
    };
    let ev = EventEnvelope::motion(&m, true, &IdentityTransform, &clock());
    let motion = motion_of(&ev);
    assert_eq!(motion.count(), 2);
    assert_eq!(motion.points()[0], TouchPoint::PLACEHOLDER);
    assert_eq!(motion.points()[1].position, Point::new(5, 5));
}

#[test]
fn transform_failure_only_degrades_points() {
    let m = FakeMotion {
        action: motion_action::DOWN,
        action_index: 0,
        event_time: 0,
        pointers: vec![Ok(sample(5.0, 5.0, 1, 0.0))],
    };
    let ev = EventEnvelope::motion(&m, false, &SurfaceNotReady, &clock());
    let motion = motion_of(&ev);
    assert_eq!(motion.points(), &[TouchPoint::PLACEHOLDER]);
}

#[test]
fn layer_transform_is_applied() {
    let m = FakeMotion {
        action: motion_action::UP,
        action_index: 0,
        event_time: 0,
        pointers: vec![Ok(sample(5.0, 6.0, 1, 0.0))],
    };
    let shift = |p: PointF| Some(PointF::new(p.x + 100.0, p.y - 1.0));
    let ev = EventEnvelope::motion(&m, false, &shift, &clock());
    assert_eq!(motion_of(&ev).points()[0].position, Point::new(105, 5));
}

#[test]
fn other_actions_carry_no_points() {
    let m = FakeMotion {
        action: motion_action::SCROLL,
        action_index: 0,
        event_time: 0,
        pointers: vec![Ok(sample(5.0, 6.0, 1, 0.0))],
    };
    let ev = EventEnvelope::motion(&m, true, &IdentityTransform, &clock());
    let motion = motion_of(&ev);
    assert_eq!(motion.count(), 0);
    assert_eq!(motion.pointer_index(), -1);

    let wire = ev.to_wire();
    assert_eq!(wire.pointer_index, -1);
    assert!(wire.points.is_empty());
}

#[test]
fn wire_form_keeps_parallel_point_arrays() {
    let m = FakeMotion {
        action: motion_action::MOVE,
        action_index: 0,
        event_time: 10,
        pointers: vec![
            Ok(sample(1.0, 1.0, 4, 0.0)),
            Ok(sample(2.0, 2.0, 9, FRAC_PI_2)),
        ],
    };
    let wire = EventEnvelope::motion(&m, true, &IdentityTransform, &clock()).to_wire();
    assert_eq!(wire.kind, 2);
    assert_eq!(wire.count, 2);
    assert_eq!(wire.point_indices, vec![4, 9]);
    assert_eq!(wire.point_radii, vec![Point::new(10, 20), Point::new(20, 10)]);
    assert_eq!(wire.pressures, vec![0.5, 0.5]);
}

struct Dpad;

impl KeyOccurrence for Dpad {
    fn action(&self) -> i32 {
        1
    }
    fn event_time(&self) -> i64 {
        77
    }
    fn meta_state(&self) -> i32 {
        0x1
    }
    fn flags(&self) -> i32 {
        0
    }
    fn key_code(&self) -> i32 {
        keycode::DPAD_LEFT
    }
    fn unicode_char(&self, _meta_state: i32) -> i32 {
        0
    }
    fn repeat_count(&self) -> i32 {
        2
    }
    fn characters(&self) -> Option<&str> {
        None
    }
}

#[test]
fn dpad_keys_report_joystick_location() {
    let wire = EventEnvelope::key(&Dpad, 0x40).to_wire();
    assert_eq!(wire.kind, EventKind::Key.value());
    assert_eq!(wire.meta_state, 0x41);
    assert_eq!(wire.dom_key_location, Some(DomKeyLocation::Joystick));
    assert_eq!(wire.repeat_count, 2);

    let ime_key = EventEnvelope::ime_key(&Dpad).to_wire();
    assert_eq!(ime_key.kind, EventKind::ImeKey.value());
    assert_eq!(ime_key.meta_state, 0x1);
}
