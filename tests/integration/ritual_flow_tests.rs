//! End-to-end ritual: frames in, wire lines and UI events out.
//!
//! Drives [`RitualService`] with synthetic pose and face frames against
//! the recording [`MockBox`].

use super::mock_hw::{CollectingSink, MockBox, neutral, nose, smiling, torso};

use politebox::app::events::{AppEvent, FaceStatus};
use politebox::app::inbox::{InboundEvent, Inbox};
use politebox::app::service::RitualService;
use politebox::config::{GreetingPolicy, RitualConfig};
use politebox::fsm::StateId;

fn make_service(config: RitualConfig) -> (RitualService, MockBox, CollectingSink) {
    let mut svc = RitualService::new(config);
    let mut sink = CollectingSink::new();
    svc.start(0, &mut sink);
    (svc, MockBox::new(), sink)
}

/// Baseline at 200px, dip to 212px, back to 200px; greets at `t0 + 200`.
fn nod(svc: &mut RitualService, hw: &mut MockBox, sink: &mut CollectingSink, t0: u64) {
    svc.on_pose(&nose(200.0, 0.9), t0, hw, sink);
    svc.on_pose(&nose(212.0, 0.9), t0 + 100, hw, sink);
    svc.on_pose(&nose(200.0, 0.9), t0 + 200, hw, sink);
}

/// Smiling frames every 100 ms over `[from, to]`.
fn smile(svc: &mut RitualService, hw: &mut MockBox, sink: &mut CollectingSink, from: u64, to: u64) {
    for t in (from..=to).step_by(100) {
        svc.on_face(&smiling(), t, hw, sink);
    }
}

/// Greet at 0..200 and hold a smile from 300; unlocked at 3300.
fn unlocked() -> (RitualService, MockBox, CollectingSink) {
    let (mut svc, mut hw, mut sink) = make_service(RitualConfig::default());
    nod(&mut svc, &mut hw, &mut sink, 0);
    smile(&mut svc, &mut hw, &mut sink, 300, 3300);
    assert_eq!(svc.state(), StateId::Unlocked);
    (svc, hw, sink)
}

// ── Arming ────────────────────────────────────────────────────

#[test]
fn nod_arms_with_red_blink() {
    let (mut svc, mut hw, mut sink) = make_service(RitualConfig::default());
    nod(&mut svc, &mut hw, &mut sink, 0);

    assert_eq!(svc.state(), StateId::Armed);
    assert_eq!(hw.take(), ["L1"]);
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: StateId::Idle,
        to: StateId::Armed,
    }));
}

#[test]
fn low_confidence_nose_never_arms() {
    let (mut svc, mut hw, mut sink) = make_service(RitualConfig::default());
    for (i, y) in [200.0, 215.0, 200.0, 215.0, 200.0].into_iter().enumerate() {
        svc.on_pose(&nose(y, 0.1), i as u64 * 100, &mut hw, &mut sink);
    }
    assert_eq!(svc.state(), StateId::Idle);
    assert!(hw.wire.is_empty());
    assert_eq!(svc.greeting_detector().nod_state().unwrap().baseline_y, None);
}

#[test]
fn smiling_while_idle_does_nothing() {
    let (mut svc, mut hw, mut sink) = make_service(RitualConfig::default());
    smile(&mut svc, &mut hw, &mut sink, 0, 5000);
    assert_eq!(svc.state(), StateId::Idle);
    assert!(hw.wire.is_empty());
}

#[test]
fn repeated_bows_arm_only_once() {
    let config = RitualConfig {
        policy: GreetingPolicy::Bow,
        ..RitualConfig::default()
    };
    let (mut svc, mut hw, mut sink) = make_service(config);
    for t in (0..1000).step_by(100) {
        svc.on_pose(&torso(340.0, 300.0), t, &mut hw, &mut sink);
    }
    assert_eq!(svc.state(), StateId::Armed);
    assert_eq!(hw.take(), ["L1"]);
    let arms = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::StateChanged { to: StateId::Armed, .. }))
        .count();
    assert_eq!(arms, 1);
}

// ── Smile hold ────────────────────────────────────────────────

#[test]
fn three_second_smile_unlocks_exactly_once() {
    let (mut svc, mut hw, mut sink) = unlocked();
    assert_eq!(hw.take(), ["L1", "L2", "S90"]);

    // Keeps smiling after the box opened: nothing more is sent.
    smile(&mut svc, &mut hw, &mut sink, 3400, 5000);
    assert!(hw.wire.is_empty());
    assert!(sink.events.contains(&AppEvent::FaceStatus(FaceStatus::BoxOpen)));
}

#[test]
fn progress_rises_monotonically_to_one() {
    let (_svc, _hw, sink) = unlocked();
    let progress = sink.progress();
    assert!(progress.windows(2).all(|w| w[1] >= w[0] || w[1] == 0.0));
    assert!(progress.contains(&1.0));
}

#[test]
fn neutral_frame_at_1500ms_restarts_the_hold() {
    let (mut svc, mut hw, mut sink) = make_service(RitualConfig::default());
    nod(&mut svc, &mut hw, &mut sink, 0);
    hw.take();

    smile(&mut svc, &mut hw, &mut sink, 300, 1700);
    svc.on_face(&neutral(), 1800, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::Armed);
    assert_eq!(svc.smile_progress(), 0.0);
    assert_eq!(sink.progress().last(), Some(&0.0));
    assert!(hw.wire.is_empty());

    // A fresh session needs the full hold again.
    smile(&mut svc, &mut hw, &mut sink, 1900, 4800);
    assert_eq!(svc.state(), StateId::Armed);
    svc.on_face(&smiling(), 4900, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::Unlocked);
    assert_eq!(hw.take(), ["L2", "S90"]);
}

#[test]
fn face_leaving_the_frame_breaks_the_smile() {
    let (mut svc, mut hw, mut sink) = make_service(RitualConfig::default());
    nod(&mut svc, &mut hw, &mut sink, 0);
    smile(&mut svc, &mut hw, &mut sink, 300, 2000);
    svc.on_face(&politebox::frames::FaceFrame::empty(), 2100, &mut hw, &mut sink);
    assert_eq!(svc.smile_progress(), 0.0);
    assert!(sink.events.contains(&AppEvent::FaceStatus(FaceStatus::SmilePrompt)));
}

// ── Re-lock ───────────────────────────────────────────────────

#[test]
fn box_relocks_after_fifteen_seconds() {
    let (mut svc, mut hw, mut sink) = unlocked();
    hw.take();

    svc.tick(3300 + 14_999, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::Unlocked);
    assert!(hw.wire.is_empty());

    svc.tick(3300 + 15_000, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::Idle);
    assert_eq!(hw.take(), ["L0", "S7"]);
    assert_eq!(svc.greeting_detector().nod_state().unwrap().baseline_y, None);
}

#[test]
fn greetings_and_smiles_are_ignored_while_unlocked() {
    let (mut svc, mut hw, mut sink) = unlocked();
    hw.take();
    nod(&mut svc, &mut hw, &mut sink, 4000);
    svc.on_face(&neutral(), 4500, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::Unlocked);
    assert!(hw.wire.is_empty());
}

#[test]
fn countdown_ticks_down_each_second() {
    let (mut svc, mut hw, mut sink) = unlocked();
    for t in (3800..=18_300).step_by(500) {
        svc.tick(t, &mut hw, &mut sink);
    }
    assert_eq!(svc.state(), StateId::Idle);
    let expected: Vec<u64> = (1..=15).rev().collect();
    assert_eq!(sink.countdown_secs(), expected);
}

#[test]
fn second_ritual_needs_a_fresh_baseline() {
    let (mut svc, mut hw, mut sink) = unlocked();
    svc.tick(18_300, &mut hw, &mut sink);
    hw.take();

    // First accepted frame after re-lock only seeds the baseline.
    svc.on_pose(&nose(200.0, 0.9), 18_400, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::Idle);

    nod(&mut svc, &mut hw, &mut sink, 20_000);
    assert_eq!(svc.state(), StateId::Armed);
    assert_eq!(hw.take(), ["L1"]);
}

// ── Degraded actuator ─────────────────────────────────────────

#[test]
fn ritual_runs_with_the_box_unplugged() {
    let mut svc = RitualService::new(RitualConfig::default());
    let mut sink = CollectingSink::new();
    let mut hw = MockBox::unplugged();
    svc.start(0, &mut sink);

    nod(&mut svc, &mut hw, &mut sink, 0);
    smile(&mut svc, &mut hw, &mut sink, 300, 3300);
    assert_eq!(svc.state(), StateId::Unlocked);
    svc.tick(18_300, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::Idle);

    assert!(hw.wire.is_empty());
    assert_eq!(hw.dropped, 5);
    assert!(sink.events.contains(&AppEvent::StateChanged {
        from: StateId::Unlocked,
        to: StateId::Idle,
    }));
}

// ── Inbox routing ─────────────────────────────────────────────

#[test]
fn inbox_feeds_the_ritual_in_arrival_order() {
    let (mut svc, mut hw, mut sink) = make_service(RitualConfig::default());
    let mut inbox = Inbox::new();
    let poses = inbox.start("pose").unwrap();
    let faces = inbox.start("face").unwrap();

    inbox.push(poses, 0, InboundEvent::Pose(nose(200.0, 0.9)));
    inbox.push(poses, 100, InboundEvent::Pose(nose(212.0, 0.9)));
    inbox.push(poses, 200, InboundEvent::Pose(nose(200.0, 0.9)));
    inbox.push(faces, 300, InboundEvent::Face(smiling()));
    inbox.push(faces, 3300, InboundEvent::Face(smiling()));
    inbox.drain(|e| svc.dispatch(&e, &mut hw, &mut sink));

    assert_eq!(svc.state(), StateId::Unlocked);
    assert_eq!(hw.take(), ["L1", "L2", "S90"]);
}

#[test]
fn stopped_face_stream_cannot_unlock() {
    let (mut svc, mut hw, mut sink) = make_service(RitualConfig::default());
    let mut inbox = Inbox::new();
    let poses = inbox.start("pose").unwrap();
    let faces = inbox.start("face").unwrap();

    inbox.push(poses, 0, InboundEvent::Pose(nose(200.0, 0.9)));
    inbox.push(poses, 100, InboundEvent::Pose(nose(212.0, 0.9)));
    inbox.push(poses, 200, InboundEvent::Pose(nose(200.0, 0.9)));
    inbox.push(faces, 300, InboundEvent::Face(smiling()));
    inbox.push(faces, 3300, InboundEvent::Face(smiling()));
    inbox.stop(faces);
    inbox.drain(|e| svc.dispatch(&e, &mut hw, &mut sink));

    assert_eq!(svc.state(), StateId::Armed);
    assert_eq!(hw.take(), ["L1"]);
}
