//! Mock adapters and frame builders for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history as wire text, without a serial device.

use std::cell::RefCell;
use std::rc::Rc;

use politebox::actuator::{ActuatorCommand, SendOutcome, Transport, TransportProvider};
use politebox::app::events::AppEvent;
use politebox::app::ports::{ActuatorPort, EventSink};
use politebox::error::TransportError;
use politebox::frames::{
    BodyPart, Face, FaceFrame, Point2D, Pose, PoseFrame, PoseKeypoint, landmarks,
};

// ── MockBox ───────────────────────────────────────────────────

/// Recording [`ActuatorPort`].  Commands sent while "unplugged" are
/// counted as dropped and not recorded.
pub struct MockBox {
    pub wire: Vec<String>,
    pub connected: bool,
    pub dropped: usize,
}

#[allow(dead_code)]
impl MockBox {
    pub fn new() -> Self {
        Self {
            wire: Vec::new(),
            connected: true,
            dropped: 0,
        }
    }

    pub fn unplugged() -> Self {
        Self {
            connected: false,
            ..Self::new()
        }
    }

    /// Wire lines recorded since the last call.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.wire)
    }
}

impl Default for MockBox {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockBox {
    fn send(&mut self, command: ActuatorCommand) -> SendOutcome {
        if !self.connected {
            self.dropped += 1;
            return SendOutcome::Dropped;
        }
        self.wire.push(command.to_string());
        SendOutcome::Written
    }
}

// ── CollectingSink ────────────────────────────────────────────

pub struct CollectingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl CollectingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn progress(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::SmileProgress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn countdown_secs(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ResetCountdown(c) => Some(c.remaining_secs),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for CollectingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockProvider / MockTransport ──────────────────────────────

#[derive(Default)]
pub struct MockWire {
    pub bytes: Vec<u8>,
    pub fail_writes: bool,
    pub opens: usize,
    pub flushes: usize,
}

#[allow(dead_code)]
impl MockWire {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.bytes)
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

pub struct MockTransport(Rc<RefCell<MockWire>>);

impl Transport for MockTransport {
    type Error = &'static str;

    fn write_all(&mut self, data: &[u8]) -> Result<(), &'static str> {
        let mut wire = self.0.borrow_mut();
        if wire.fail_writes {
            return Err("cable pulled");
        }
        wire.bytes.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), &'static str> {
        self.0.borrow_mut().flushes += 1;
        Ok(())
    }
}

pub struct MockProvider {
    pub wire: Rc<RefCell<MockWire>>,
    pub refuse: bool,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn new() -> (Self, Rc<RefCell<MockWire>>) {
        let wire = Rc::new(RefCell::new(MockWire::default()));
        (
            Self {
                wire: Rc::clone(&wire),
                refuse: false,
            },
            wire,
        )
    }
}

impl TransportProvider for MockProvider {
    type Transport = MockTransport;

    fn open(&mut self, _baud_rate: u32) -> Result<MockTransport, TransportError> {
        if self.refuse {
            return Err(TransportError::OpenFailed);
        }
        self.wire.borrow_mut().opens += 1;
        Ok(MockTransport(Rc::clone(&self.wire)))
    }
}

// ── Frame builders ────────────────────────────────────────────

pub fn kp(part: BodyPart, x: f32, y: f32, confidence: f32) -> PoseKeypoint {
    PoseKeypoint {
        part,
        position: Point2D::new(x, y),
        confidence,
    }
}

/// A pose with only a nose.
pub fn nose(y: f32, confidence: f32) -> PoseFrame {
    PoseFrame::with_pose(Pose::from_keypoints([kp(BodyPart::Nose, 320.0, y, confidence)]))
}

/// Nose and both shoulders, shoulders level at `shoulder_y`.
#[allow(dead_code)]
pub fn torso(nose_y: f32, shoulder_y: f32) -> PoseFrame {
    PoseFrame::with_pose(Pose::from_keypoints([
        kp(BodyPart::Nose, 320.0, nose_y, 0.9),
        kp(BodyPart::LeftShoulder, 260.0, shoulder_y, 0.9),
        kp(BodyPart::RightShoulder, 380.0, shoulder_y, 0.9),
    ]))
}

/// 468-point face mesh with a 100px mouth.  `lift` and `gap` are in px,
/// so `lift = 5` gives a smile score of 0.05.
pub fn face(lift: f32, gap: f32) -> FaceFrame {
    let mut mesh = vec![Point2D::new(0.0, 0.0); 468];
    let center_y = 200.0 + lift;
    mesh[landmarks::MOUTH_LEFT] = Point2D::new(270.0, 200.0);
    mesh[landmarks::MOUTH_RIGHT] = Point2D::new(370.0, 200.0);
    mesh[landmarks::UPPER_LIP] = Point2D::new(320.0, center_y - gap / 2.0);
    mesh[landmarks::LOWER_LIP] = Point2D::new(320.0, center_y + gap / 2.0);
    FaceFrame::with_face(Face::new(mesh))
}

pub fn smiling() -> FaceFrame {
    face(5.0, 2.0)
}

pub fn neutral() -> FaceFrame {
    face(0.0, 2.0)
}
