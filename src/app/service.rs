//! Application service: the hexagonal core.
//!
//! [`RitualService`] owns the FSM, both detectors and the shared context.
//! Frames and ticks go in, actuator commands and UI events come out
//! through port traits injected at call sites, so the whole ritual is
//! testable with mock adapters.
//!
//! ```text
//!  PoseFrame ─▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  FaceFrame ─▶ │         RitualService        │
//!  Tick      ─▶ │ Greeting · Smile · FSM       │ ──▶ ActuatorPort
//!               └──────────────────────────────┘
//! ```

use log::{debug, info};

use crate::config::RitualConfig;
use crate::detect::{GreetingDetector, GreetingStrategy, SmileDetector};
use crate::frames::{FaceFrame, PoseFrame};
use crate::fsm::context::{RitualContext, RitualInput};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::events::{AppEvent, FaceStatus, ResetCountdown, pose_status};
use super::inbox::{Envelope, InboundEvent};
use super::ports::{ActuatorPort, EventSink};

// ───────────────────────────────────────────────────────────────
// RitualService
// ───────────────────────────────────────────────────────────────

pub struct RitualService {
    fsm: Fsm,
    ctx: RitualContext,
    greeting: GreetingDetector,
    smile: SmileDetector,
    reference_width: f32,

    // Last published UI values, so sinks only see changes.
    published_progress: f32,
    published_countdown_secs: Option<u64>,
    pose_status: Option<&'static str>,
    face_status: Option<FaceStatus>,
}

impl RitualService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: RitualConfig) -> Self {
        let greeting = GreetingDetector::from_config(&config);
        let smile = SmileDetector::new(config.smile.clone());
        let reference_width = config.reference_width_px;
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: RitualContext::new(config),
            greeting,
            smile,
            reference_width,
            published_progress: 0.0,
            published_countdown_secs: None,
            pose_status: None,
            face_status: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.ctx.now_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        sink.emit(&AppEvent::SmileProgress(0.0));
        self.set_pose_status(pose_status::WAITING, sink);
        self.set_face_status(FaceStatus::Waiting, sink);
        info!(
            "RitualService started in {:?} with {:?} greeting",
            self.fsm.current_state(),
            self.greeting.policy()
        );
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Feed one pose frame observed at `now_ms`.
    pub fn on_pose(
        &mut self,
        frame: &PoseFrame,
        now_ms: u64,
        actuator: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let greeted = self.greeting.update(frame, now_ms).is_some();
        if greeted {
            debug!("Greeting ({:?}) at {} ms", self.greeting.policy(), now_ms);
        }

        let input = if greeted {
            RitualInput::Greeting
        } else {
            RitualInput::Pose
        };
        self.step(input, now_ms, actuator, sink);

        let status = match self.fsm.current_state() {
            StateId::Idle if frame.pose.is_some() => pose_status::TRACKING,
            StateId::Idle => pose_status::WAITING,
            StateId::Armed | StateId::Unlocked => pose_status::GREETING_DETECTED,
        };
        self.set_pose_status(status, sink);
    }

    /// Feed one face frame observed at `now_ms`.
    pub fn on_face(
        &mut self,
        frame: &FaceFrame,
        now_ms: u64,
        actuator: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let smiling = self.smile.classify(frame, self.reference_width);
        self.step(RitualInput::Face { smiling }, now_ms, actuator, sink);

        let status = match self.fsm.current_state() {
            StateId::Idle if smiling => FaceStatus::SmileDetected,
            StateId::Idle => FaceStatus::Waiting,
            StateId::Unlocked => FaceStatus::BoxOpen,
            StateId::Armed if !smiling => FaceStatus::SmilePrompt,
            StateId::Armed => {
                let held_ms = self
                    .ctx
                    .smile
                    .started_at_ms()
                    .map_or(0, |t| now_ms.saturating_sub(t));
                if held_ms == 0 {
                    FaceStatus::SmileDetected
                } else {
                    FaceStatus::Holding {
                        held_secs: held_ms as f32 / 1000.0,
                        target_secs: self.ctx.config.smile.hold_ms as f32 / 1000.0,
                    }
                }
            }
        };
        self.set_face_status(status, sink);
    }

    /// Periodic deadline check with no new frame.
    pub fn tick(
        &mut self,
        now_ms: u64,
        actuator: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        self.step(RitualInput::Tick, now_ms, actuator, sink);
    }

    /// Route one inbox envelope to the matching input.
    pub fn dispatch(
        &mut self,
        envelope: &Envelope,
        actuator: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match &envelope.event {
            InboundEvent::Pose(frame) => self.on_pose(frame, envelope.at_ms, actuator, sink),
            InboundEvent::Face(frame) => self.on_face(frame, envelope.at_ms, actuator, sink),
            InboundEvent::Tick => self.tick(envelope.at_ms, actuator, sink),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn smile_progress(&self) -> f32 {
        self.ctx.smile_progress
    }

    /// Countdown to re-lock as of `now_ms`, only while unlocked.
    pub fn reset_countdown(&self, now_ms: u64) -> Option<ResetCountdown> {
        let timer = self.ctx.unlock?;
        let reset_ms = self.ctx.config.reset_ms.max(1);
        let remaining = reset_ms.saturating_sub(timer.elapsed_ms(now_ms));
        Some(ResetCountdown {
            ratio: remaining as f32 / reset_ms as f32,
            remaining_secs: remaining.div_ceil(1000),
        })
    }

    pub fn greeting_detector(&self) -> &GreetingDetector {
        &self.greeting
    }

    // ── Internal ──────────────────────────────────────────────

    fn step(
        &mut self,
        input: RitualInput,
        now_ms: u64,
        actuator: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let from = self.fsm.current_state();
        self.ctx.now_ms = now_ms;
        self.ctx.input = input;
        let moved = self.fsm.step(&mut self.ctx);

        // Delivery is best effort; the outcome never feeds back into the ritual.
        for command in self.ctx.take_commands() {
            let outcome = actuator.send(command);
            debug!("CMD   | {} -> {:?}", command, outcome);
        }
        if self.ctx.take_greeting_reset() {
            self.greeting.reset();
            debug!("Greeting detector reset");
        }

        if let Some(to) = moved {
            sink.emit(&AppEvent::StateChanged { from, to });
            if to == StateId::Idle {
                self.set_pose_status(pose_status::WAITING, sink);
                self.set_face_status(FaceStatus::Waiting, sink);
            } else if to == StateId::Unlocked {
                self.set_face_status(FaceStatus::BoxOpen, sink);
            }
        }

        self.publish_progress(sink);
        self.publish_countdown(now_ms, sink);
    }

    fn publish_progress(&mut self, sink: &mut impl EventSink) {
        let progress = self.ctx.smile_progress;
        if progress != self.published_progress {
            self.published_progress = progress;
            sink.emit(&AppEvent::SmileProgress(progress));
        }
    }

    fn publish_countdown(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        match self.reset_countdown(now_ms) {
            Some(countdown) if self.published_countdown_secs != Some(countdown.remaining_secs) => {
                self.published_countdown_secs = Some(countdown.remaining_secs);
                sink.emit(&AppEvent::ResetCountdown(countdown));
            }
            Some(_) => {}
            None => self.published_countdown_secs = None,
        }
    }

    fn set_pose_status(&mut self, status: &'static str, sink: &mut impl EventSink) {
        if self.pose_status != Some(status) {
            self.pose_status = Some(status);
            sink.emit(&AppEvent::PoseStatus(status));
        }
    }

    fn set_face_status(&mut self, status: FaceStatus, sink: &mut impl EventSink) {
        if self.face_status != Some(status) {
            self.face_status = Some(status);
            sink.emit(&AppEvent::FaceStatus(status));
        }
    }
}
