//! Concrete state handler functions and table builder.
//!
//! ```text
//!  IDLE ──[greeting]──▶ ARMED ──[smile held for hold_ms]──▶ UNLOCKED
//!    ▲                                                        │
//!    └──────────────────[reset_ms elapsed]────────────────────┘
//! ```
//!
//! Handlers only touch the [`RitualContext`].  Actuator commands are
//! queued in its outbox and delivered by the service after the step.

use super::context::{RitualContext, RitualInput, UnlockTimer};
use super::{StateDescriptor, StateId};
use crate::actuator::ActuatorCommand;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Armed
        StateDescriptor {
            id: StateId::Armed,
            name: "Armed",
            on_enter: Some(armed_enter),
            on_exit: None,
            on_update: armed_update,
        },
        // Index 2: Unlocked
        StateDescriptor {
            id: StateId::Unlocked,
            name: "Unlocked",
            on_enter: Some(unlocked_enter),
            on_exit: Some(unlocked_exit),
            on_update: unlocked_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state: locked, waiting for a greeting
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut RitualContext) {
    ctx.smile.clear();
    ctx.smile_progress = 0.0;
    info!("IDLE: box locked, waiting for a greeting");
}

fn idle_update(ctx: &mut RitualContext) -> Option<StateId> {
    match ctx.input {
        RitualInput::Greeting => Some(StateId::Armed),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ARMED state: greeted, waiting for a held smile
// ═══════════════════════════════════════════════════════════════════════════

fn armed_enter(ctx: &mut RitualContext) {
    ctx.smile.clear();
    ctx.smile_progress = 0.0;
    ctx.command(ActuatorCommand::LedRedBlink);
    info!("ARMED: greeted, hold a smile for {} ms", ctx.config.smile.hold_ms);
}

fn armed_update(ctx: &mut RitualContext) -> Option<StateId> {
    // Greetings while armed are ignored; only face frames move the ritual.
    let RitualInput::Face { smiling } = ctx.input else {
        return None;
    };

    if !smiling {
        if ctx.smile.is_active() {
            debug!("ARMED: smile broken, session cleared");
        }
        ctx.smile.clear();
        ctx.smile_progress = 0.0;
        return None;
    }

    let started = ctx.smile.get_or_start(ctx.now_ms);
    let held_ms = ctx.now_ms.saturating_sub(started);
    let hold_ms = ctx.config.smile.hold_ms.max(1);
    ctx.smile_progress = (held_ms as f32 / hold_ms as f32).min(1.0);

    if ctx.smile_progress >= 1.0 {
        info!("ARMED: smile held for {} ms, unlocking", held_ms);
        return Some(StateId::Unlocked);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  UNLOCKED state: box open until the reset window elapses
// ═══════════════════════════════════════════════════════════════════════════

fn unlocked_enter(ctx: &mut RitualContext) {
    ctx.smile.clear();
    ctx.smile_progress = 1.0;
    ctx.unlock = Some(UnlockTimer {
        started_at_ms: ctx.now_ms,
    });
    ctx.command(ActuatorCommand::LedGreen);
    ctx.command(ActuatorCommand::servo_open());
    info!("UNLOCKED: box open for {} ms", ctx.config.reset_ms);
}

fn unlocked_exit(ctx: &mut RitualContext) {
    ctx.unlock = None;
    ctx.smile_progress = 0.0;
    ctx.command(ActuatorCommand::LedOff);
    ctx.command(ActuatorCommand::servo_locked());
    ctx.request_greeting_reset();
    info!("UNLOCKED: re-locking box");
}

fn unlocked_update(ctx: &mut RitualContext) -> Option<StateId> {
    let elapsed = ctx.unlocked_for_ms()?;
    (elapsed >= ctx.config.reset_ms).then_some(StateId::Idle)
}
