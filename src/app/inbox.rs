//! The single logical event queue feeding the ritual.
//!
//! Producers (pose stream, face stream, ticker) subscribe with
//! [`Inbox::start`] and push timestamped events through their handle.
//! There is no backpressure: a full queue drops the new event.  Stopping
//! a subscription purges whatever it still had pending.

use heapless::{Deque, Vec};
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::frames::{FaceFrame, PoseFrame};

pub const INBOX_CAPACITY: usize = 32;
pub const MAX_SUBSCRIPTIONS: usize = 4;

/// Opaque producer handle returned by [`Inbox::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u16);

/// Something the ritual reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Pose(PoseFrame),
    Face(FaceFrame),
    Tick,
}

/// An event with its producer and observation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub source: SubscriptionHandle,
    pub at_ms: u64,
    pub event: InboundEvent,
}

pub struct Inbox {
    queue: Deque<Envelope, INBOX_CAPACITY>,
    active: Vec<(SubscriptionHandle, &'static str), MAX_SUBSCRIPTIONS>,
    next_id: u16,
    dropped: u32,
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Inbox {
    pub fn new() -> Self {
        Self {
            queue: Deque::new(),
            active: Vec::new(),
            next_id: 0,
            dropped: 0,
        }
    }

    // ── Subscriptions ─────────────────────────────────────────

    pub fn start(&mut self, source: &'static str) -> Result<SubscriptionHandle> {
        let handle = SubscriptionHandle(self.next_id);
        self.active
            .push((handle, source))
            .map_err(|_| Error::SubscriptionsFull)?;
        self.next_id = self.next_id.wrapping_add(1);
        info!("Inbox: subscribed '{}'", source);
        Ok(handle)
    }

    /// End a subscription and discard its pending events.  Unknown
    /// handles are ignored.
    pub fn stop(&mut self, handle: SubscriptionHandle) {
        let Some(pos) = self.active.iter().position(|(h, _)| *h == handle) else {
            return;
        };
        let (_, source) = self.active.swap_remove(pos);

        let mut purged = 0usize;
        for _ in 0..self.queue.len() {
            if let Some(envelope) = self.queue.pop_front() {
                if envelope.source == handle {
                    purged += 1;
                } else if self.queue.push_back(envelope).is_err() {
                    // Cannot happen: we only re-insert what we just removed.
                    self.dropped += 1;
                }
            }
        }
        info!("Inbox: stopped '{}', purged {} pending", source, purged);
    }

    pub fn is_active(&self, handle: SubscriptionHandle) -> bool {
        self.active.iter().any(|(h, _)| *h == handle)
    }

    // ── Queue ─────────────────────────────────────────────────

    /// Enqueue an event.  Returns `false` if it was dropped.
    pub fn push(&mut self, source: SubscriptionHandle, at_ms: u64, event: InboundEvent) -> bool {
        if !self.is_active(source) {
            debug!("Inbox: event from stopped source {:?} ignored", source);
            return false;
        }
        match self.queue.push_back(Envelope {
            source,
            at_ms,
            event,
        }) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                warn!("Inbox full, dropping event ({} dropped so far)", self.dropped);
                false
            }
        }
    }

    pub fn pop(&mut self) -> Option<Envelope> {
        self.queue.pop_front()
    }

    /// Hand every pending event to `f` in arrival order.
    pub fn drain(&mut self, mut f: impl FnMut(Envelope)) {
        while let Some(envelope) = self.queue.pop_front() {
            f(envelope);
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
