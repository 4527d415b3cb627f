//! Fuzz target: `replay::parse_line`
//!
//! Drives arbitrary bytes through the JSON-lines frame parser and then
//! through the ritual.  Neither may panic, whatever the producer sends.
//!
//! cargo fuzz run fuzz_replay_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use politebox::actuator::{ActuatorCommand, SendOutcome};
use politebox::adapters::replay::parse_line;
use politebox::app::events::AppEvent;
use politebox::app::inbox::{Envelope, Inbox};
use politebox::app::ports::{ActuatorPort, EventSink};
use politebox::app::service::RitualService;
use politebox::config::RitualConfig;

struct Discard;

impl ActuatorPort for Discard {
    fn send(&mut self, command: ActuatorCommand) -> SendOutcome {
        // Every command must still encode to a well-formed line.
        assert!(command.encode().ends_with('\n'));
        SendOutcome::Written
    }
}

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut inbox = Inbox::new();
    let Ok(source) = inbox.start("fuzz") else {
        return;
    };
    let mut now = 0u64;
    for line in text.lines() {
        if let Ok(Some(input)) = parse_line(line) {
            now = input.at_ms.unwrap_or(now.saturating_add(33)).max(now);
            inbox.push(source, now, input.event);
        }
    }

    let mut svc = RitualService::new(RitualConfig::default());
    let (mut hw, mut sink) = (Discard, Discard);
    svc.start(0, &mut sink);
    inbox.drain(|e: Envelope| svc.dispatch(&e, &mut hw, &mut sink));
});
