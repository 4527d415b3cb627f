//! The ritual driving a real [`ActuatorChannel`] over a mock transport.

use super::mock_hw::{CollectingSink, MockProvider, nose, smiling};

use politebox::actuator::{ActuatorChannel, ActuatorCommand, SendOutcome};
use politebox::app::service::RitualService;
use politebox::config::RitualConfig;
use politebox::error::{Error, TransportError};
use politebox::fsm::StateId;

fn run_ritual(channel: &mut ActuatorChannel<MockProvider>) -> RitualService {
    let mut svc = RitualService::new(RitualConfig::default());
    let mut sink = CollectingSink::new();
    svc.start(0, &mut sink);
    svc.on_pose(&nose(200.0, 0.9), 0, channel, &mut sink);
    svc.on_pose(&nose(212.0, 0.9), 100, channel, &mut sink);
    svc.on_pose(&nose(200.0, 0.9), 200, channel, &mut sink);
    svc.on_face(&smiling(), 300, channel, &mut sink);
    svc.on_face(&smiling(), 3300, channel, &mut sink);
    svc.tick(18_300, channel, &mut sink);
    svc
}

#[test]
fn full_cycle_reaches_the_wire_in_order() {
    let (provider, wire) = MockProvider::new();
    let mut channel = ActuatorChannel::with_provider(provider, 9600);
    channel.connect().unwrap();
    channel.send(ActuatorCommand::LedOff);

    let svc = run_ritual(&mut channel);
    assert_eq!(svc.state(), StateId::Idle);
    assert_eq!(wire.borrow().bytes, b"L0\nL1\nL2\nS90\nL0\nS7\n");
    assert_eq!(channel.stats().written, 6);
}

#[test]
fn connect_twice_is_rejected_without_reopening() {
    let (provider, wire) = MockProvider::new();
    let mut channel = ActuatorChannel::with_provider(provider, 9600);
    channel.connect().unwrap();
    assert_eq!(
        channel.connect(),
        Err(Error::Transport(TransportError::AlreadyConnected))
    );
    assert_eq!(wire.borrow().opens, 1);
}

#[test]
fn refused_connect_leaves_ritual_working() {
    let (mut provider, wire) = MockProvider::new();
    provider.refuse = true;
    let mut channel = ActuatorChannel::with_provider(provider, 9600);
    assert_eq!(channel.connect(), Err(Error::Transport(TransportError::OpenFailed)));

    let svc = run_ritual(&mut channel);
    assert_eq!(svc.state(), StateId::Idle);
    assert!(wire.borrow().bytes.is_empty());
    assert_eq!(channel.stats().dropped, 5);
}

#[test]
fn write_failures_never_stop_the_ritual() {
    let (provider, wire) = MockProvider::new();
    let mut channel = ActuatorChannel::with_provider(provider, 9600);
    channel.connect().unwrap();
    wire.borrow_mut().fail_writes = true;

    let svc = run_ritual(&mut channel);
    assert_eq!(svc.state(), StateId::Idle);
    assert_eq!(channel.stats().failed, 5);
    assert_eq!(channel.last_failure(), Some(TransportError::WriteFailed));
    assert!(channel.is_connected());
}

#[test]
fn disconnect_mid_ritual_drops_remaining_commands() {
    let (provider, wire) = MockProvider::new();
    let mut channel = ActuatorChannel::with_provider(provider, 9600);
    channel.connect().unwrap();

    let mut svc = RitualService::new(RitualConfig::default());
    let mut sink = CollectingSink::new();
    svc.start(0, &mut sink);
    svc.on_pose(&nose(200.0, 0.9), 0, &mut channel, &mut sink);
    svc.on_pose(&nose(212.0, 0.9), 100, &mut channel, &mut sink);
    svc.on_pose(&nose(200.0, 0.9), 200, &mut channel, &mut sink);

    channel.disconnect();
    channel.disconnect();
    assert_eq!(wire.borrow().flushes, 1);

    svc.on_face(&smiling(), 300, &mut channel, &mut sink);
    svc.on_face(&smiling(), 3300, &mut channel, &mut sink);
    assert_eq!(svc.state(), StateId::Unlocked);
    assert_eq!(wire.borrow().lines(), ["L1"]);
    assert_eq!(channel.send(ActuatorCommand::LedOff), SendOutcome::Dropped);
}

#[test]
fn out_of_range_angles_are_clamped_on_the_wire() {
    let (provider, wire) = MockProvider::new();
    let mut channel = ActuatorChannel::with_provider(provider, 9600);
    channel.connect().unwrap();
    channel.send(ActuatorCommand::Servo(200.0));
    channel.send(ActuatorCommand::Servo(-5.0));
    channel.send(ActuatorCommand::Servo(45.4));
    channel.send(ActuatorCommand::ServoSweep);
    assert_eq!(wire.borrow().lines(), ["S90", "S7", "S45", "R"]);
}
