//! PoliteBox: host entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  stdin JSON-lines   LogEventSink   JsonConfigFile   Clock    │
//! │  (frame reader)     (EventSink)    (ConfigPort)              │
//! │  SerialProvider / LogProvider ──▶ ActuatorChannel            │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  Inbox ──▶ ┌──────────────────────────────────────────┐      │
//! │            │      RitualService (pure logic)          │      │
//! │            │  Greeting · Smile · FSM                  │      │
//! │            └──────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use politebox::actuator::{ActuatorChannel, ActuatorCommand, LogProvider, TransportProvider};
use politebox::adapters::config_file::JsonConfigFile;
use politebox::adapters::log_sink::LogEventSink;
use politebox::adapters::replay::{TimedInput, read_records};
use politebox::adapters::time::ReplayClock;
use politebox::app::inbox::{InboundEvent, Inbox};
use politebox::app::ports::{Clock, ConfigPort};
use politebox::app::service::RitualService;
use politebox::config::{GreetingPolicy, RitualConfig};
use politebox::fsm::StateId;

// ── CLI ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Nod,
    Bow,
}

impl From<PolicyArg> for GreetingPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Nod => GreetingPolicy::Nod,
            PolicyArg::Bow => GreetingPolicy::Bow,
        }
    }
}

/// Greet the box, hold a smile, and it opens.
///
/// Reads JSON-lines pose/face records from stdin.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Serial device of the box controller. Without it commands are only logged.
    #[arg(long)]
    port: Option<String>,

    /// Greeting gesture that arms the box.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// JSON config file. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame width in pixels used to mirror face landmarks.
    #[arg(long)]
    width: Option<f32>,

    /// Run the servo sweep diagnostic after connecting.
    #[arg(long)]
    sweep: bool,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    TermLogger::init(
        args.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("installing terminal logger")?;

    info!("PoliteBox v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;

    match args.port.as_deref() {
        Some(path) => run_serial(path, config, args.sweep),
        None => {
            info!("No --port given, logging commands instead of sending them");
            let channel = ActuatorChannel::with_provider(LogProvider, config.baud_rate);
            run(config, channel, args.sweep)
        }
    }
}

#[cfg(feature = "serial")]
fn run_serial(path: &str, config: RitualConfig, sweep: bool) -> Result<()> {
    use politebox::adapters::serial::SerialProvider;
    let channel = ActuatorChannel::with_provider(SerialProvider::new(path), config.baud_rate);
    run(config, channel, sweep)
}

#[cfg(not(feature = "serial"))]
fn run_serial(path: &str, _config: RitualConfig, _sweep: bool) -> Result<()> {
    anyhow::bail!("--port {path} needs the `serial` feature")
}

fn load_config(args: &Args) -> Result<RitualConfig> {
    let mut config = JsonConfigFile::new(args.config.clone())
        .load()
        .context("loading config")?;
    if let Some(policy) = args.policy {
        config.policy = policy.into();
    }
    if let Some(width) = args.width {
        config.reference_width_px = width;
    }
    config
        .validate()
        .map_err(|e| anyhow!("invalid command line override: {e}"))?;
    info!(
        "Config: policy={:?} width={}px hold={}ms reset={}ms",
        config.policy, config.reference_width_px, config.smile.hold_ms, config.reset_ms
    );
    Ok(config)
}

// ── Event loop ────────────────────────────────────────────────

fn run<P: TransportProvider>(
    config: RitualConfig,
    mut channel: ActuatorChannel<P>,
    sweep: bool,
) -> Result<()> {
    // The ritual runs even without a box; commands are then dropped.
    match channel.connect() {
        Ok(()) => {
            channel.send(ActuatorCommand::LedOff);
            if sweep {
                channel.send(ActuatorCommand::ServoSweep);
            }
        }
        Err(e) => warn!("Box controller unavailable ({e}), continuing without it"),
    }

    let mut clock: ReplayClock = ReplayClock::default();
    let mut sink = LogEventSink::new();
    let mut service = RitualService::new(config.clone());
    let mut inbox = Inbox::new();
    let frames = inbox.start("stdin")?;
    let ticker = inbox.start("ticker")?;
    service.start(clock.now_ms(), &mut sink);

    let (tx, rx) = mpsc::channel::<TimedInput>();
    let reader = thread::Builder::new()
        .name("frames".into())
        .spawn(move || read_records(std::io::stdin().lock(), |input| tx.send(input).is_ok()))
        .context("spawning frame reader")?;

    let tick = Duration::from_millis(config.tick_interval_ms);
    let mut next_tick = Instant::now() + tick;
    loop {
        match rx.recv_timeout(next_tick.saturating_duration_since(Instant::now())) {
            Ok(input) => {
                if let Some(at_ms) = input.at_ms {
                    clock.sync(at_ms);
                }
                inbox.push(frames, clock.now_ms(), input.event);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if Instant::now() >= next_tick {
            inbox.push(ticker, clock.now_ms(), InboundEvent::Tick);
            next_tick = Instant::now() + tick;
        }
        inbox.drain(|e| service.dispatch(&e, &mut channel, &mut sink));
    }

    let stats = reader
        .join()
        .map_err(|_| anyhow!("frame reader panicked"))?
        .context("reading frames from stdin")?;
    info!("Input closed: {} records, {} skipped", stats.records, stats.skipped);
    inbox.stop(frames);

    // Let an open box re-lock before exiting.
    while service.state() == StateId::Unlocked {
        thread::sleep(tick);
        inbox.push(ticker, clock.now_ms(), InboundEvent::Tick);
        inbox.drain(|e| service.dispatch(&e, &mut channel, &mut sink));
    }
    inbox.stop(ticker);

    let sent = channel.stats();
    info!(
        "Channel ({}): {} written, {} dropped, {} failed, {} inbox drops, {} events",
        if channel.is_connected() { "connected" } else { "offline" },
        sent.written,
        sent.dropped,
        sent.failed,
        inbox.dropped(),
        sink.emitted()
    );
    if let Some(failure) = channel.last_failure() {
        warn!("Last channel failure: {failure}");
    }
    channel.disconnect();
    Ok(())
}
