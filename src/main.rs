//! Swish demo - plays contact-event scripts through the gesture engine
//!
//! Feeds either a JSON-lines contact script or a built-in scenario reel
//! through the calloop runtime in real time and logs every recognized
//! gesture. Useful for exercising the engine without touch hardware.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swish::input::script;
use swish::{
    ContactEvent, EngineClock, EngineConfig, GestureEngine, GestureHandlers, GestureRuntime, Point,
};

#[derive(Parser, Debug)]
#[command(name = "swish")]
#[command(about = "Single-contact touch gesture recognition demo", long_about = None)]
struct Args {
    /// Play a JSON-lines contact script instead of the built-in reel
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Set up panic hook to log panics before crashing
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        if let Ok(home) = std::env::var("HOME") {
            let crash_log = format!("{}/.local/state/swish/crash.log", home);
            if let Ok(mut f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                use std::io::Write;
                let _ = writeln!(f, "[{}] PANIC: {}", chrono::Local::now(), panic_info);
            }
        }
    }));

    // Log directory (~/.local/state/swish or /tmp/swish)
    let log_dir = std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local/state")))
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
        .join("swish");

    std::fs::create_dir_all(&log_dir).ok();

    let args = Args::parse();

    // File appender, rotates daily
    let file_appender = rolling::daily(&log_dir, "swish.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Quiet by default, verbose with --debug
    let default_filter = if args.debug {
        "debug,swish=debug"
    } else {
        "warn,swish=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    info!(
        swipe_threshold = config.swipe_threshold,
        long_press_delay_ms = config.long_press_delay_ms,
        double_tap_delay_ms = config.double_tap_delay_ms,
        "swish demo starting"
    );

    let events = match &args.script {
        Some(path) => script::load_script(path)
            .with_context(|| format!("loading script from {}", path.display()))?,
        None => built_in_reel(),
    };
    info!(events = events.len(), "playing contact events");

    let engine = GestureEngine::new(config, demo_handlers());
    let (runtime, sender) = GestureRuntime::new(engine)?;
    let clock = runtime.clock();

    let feeder = thread::spawn(move || play_events(&events, &sender, clock));
    runtime.run()?;
    feeder
        .join()
        .map_err(|_| anyhow::anyhow!("feeder thread panicked"))?;

    info!("all events played, exiting");
    Ok(())
}

/// Handlers that log every recognized gesture
fn demo_handlers() -> GestureHandlers {
    GestureHandlers {
        on_swipe_left: Some(Box::new(|delta| info!(?delta, "swipe left"))),
        on_swipe_right: Some(Box::new(|delta| info!(?delta, "swipe right"))),
        on_swipe_up: Some(Box::new(|delta| info!(?delta, "swipe up"))),
        on_swipe_down: Some(Box::new(|delta| info!(?delta, "swipe down"))),
        on_tap: Some(Box::new(|position| info!(?position, "tap"))),
        on_double_tap: Some(Box::new(|position| info!(?position, "double tap"))),
        on_long_press: Some(Box::new(|position| info!(?position, "long press"))),
        on_drag: Some(Box::new(|drag| {
            debug!(
                dx = drag.delta.x,
                dy = drag.delta.y,
                distance = drag.distance_from_origin,
                "drag"
            )
        })),
    }
}

/// Send each event when the shared clock reaches its timestamp
fn play_events(events: &[ContactEvent], sender: &calloop::channel::Sender<ContactEvent>, clock: EngineClock) {
    for event in events {
        if let Some(time_ms) = event.time_ms() {
            let now = clock.now_ms();
            if time_ms > now {
                thread::sleep(Duration::from_millis(time_ms - now));
            }
        }
        if sender.send(*event).is_err() {
            return;
        }
    }
}

/// Scenario reel covering every gesture class
fn built_in_reel() -> Vec<ContactEvent> {
    let p = |x: f64, y: f64| Point::new(x, y);
    vec![
        // Tap
        ContactEvent::Down { position: p(200.0, 300.0), time_ms: 100 },
        ContactEvent::Up { time_ms: 180 },
        // Double tap
        ContactEvent::Down { position: p(200.0, 300.0), time_ms: 700 },
        ContactEvent::Up { time_ms: 740 },
        ContactEvent::Down { position: p(202.0, 298.0), time_ms: 880 },
        ContactEvent::Up { time_ms: 920 },
        // Long press, held quietly past the delay
        ContactEvent::Down { position: p(200.0, 300.0), time_ms: 1500 },
        ContactEvent::Up { time_ms: 2200 },
        // Swipe right
        ContactEvent::Down { position: p(100.0, 300.0), time_ms: 2600 },
        ContactEvent::Motion { position: p(140.0, 302.0), time_ms: 2650 },
        ContactEvent::Motion { position: p(190.0, 305.0), time_ms: 2700 },
        ContactEvent::Up { time_ms: 2720 },
        // Swipe left
        ContactEvent::Down { position: p(300.0, 300.0), time_ms: 3200 },
        ContactEvent::Motion { position: p(210.0, 295.0), time_ms: 3280 },
        ContactEvent::Up { time_ms: 3300 },
        // Swipe up
        ContactEvent::Down { position: p(200.0, 400.0), time_ms: 3800 },
        ContactEvent::Motion { position: p(205.0, 310.0), time_ms: 3880 },
        ContactEvent::Up { time_ms: 3900 },
        // Swipe down
        ContactEvent::Down { position: p(200.0, 200.0), time_ms: 4400 },
        ContactEvent::Motion { position: p(195.0, 290.0), time_ms: 4480 },
        ContactEvent::Up { time_ms: 4500 },
        // Small drag in the dead zone, no gesture
        ContactEvent::Down { position: p(200.0, 300.0), time_ms: 5000 },
        ContactEvent::Motion { position: p(225.0, 300.0), time_ms: 5080 },
        ContactEvent::Up { time_ms: 5100 },
        // Cancelled contact, no gesture
        ContactEvent::Down { position: p(200.0, 300.0), time_ms: 5600 },
        ContactEvent::Motion { position: p(208.0, 300.0), time_ms: 5650 },
        ContactEvent::Cancel,
    ]
}
