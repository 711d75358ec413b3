//! autoshot -- headless host adapter.
//!
//! Reads host events from stdin (see `host::HostCommand`) and drives a
//! `SessionContext` with them, the way the game's hooks would.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use clap::Parser;

use autoshot::host::{self, HostCommand};
use autoshot::platform::{self, DryRunInjector, KeyInjector};
use autoshot::{
    Config, FrameScheduler, LifecycleListener, ScreenshotTrigger, SessionContext, SettingsStore,
};

#[derive(Debug, Parser)]
#[command(version, about = "Send a screenshot keybind on new bests and level completions")]
struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/autoshot/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log key events instead of injecting them
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = args
        .config
        .or_else(Config::default_path)
        .unwrap_or_else(|| PathBuf::from("config.toml"));
    let config = Config::load(&config_path)?;

    let injector: Rc<dyn KeyInjector> = if args.dry_run {
        Rc::new(DryRunInjector)
    } else {
        Rc::from(platform::create_key_injector()?)
    };

    let scheduler = Rc::new(FrameScheduler::new());
    let trigger = ScreenshotTrigger::new(injector, config.keybind.clone());
    let store = SettingsStore::new(config.settings_path(&config_path));
    let mut ctx = SessionContext::new(config, store, trigger, scheduler.clone());

    log::info!("autoshot v{}", env!("CARGO_PKG_VERSION"));
    ctx.on_launch();

    let mut last_frame = Instant::now();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let keep_going = match HostCommand::parse(&line) {
            None => true,
            Some(Err(e)) => {
                log::warn!("host: {e}");
                true
            }
            Some(Ok(HostCommand::Tick(dt))) => {
                scheduler.tick(dt);
                true
            }
            Some(Ok(command)) => host::apply(&mut ctx, &command),
        };

        let now = Instant::now();
        scheduler.tick(now - last_frame);
        last_frame = now;

        if !keep_going {
            break;
        }
    }

    ctx.on_session_end();
    ctx.on_save();
    let flushed = scheduler.drain();
    if flushed > 0 {
        log::info!("host: sent {flushed} pending screenshot(s) before exit");
    }
    Ok(())
}
