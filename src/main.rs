//! Entry point for the **edgevol** daemon.
//!
//! Spawns the command socket listener on a background thread and processes
//! incoming commands on the main thread.
//!
//! When the `overlay-gtk` feature is enabled the main thread runs the
//! GLib main loop (GTK4 requires it) and polls the command channel from
//! there.  With `--headless`, or without the feature, a simple blocking
//! loop drives a strip host that only logs.

use edgevol::backend::haptics::NoHaptics;
use edgevol::backend::wpctl::WpctlOutput;
use edgevol::command::Command;
use edgevol::config::Config;
use edgevol::coordinator::OverlayCoordinator;
use edgevol::geometry::ScreenInfo;
use edgevol::ipc::listener::UnixSocketListener;
use edgevol::overlay::headless::HeadlessHost;
use edgevol::traits::CommandSource;
use log::{error, info};
use std::sync::mpsc;

/// Screen size assumed by the headless host.
const HEADLESS_SCREEN: ScreenInfo = ScreenInfo {
    width: 1920,
    height: 1080,
};

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/edgevol.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/edgevol`).
fn config_dir() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    std::path::PathBuf::from(base).join("edgevol")
}

/// Try to load the config from `$XDG_CONFIG_HOME/edgevol/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no usable config file ({}), using defaults", e);
            Config::default()
        }
    }
}

/// Resolve the CSS stylesheet path.
#[cfg(feature = "overlay-gtk")]
fn css_path() -> std::path::PathBuf {
    config_dir().join("style.css")
}

//  Main

fn main() {
    env_logger::init();

    let headless = std::env::args().any(|a| a == "--headless");
    let config = load_config();
    let output = WpctlOutput::new(config.output.max_level);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx.clone());

    if headless {
        drop(cmd_tx);
        run_headless(config, output, cmd_rx);
    } else {
        start_event_loop(config, output, cmd_tx, cmd_rx);
    }
}

//  Event loops

#[cfg(feature = "overlay-gtk")]
fn start_event_loop(
    config: Config,
    output: WpctlOutput,
    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: mpsc::Receiver<Command>,
) {
    edgevol::overlay::gtk::run_main_loop(config, output, NoHaptics, cmd_tx, cmd_rx, Some(css_path()));
}

#[cfg(not(feature = "overlay-gtk"))]
fn start_event_loop(
    config: Config,
    output: WpctlOutput,
    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: mpsc::Receiver<Command>,
) {
    info!("built without `overlay-gtk`, running headless");
    drop(cmd_tx);
    run_headless(config, output, cmd_rx);
}

/// Blocking loop around a [`HeadlessHost`]; strips only exist in the log
/// and pointer input arrives over the socket.
fn run_headless(config: Config, output: WpctlOutput, cmd_rx: mpsc::Receiver<Command>) {
    let host = HeadlessHost::new(HEADLESS_SCREEN);
    let mut coordinator = match OverlayCoordinator::start(host, output, NoHaptics, &config) {
        Ok(c) => c,
        Err(e) => {
            error!("cannot start: {}", e);
            std::process::exit(1);
        }
    };

    info!("edgevol running headless");
    for cmd in cmd_rx {
        if let Err(e) = coordinator.handle(cmd) {
            error!("command error: {}", e);
        }
        if !coordinator.is_running() {
            break;
        }
    }
    coordinator.shutdown();
    info!("edgevol exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
