use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tapkvm::app::{AppConfig, TapkvmApp};
use tapkvm::gesture::shuttle::ScrollPreset;
use tapkvm::hid::channel::{ControlChannel, WireSink};
use tapkvm::hid::PointerMode;

#[derive(Parser)]
#[command(name = "tapkvm", about = "Touch-first remote KVM input client")]
struct Cli {
    /// Control channel address of the KVM host (host:port); offline mode if
    /// omitted
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Pointer mode
    #[arg(long, value_enum, default_value_t = ModeArg::Absolute)]
    mode: ModeArg,

    /// Relative-mode pointer sensitivity multiplier
    #[arg(long, default_value_t = 1.0)]
    sensitivity: f32,

    /// Two-finger scroll sensitivity multiplier
    #[arg(long, default_value_t = 0.3)]
    scroll_sensitivity: f32,

    /// Scroll shuttle preset
    #[arg(long, value_enum, default_value_t = PresetArg::Normal)]
    scroll_preset: PresetArg,

    /// Compensate hosts with aggressive scroll deceleration
    #[arg(long)]
    scroll_compensation: bool,

    /// Remote source resolution, WxH
    #[arg(long, default_value = "1920x1080")]
    remote_size: String,

    /// Read touches from an evdev touchscreen instead of window events
    /// (Linux kiosk mode)
    #[arg(long)]
    device: Option<PathBuf>,

    /// List autodetected touchscreens and exit (Linux)
    #[arg(long)]
    list_devices: bool,

    /// Start fullscreen
    #[arg(long)]
    fullscreen: bool,

    /// Enable verbose event logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Absolute,
    Relative,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Fine,
    Normal,
    Fast,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if cli.list_devices {
        list_devices();
        return;
    }

    let source = match parse_size(&cli.remote_size) {
        Some(size) => size,
        None => {
            log::error!("invalid --remote-size {:?}, expected WxH", cli.remote_size);
            std::process::exit(1);
        }
    };

    let channel = match &cli.host {
        Some(host) => match ControlChannel::connect(host) {
            Ok(ch) => {
                log::info!("connected to {}", host);
                ch
            }
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("no host given, running offline");
            ControlChannel::disconnected()
        }
    };

    let touch_rx = cli.device.as_ref().map(|path| {
        log::info!("reading touches from {}", path.display());
        spawn_input_thread(path.clone())
    });

    let config = AppConfig {
        mode: match cli.mode {
            ModeArg::Absolute => PointerMode::Absolute,
            ModeArg::Relative => PointerMode::Relative,
        },
        source,
        sensitivity: cli.sensitivity,
        scroll_sensitivity: cli.scroll_sensitivity,
        preset: match cli.scroll_preset {
            PresetArg::Fine => ScrollPreset::Fine,
            PresetArg::Normal => ScrollPreset::Normal,
            PresetArg::Fast => ScrollPreset::Fast,
        },
        compensation: cli.scroll_compensation,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 640.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("tapkvm")
            .with_fullscreen(cli.fullscreen),
        ..Default::default()
    };

    eframe::run_native(
        "tapkvm",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(TapkvmApp::new(
                touch_rx,
                WireSink::new(channel),
                config,
            )))
        }),
    )
    .expect("Failed to run eframe");
}

fn parse_size(s: &str) -> Option<egui::Vec2> {
    let (w, h) = s.split_once('x')?;
    let w: f32 = w.trim().parse().ok()?;
    let h: f32 = h.trim().parse().ok()?;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(egui::vec2(w, h))
}

#[cfg(target_os = "linux")]
fn list_devices() {
    use tapkvm::discovery::{udev_discovery::UdevDiscovery, DeviceDiscovery};

    match UdevDiscovery::find_touchscreens() {
        Ok(devices) => {
            for device in devices {
                println!("{}", device.devnode.display());
            }
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn list_devices() {
    log::error!("device discovery is only supported on Linux");
    std::process::exit(1);
}

#[cfg(target_os = "linux")]
fn spawn_input_thread(path: PathBuf) -> std::sync::mpsc::Receiver<tapkvm::input::TouchFrame> {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use tapkvm::input::{evdev_backend::EvdevBackend, InputBackend};

    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut backend = match EvdevBackend::open(&path) {
            Ok(b) => b,
            Err(e) => {
                log::error!("failed to open device: {}", e);
                return;
            }
        };
        // Keep the compositor from also acting on the kiosk touchscreen.
        if let Err(e) = backend.grab() {
            log::warn!("grab failed, continuing ungrabbed: {}", e);
        }

        loop {
            match backend.poll_events() {
                Ok(Some(frame)) => {
                    if tx.send(frame).is_err() {
                        // Receiver dropped, UI closed
                        break;
                    }
                }
                Ok(None) => {
                    // No events available, sleep briefly
                    thread::sleep(Duration::from_millis(5));
                }
                Err(e) => {
                    log::error!("input error: {}", e);
                    break;
                }
            }
        }
    });

    rx
}

#[cfg(not(target_os = "linux"))]
fn spawn_input_thread(_path: PathBuf) -> std::sync::mpsc::Receiver<tapkvm::input::TouchFrame> {
    log::error!("--device is only supported on Linux");
    std::process::exit(1);
}
