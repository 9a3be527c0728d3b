use anyhow::Result;
use clap::{Parser, Subcommand};
use rollcall_core::{
    AttendanceMode, AttendanceSink, AttendanceToggle, CameraPort, CameraReleaseSignal,
    ModalState, PhotoUploader,
};
use rollcall_hw::{list_devices, CameraSession, PreviewSink, RgbFrame};
use rollcall_net::{ApiClient, AttendanceReporter, CookieJar, ReleaseClient, UploadClient};
use rollcall_store::SqlitePrefs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;
mod session;
mod validate;

use config::Config;
use session::{CaptureSession, View};
use validate::{validate, Needs};

#[derive(Parser)]
#[command(name = "rollcall", about = "Biometric attendance capture client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the capture modal for a student and drive it interactively
    Capture {
        /// Learner reference number (the photo filename stem)
        #[arg(short, long)]
        lrn: String,
    },
    /// Enable or disable face-recognition attendance
    Toggle {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
    /// Report a single attendance event for a student
    Attendance {
        #[arg(short, long)]
        lrn: String,
        /// time-in or time-out; defaults to the toggle's selected mode
        #[arg(short, long)]
        mode: Option<AttendanceMode>,
    },
    /// List available capture devices
    Devices,
    /// Show configuration and the persisted preference state
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Capture { lrn } => run_capture(&config, &lrn).await,
        Commands::Toggle { state } => run_toggle(&config, state == "on"),
        Commands::Attendance { lrn, mode } => run_attendance(&config, &lrn, mode).await,
        Commands::Devices => {
            run_devices();
            Ok(())
        }
        Commands::Status => run_status(&config),
    }
}

/// Preview sink for a headless terminal: notes that frames are flowing
/// instead of rendering them.
#[derive(Default)]
struct LogPreview {
    frames: AtomicU64,
}

impl PreviewSink for LogPreview {
    fn present(&self, frame: &RgbFrame) {
        let n = self.frames.fetch_add(1, Ordering::Relaxed);
        if n % 120 == 0 {
            tracing::debug!(
                width = frame.width,
                height = frame.height,
                frames = n + 1,
                "preview alive"
            );
        }
    }
}

async fn run_capture(config: &Config, lrn: &str) -> Result<()> {
    validate(
        config,
        Needs {
            mutating: true,
            camera: true,
        },
    )?;

    let api = ApiClient::new(
        &config.base_url,
        CookieJar::parse(&config.cookie),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let uploader = UploadClient::new(api.clone());
    let release_signal = ReleaseClient::new(api);
    let camera = CameraSession::new(&config.camera_device, Arc::new(LogPreview::default()));

    let mut session = CaptureSession::new(lrn, camera, uploader, release_signal);
    session.open().await;
    if let Some(notice) = session.take_notice() {
        eprintln!("{notice}");
    }
    describe(&session);

    println!("commands: c=capture  r=recapture  s=save  q=close  o=outside-click");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while session.state() != ModalState::Closed {
        let Some(line) = lines.next_line().await? else {
            // Terminal gone mid-session: same cleanup as navigating away.
            session.page_hide().await;
            break;
        };
        match line.trim() {
            "c" | "capture" => session.capture().await,
            "r" | "recapture" => session.recapture().await,
            "s" | "save" => session.save().await,
            "q" | "close" => session.close().await,
            "o" | "outside" => session.outside_click().await,
            "" => continue,
            other => {
                println!("unknown command: {other}");
                continue;
            }
        }
        if let Some(notice) = session.take_notice() {
            eprintln!("{notice}");
        }
        describe(&session);
    }

    if let Some(preview) = session.preview_ref() {
        println!("photo saved; preview now at {preview}");
    }
    Ok(())
}

fn describe<C, U, R>(session: &CaptureSession<C, U, R>)
where
    C: CameraPort,
    U: PhotoUploader,
    R: CameraReleaseSignal,
{
    match session.view() {
        View::Hidden => println!("[modal closed]"),
        View::Opening => println!("[modal open, no live feed]"),
        View::Live => println!("[live feed running; c=capture]"),
        View::Still { .. } => println!("[still frozen; s=save, r=recapture]"),
    }
}

fn run_toggle(config: &Config, enabled: bool) -> Result<()> {
    let store = SqlitePrefs::open(&config.db_path)?;
    let mut toggle = AttendanceToggle::hydrate(store)?;
    toggle.apply(enabled)?;
    if enabled {
        println!(
            "face recognition enabled; default mode: {}",
            AttendanceMode::TimeIn
        );
    } else {
        println!("face recognition disabled; time-in/time-out controls off");
    }
    Ok(())
}

async fn run_attendance(
    config: &Config,
    lrn: &str,
    mode: Option<AttendanceMode>,
) -> Result<()> {
    validate(
        config,
        Needs {
            mutating: true,
            camera: false,
        },
    )?;

    let store = SqlitePrefs::open(&config.db_path)?;
    let toggle = AttendanceToggle::hydrate(store)?;
    if !toggle.enabled() {
        anyhow::bail!("face recognition is disabled; enable it with `rollcall toggle on`");
    }
    let mode = mode
        .or(toggle.selected())
        .unwrap_or(AttendanceMode::TimeIn);

    let api = ApiClient::new(
        &config.base_url,
        CookieJar::parse(&config.cookie),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let reporter = AttendanceReporter::new(api);

    // Telemetry-class call: a failure is noted, never retried.
    match reporter.report(lrn, mode).await {
        Ok(()) => println!("attendance {mode} recorded for {lrn}"),
        Err(e) => tracing::warn!(error = %e, lrn, "attendance report failed"),
    }
    Ok(())
}

fn run_devices() {
    let devices = list_devices();
    if devices.is_empty() {
        println!("no capture devices found");
        return;
    }
    for device in devices {
        println!("{}  {} ({})", device.path, device.name, device.driver);
    }
}

fn run_status(config: &Config) -> Result<()> {
    let store = SqlitePrefs::open(&config.db_path)?;
    let toggle = AttendanceToggle::hydrate(store)?;
    println!("server:           {}", config.base_url);
    println!("camera device:    {}", config.camera_device);
    println!("preference db:    {}", config.db_path.display());
    println!(
        "face recognition: {}",
        if toggle.enabled() { "enabled" } else { "disabled" }
    );
    if let Some(mode) = toggle.selected() {
        println!("attendance mode:  {mode}");
    }
    Ok(())
}
