// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod gui;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use eeg_viewer::signal::{HttpFetcher, SignalFetcher};
use eeg_viewer::viewer::{ManualScheduler, RecordingSurface, SignalViewer};
use eeg_viewer::{ViewerCommand, ViewerConfig};
#[derive(Parser, Debug)]
#[command(name = "eeg-viewer", version, about = "Scrolling multi-channel EEG viewer")]
struct Args {
    /// Analysis record to display. Without one the viewer runs in demo mode.
    #[arg(short, long)]
    record: Option<String>,
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Base URL of the analysis API (overrides config and environment)
    #[arg(long)]
    api_url: Option<String>,
    /// Render one PNG frame to this path and exit instead of opening a window
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Seconds of playback before the snapshot is taken
    #[arg(long, default_value_t = 0.0)]
    play_seconds: f64,
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
}
// 无窗口模式：固定 60Hz 驱动 viewer，然后导出一张 PNG
fn run_headless(
    config: ViewerConfig,
    fetcher: Option<Arc<dyn SignalFetcher>>,
    args: &Args,
    out: &Path,
) -> Result<()> {
    let wait = config.request_timeout() + Duration::from_secs(1);
    let mut viewer = SignalViewer::mount(
        config,
        ManualScheduler::with_frame_rate(60.0),
        fetcher,
        args.record.clone(),
    );
    if viewer.is_fetching() && !viewer.wait_for_fetch(wait) {
        log::warn!("signal data did not arrive within {wait:?}, rendering synthetic signal");
    }
    let mut surface = RecordingSurface::new(args.width as f32, args.height as f32);
    viewer.pump(&mut surface);
    if args.play_seconds > 0.0 {
        viewer.apply(ViewerCommand::Play);
        let frames = viewer.run_for(args.play_seconds, &mut surface);
        viewer.apply(ViewerCommand::Pause);
        viewer.pump(&mut surface);
        log::info!(
            "played {frames} frames, offset {:.2}s",
            viewer.state().offset
        );
    }
    let png = viewer.snapshot_png(args.width, args.height)?;
    std::fs::write(out, png).with_context(|| format!("failed to write {}", out.display()))?;
    log::info!("snapshot written to {}", out.display());
    Ok(())
}
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut config = ViewerConfig::load(args.config.as_deref())?;
    if let Some(url) = &args.api_url {
        config.api_base_url = url.clone();
    }
    // 不发请求，只建 client；demo 模式下也能在界面里加载 record
    let fetcher: Arc<dyn SignalFetcher> = Arc::new(HttpFetcher::new(
        &config.api_base_url,
        config.request_timeout(),
    )?);
    let fetcher = Some(fetcher);
    if let Some(out) = &args.snapshot {
        return run_headless(config, fetcher, &args, out);
    }
    let title = match &args.record {
        Some(id) => format!("EEG Viewer - record {id}"),
        None => "EEG Viewer - demo".to_owned(),
    };
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 800.0])
        .with_min_inner_size([640.0, 400.0])
        .with_title(title);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let record = args.record.clone();
    eframe::run_native(
        "eeg-viewer",
        options,
        Box::new(move |cc| {
            Box::new(gui::EegViewerApp::new(
                &cc.egui_ctx,
                config,
                fetcher,
                record,
            ))
        }),
    )
    .map_err(|err| anyhow::anyhow!("viewer window failed: {err}"))
}
