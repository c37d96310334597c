// src/viewer/mod.rs
// Signal Viewer: playback clock + resident signal + renderer, driven by a frame scheduler.
pub mod clock;
pub mod layout;
pub mod render;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod surface;
use std::sync::Arc;
use std::time::Duration;
use crate::config::ViewerConfig;
use crate::signal::{
    band_powers, BandPowers, FetchTask, SampleMatrix, SignalFetcher, SignalSource,
    SyntheticSource, ViewerError,
};
use crate::types::ViewerCommand;
pub use clock::PlaybackClock;
pub use layout::{effective_size, LaneLayout};
pub use render::{draw_frame, FrameStats, LaneStats, RenderSettings};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use snapshot::{render_snapshot_png, PngSurface};
pub use state::{quantize_speed, ViewState};
pub use surface::{DrawOp, Palette, PixelPoint, PixelRect, PixelSurface, RecordingSurface, Rgb};
/// One mounted viewer instance. Owns its view state, the resident signal and
/// at most one outstanding fetch; nothing here is shared with other viewers.
pub struct SignalViewer<S: FrameScheduler> {
    config: ViewerConfig,
    settings: RenderSettings,
    state: ViewState,
    clock: PlaybackClock,
    scheduler: S,
    fetcher: Option<Arc<dyn SignalFetcher>>,
    record_id: Option<String>,
    resident: Box<dyn SignalSource>,
    fetch: Option<FetchTask>,
    size: (f32, f32),
    last_stats: FrameStats,
    mounted: bool,
}
impl<S: FrameScheduler> SignalViewer<S> {
    /// Creates the viewer in its default state (offset 0, scale 1, speed 1,
    /// paused) and starts fetching `record_id` if one is given. Without an id
    /// the viewer stays in synthetic demo mode.
    pub fn mount(
        config: ViewerConfig,
        scheduler: S,
        fetcher: Option<Arc<dyn SignalFetcher>>,
        record_id: Option<String>,
    ) -> Self {
        let settings = RenderSettings::from_config(&config);
        let resident = Box::new(SyntheticSource::new(config.max_lanes, config.synthetic_sfreq));
        let size = (config.default_width, config.default_height);
        let mut viewer = Self {
            config,
            settings,
            state: ViewState::default(),
            clock: PlaybackClock::new(),
            scheduler,
            fetcher,
            record_id: None,
            resident,
            fetch: None,
            size,
            last_stats: FrameStats::default(),
            mounted: true,
        };
        log::info!("viewer mounted");
        viewer.start_record(record_id);
        viewer
    }
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
    pub fn state(&self) -> &ViewState {
        &self.state
    }
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
    pub fn source(&self) -> &dyn SignalSource {
        self.resident.as_ref()
    }
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }
    pub fn is_fetching(&self) -> bool {
        self.fetch.is_some()
    }
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
    pub fn surface_size(&self) -> (f32, f32) {
        self.size
    }
    pub fn last_stats(&self) -> &FrameStats {
        &self.last_stats
    }
    pub fn apply(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::TogglePlay => self.toggle_play(),
            ViewerCommand::Play => {
                if !self.state.is_playing {
                    self.toggle_play();
                }
            }
            ViewerCommand::Pause => {
                if self.state.is_playing {
                    self.toggle_play();
                }
            }
            ViewerCommand::SetSpeed(speed) => self.set_speed(speed),
            ViewerCommand::ZoomIn => self.zoom_in(),
            ViewerCommand::ZoomOut => self.zoom_out(),
            ViewerCommand::Seek(offset) => self.seek(offset),
            ViewerCommand::LoadRecord(record_id) => self.load_record(record_id),
        }
    }
    pub fn toggle_play(&mut self) {
        let playing = self.state.toggle_play();
        if playing {
            self.clock.reset();
        }
        log::debug!(
            "{} at {:.3}s",
            if playing { "play" } else { "pause" },
            self.state.offset
        );
        self.request_redraw();
    }
    pub fn set_speed(&mut self, speed: f64) {
        self.state.set_speed(speed);
        self.request_redraw();
    }
    pub fn zoom_in(&mut self) {
        self.state.zoom_in(self.config.zoom_step);
        self.request_redraw();
    }
    pub fn zoom_out(&mut self) {
        self.state.zoom_out(self.config.zoom_step, self.config.min_scale);
        self.request_redraw();
    }
    pub fn seek(&mut self, offset: f64) {
        self.state.set_offset(offset);
        self.request_redraw();
    }
    /// Host changed the analysis-record handle. The same id is a no-op unless
    /// the previous attempt ended in the synthetic fallback.
    pub fn load_record(&mut self, record_id: Option<String>) {
        if !self.mounted {
            return;
        }
        let unchanged = self.record_id == record_id;
        if unchanged && (self.fetch.is_some() || self.resident.is_recorded() || record_id.is_none())
        {
            return;
        }
        self.start_record(record_id);
    }
    fn start_record(&mut self, record_id: Option<String>) {
        if let Some(task) = self.fetch.take() {
            log::debug!("record {}: superseded, cancelling fetch", task.record_id());
            task.cancel();
        }
        self.resident = Box::new(SyntheticSource::new(
            self.config.max_lanes,
            self.config.synthetic_sfreq,
        ));
        self.record_id = record_id.clone();
        match (record_id, &self.fetcher) {
            (Some(id), Some(fetcher)) => {
                self.fetch = Some(FetchTask::spawn(Arc::clone(fetcher), id));
            }
            (Some(id), None) => {
                log::warn!("record {id}: no signal backend configured, showing synthetic signal");
            }
            (None, _) => log::info!("demo mode: synthetic signal"),
        }
        self.request_redraw();
    }
    /// Applies a finished fetch, if any. Never blocks.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(task) = &self.fetch else {
            return false;
        };
        let Some(result) = task.poll() else {
            return false;
        };
        let record_id = task.record_id().to_owned();
        self.fetch = None;
        self.apply_fetch_result(&record_id, result);
        true
    }
    /// Blocks up to `timeout` for the outstanding fetch. Headless hosts only;
    /// the frame loop uses `poll_fetch`.
    pub fn wait_for_fetch(&mut self, timeout: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        let Some(task) = &self.fetch else {
            return false;
        };
        let Some(result) = task.wait(timeout) else {
            return false;
        };
        let record_id = task.record_id().to_owned();
        self.fetch = None;
        self.apply_fetch_result(&record_id, result);
        true
    }
    fn apply_fetch_result(&mut self, record_id: &str, result: Result<SampleMatrix, ViewerError>) {
        match result {
            Ok(matrix) => {
                log::info!(
                    "record {record_id}: {} channels at {} Hz, {:.1}s",
                    matrix.channel_labels().len(),
                    matrix.sample_rate_hz(),
                    matrix.longest_duration_seconds()
                );
                self.resident = Box::new(matrix);
            }
            Err(err) => {
                log::warn!("record {record_id}: {err}; falling back to synthetic signal");
            }
        }
        self.request_redraw();
    }
    /// Resynchronises to the host's layout box. Unmeasured dimensions fall
    /// back to the configured default. Offset and scale are left alone.
    pub fn resize(&mut self, width: f32, height: f32) {
        let size = effective_size(
            (width, height),
            (self.config.default_width, self.config.default_height),
        );
        if size != self.size {
            log::debug!("surface resized to {}x{}", size.0, size.1);
            self.size = size;
            self.request_redraw();
        }
    }
    /// One scheduled frame: pick up fetched data, sync the surface size,
    /// advance the clock and paint. Returns whether another frame is wanted.
    pub fn frame(&mut self, now: f64, surface: &mut dyn PixelSurface) -> bool {
        if !self.mounted {
            return false;
        }
        self.poll_fetch();
        let (width, height) = surface.measure();
        self.resize(width, height);
        self.clock.tick(now, &mut self.state);
        self.last_stats = draw_frame(
            surface,
            self.size,
            &self.state,
            self.resident.as_ref(),
            &self.settings,
        );
        if self.state.is_playing {
            self.scheduler.start();
            true
        } else {
            self.scheduler.stop();
            false
        }
    }
    /// Band powers of the visible window of `lane`.
    pub fn band_powers(&self, lane: usize) -> Option<BandPowers> {
        let layout = LaneLayout::new(
            self.size,
            self.resident.channel_labels().len(),
            self.settings.max_lanes,
            self.settings.gutter_width_px,
        );
        if lane >= layout.lane_count {
            return None;
        }
        let samples = render::window_samples(
            self.resident.as_ref(),
            &self.settings.wave,
            lane,
            self.state.offset,
            layout.trace_width() as usize,
        );
        Some(band_powers(&samples, self.resident.sample_rate_hz()))
    }
    pub fn snapshot_png(&self, width: u32, height: u32) -> Result<Vec<u8>, ViewerError> {
        render_snapshot_png(
            &self.state,
            self.resident.as_ref(),
            &self.settings,
            width,
            height,
        )
    }
    /// Cancels the pending frame and any outstanding fetch. After this the
    /// viewer neither draws nor applies late fetch results.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.scheduler.stop();
        if let Some(task) = self.fetch.take() {
            log::debug!("record {}: viewer closed, discarding fetch", task.record_id());
            task.cancel();
        }
        log::info!("viewer unmounted");
    }
    fn request_redraw(&mut self) {
        if self.mounted {
            self.scheduler.start();
        }
    }
}
impl SignalViewer<ManualScheduler> {
    /// Runs the next scheduled frame, if there is one.
    pub fn pump(&mut self, surface: &mut dyn PixelSurface) -> bool {
        let Some(now) = self.scheduler.next_frame() else {
            return false;
        };
        self.frame(now, surface);
        true
    }
    /// Pumps frames until `seconds` of scheduler time have passed or no frame
    /// is pending. Returns the number of frames drawn.
    pub fn run_for(&mut self, seconds: f64, surface: &mut dyn PixelSurface) -> usize {
        let until = self.scheduler.now() + seconds;
        let mut frames = 0;
        while self.scheduler.now() < until && self.pump(surface) {
            frames += 1;
        }
        frames
    }
}
impl<S: FrameScheduler> Drop for SignalViewer<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::fetch::testing::{two_channel_payload, GatedFetcher};
    use crate::signal::SignalPayload;
    use std::f64::consts::PI;
    const WAIT: Duration = Duration::from_secs(5);
    fn readout(surface: &RecordingSurface) -> Option<String> {
        surface.ops().iter().rev().find_map(|op| match op {
            DrawOp::Text(_, text, _) if text.starts_with("Time:") => Some(text.clone()),
            _ => None,
        })
    }
    fn demo_viewer() -> SignalViewer<ManualScheduler> {
        SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            None,
            None,
        )
    }
    #[test]
    fn demo_mode_plays_and_pauses() {
        let mut viewer = demo_viewer();
        let mut surface = RecordingSurface::new(848.0, 600.0);
        assert!(viewer.pump(&mut surface));
        let stats = viewer.last_stats();
        assert_eq!(stats.lanes.len(), 15);
        assert!(stats.lanes.iter().all(|l| l.synthetic && l.points > 0));
        // Paused: nothing further is scheduled.
        assert!(!viewer.pump(&mut surface));
        assert_eq!(viewer.state().offset, 0.0);
        viewer.apply(ViewerCommand::TogglePlay);
        let frames = viewer.run_for(1.0, &mut surface);
        assert!(frames >= 59);
        let played = viewer.state().offset;
        assert!(played > 0.9 && played < 1.1);
        viewer.apply(ViewerCommand::Pause);
        surface.take_ops();
        assert!(viewer.pump(&mut surface));
        assert_eq!(viewer.state().offset, played);
        assert_eq!(readout(&surface), Some(format!("Time: {played:.2}s")));
        assert!(!viewer.pump(&mut surface));
        assert_eq!(viewer.state().offset, played);
    }
    #[test]
    fn speed_scales_playback() {
        let mut viewer = demo_viewer();
        let mut surface = RecordingSurface::new(848.0, 600.0);
        viewer.apply(ViewerCommand::SetSpeed(2.5));
        viewer.apply(ViewerCommand::Play);
        viewer.run_for(2.0, &mut surface);
        // First frame after play only captures the baseline.
        let expected = 2.5 * (viewer.scheduler().now() - 1.0 / 60.0);
        assert!((viewer.state().offset - expected).abs() < 0.05);
    }
    #[test]
    fn zoom_and_seek_redraw_while_paused() {
        let mut viewer = demo_viewer();
        let mut surface = RecordingSurface::new(848.0, 600.0);
        viewer.pump(&mut surface);
        for _ in 0..100 {
            viewer.apply(ViewerCommand::ZoomOut);
        }
        assert!((viewer.state().scale - 0.1).abs() < 1e-9);
        viewer.apply(ViewerCommand::ZoomIn);
        assert!((viewer.state().scale - 0.2).abs() < 1e-9);
        viewer.apply(ViewerCommand::Seek(-4.0));
        assert!(viewer.scheduler().is_scheduled());
        surface.take_ops();
        assert!(viewer.pump(&mut surface));
        assert_eq!(readout(&surface).as_deref(), Some("Time: -4.00s"));
    }
    #[test]
    fn real_data_arrives_after_play_started() {
        let (fetcher, gate) = GatedFetcher::new();
        let mut viewer = SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            Some(fetcher),
            Some("17".to_owned()),
        );
        let mut surface = RecordingSurface::new(848.0, 600.0);
        viewer.apply(ViewerCommand::Play);
        assert!(viewer.run_for(0.2, &mut surface) >= 11);
        assert!(viewer.is_fetching());
        assert_eq!(viewer.last_stats().lanes.len(), 15);
        gate.send(Ok(two_channel_payload(200, 100.0))).unwrap();
        assert!(viewer.wait_for_fetch(WAIT));
        assert!(viewer.source().is_recorded());
        let before = viewer.state().offset;
        assert!(viewer.pump(&mut surface));
        assert!(viewer.state().offset >= before);
        let lanes = &viewer.last_stats().lanes;
        assert_eq!(lanes.len(), 2);
        assert!(lanes.iter().all(|l| !l.synthetic && l.points > 0));
        assert!(viewer.scheduler().is_scheduled());
    }
    #[test]
    fn teardown_during_fetch_stops_everything() {
        let (fetcher, gate) = GatedFetcher::new();
        let mut viewer = SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            Some(fetcher),
            Some("5".to_owned()),
        );
        let mut surface = RecordingSurface::new(848.0, 600.0);
        viewer.apply(ViewerCommand::Play);
        viewer.run_for(0.1, &mut surface);
        viewer.unmount();
        assert!(!viewer.is_mounted());
        assert!(!viewer.is_fetching());
        assert!(!viewer.scheduler().is_scheduled());
        gate.send(Ok(two_channel_payload(200, 100.0))).unwrap();
        assert!(!viewer.wait_for_fetch(Duration::from_millis(200)));
        surface.take_ops();
        let offset = viewer.state().offset;
        assert!(!viewer.pump(&mut surface));
        assert!(!viewer.frame(99.0, &mut surface));
        viewer.apply(ViewerCommand::ZoomIn);
        viewer.apply(ViewerCommand::LoadRecord(Some("6".into())));
        assert!(surface.ops().is_empty());
        assert!(!viewer.scheduler().is_scheduled());
        assert!(!viewer.source().is_recorded());
        assert_eq!(viewer.state().offset, offset);
    }
    #[test]
    fn fetch_failure_degrades_to_synthetic() {
        let (fetcher, gate) = GatedFetcher::new();
        let mut viewer = SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            Some(fetcher),
            Some("404".to_owned()),
        );
        gate.send(Err(ViewerError::FetchAborted)).unwrap();
        assert!(viewer.wait_for_fetch(WAIT));
        assert!(!viewer.is_fetching());
        assert_eq!(viewer.record_id(), Some("404"));
        let mut surface = RecordingSurface::new(848.0, 600.0);
        assert!(viewer.pump(&mut surface));
        assert_eq!(viewer.last_stats().lanes.len(), 15);
        assert!(viewer.last_stats().lanes.iter().all(|l| l.synthetic));
    }
    #[test]
    fn changing_record_discards_resident_data() {
        let (fetcher, gate) = GatedFetcher::new();
        let mut viewer = SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            Some(fetcher),
            Some("a".to_owned()),
        );
        gate.send(Ok(two_channel_payload(50, 100.0))).unwrap();
        assert!(viewer.wait_for_fetch(WAIT));
        assert!(viewer.source().is_recorded());
        viewer.apply(ViewerCommand::LoadRecord(Some("a".into())));
        assert!(viewer.source().is_recorded());
        viewer.apply(ViewerCommand::LoadRecord(Some("b".into())));
        assert!(!viewer.source().is_recorded());
        assert!(viewer.is_fetching());
        assert_eq!(viewer.record_id(), Some("b"));
        viewer.apply(ViewerCommand::LoadRecord(None));
        assert!(!viewer.is_fetching());
        assert_eq!(viewer.source().channel_labels().len(), 15);
    }
    #[test]
    fn demo_mount_can_load_a_record_later() {
        let (fetcher, gate) = GatedFetcher::new();
        let mut viewer = SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            Some(fetcher),
            None,
        );
        assert!(!viewer.is_fetching());
        assert_eq!(viewer.source().channel_labels().len(), 15);
        viewer.apply(ViewerCommand::LoadRecord(Some("42".into())));
        assert!(viewer.is_fetching());
        assert_eq!(viewer.record_id(), Some("42"));
        gate.send(Ok(two_channel_payload(200, 100.0))).unwrap();
        assert!(viewer.wait_for_fetch(WAIT));
        assert!(viewer.source().is_recorded());
    }
    #[test]
    fn mounting_with_record_but_no_backend_stays_synthetic() {
        let viewer: SignalViewer<ManualScheduler> = SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            None,
            Some("12".to_owned()),
        );
        assert!(!viewer.is_fetching());
        assert!(!viewer.source().is_recorded());
    }
    #[test]
    fn resize_keeps_time_and_scale() {
        let mut viewer = demo_viewer();
        viewer.seek(2.0);
        viewer.zoom_in();
        let mut surface = RecordingSurface::new(0.0, 0.0);
        viewer.pump(&mut surface);
        assert_eq!(viewer.surface_size(), (800.0, 800.0));
        surface.resize(1248.0, 300.0);
        viewer.resize(1248.0, 300.0);
        assert!(viewer.pump(&mut surface));
        assert_eq!(viewer.surface_size(), (1248.0, 300.0));
        let layout = viewer.last_stats().layout.unwrap();
        assert_eq!(layout.trace_width(), 1200.0);
        assert_eq!(layout.lane_height, 20.0);
        assert_eq!(viewer.last_stats().lanes[0].points, 600);
        assert_eq!(viewer.state().offset, 2.0);
        assert!((viewer.state().scale - 1.1).abs() < 1e-9);
    }
    #[test]
    fn band_powers_follow_visible_window() {
        let (fetcher, gate) = GatedFetcher::new();
        let mut viewer = SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            Some(fetcher),
            Some("alpha".to_owned()),
        );
        let tone: Vec<f64> = (0..2000)
            .map(|i| (2.0 * PI * 10.0 * i as f64 / 100.0).sin() * 4e-5)
            .collect();
        gate.send(Ok(SignalPayload {
            channels: vec!["O1".into()],
            data: vec![tone],
            sfreq: 100.0,
        }))
        .unwrap();
        assert!(viewer.wait_for_fetch(WAIT));
        let mut surface = RecordingSurface::new(848.0, 600.0);
        viewer.pump(&mut surface);
        let powers = viewer.band_powers(0).unwrap();
        assert_eq!(powers.dominant(), Some("Alpha"));
        assert!(viewer.band_powers(1).is_none());
    }
    #[test]
    fn snapshot_uses_current_view() {
        let viewer = demo_viewer();
        let png = viewer.snapshot_png(200, 120).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
        assert!(viewer.snapshot_png(0, 0).is_err());
    }
    #[test]
    fn dropping_viewer_cancels_fetch() {
        let (fetcher, gate) = GatedFetcher::new();
        let viewer = SignalViewer::mount(
            ViewerConfig::default(),
            ManualScheduler::with_frame_rate(60.0),
            Some(fetcher),
            Some("x".to_owned()),
        );
        drop(viewer);
        // Worker must still finish cleanly with nobody listening.
        gate.send(Ok(two_channel_payload(10, 100.0))).unwrap();
    }
}
