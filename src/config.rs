use std::path::Path;
use std::time::Duration;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
pub const API_URL_ENV: &str = "EEG_VIEWER_API_URL";
/// Tunables for the viewer. Every field has a default, so a config file only
/// needs the keys it wants to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Upper bound on lanes so each trace stays legible.
    pub max_lanes: usize,
    pub grid_spacing_px: f32,
    /// Grid scroll rate. Fixed, so gridlines mark the same time span whatever
    /// the recording's sample rate.
    pub grid_px_per_sec: f32,
    pub sample_stride_px: usize,
    pub lane_margin_px: f32,
    /// Calibration multiplier from raw recorded units (volts) to pixels at
    /// scale 1. Empirical, not physically derived.
    pub display_gain: f64,
    pub gutter_width_px: f32,
    /// Surface size used until the host reports a real measurement.
    pub default_width: f32,
    pub default_height: f32,
    pub zoom_step: f64,
    pub min_scale: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub speed_step: f64,
    /// Sampling rate assumed for the synthetic backend (one sample per pixel).
    pub synthetic_sfreq: f64,
}
impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_owned(),
            request_timeout_secs: 30,
            max_lanes: 16,
            grid_spacing_px: 100.0,
            grid_px_per_sec: 100.0,
            sample_stride_px: 2,
            lane_margin_px: 2.0,
            display_gain: 100_000.0,
            gutter_width_px: 48.0,
            default_width: 800.0,
            default_height: 800.0,
            zoom_step: 0.1,
            min_scale: 0.1,
            min_speed: 0.5,
            max_speed: 5.0,
            speed_step: 0.5,
            synthetic_sfreq: 100.0,
        }
    }
}
impl ViewerConfig {
    /// Reads a JSON config file if one is given, otherwise starts from defaults.
    /// `EEG_VIEWER_API_URL` overrides the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => ViewerConfig::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        config.sanitize();
        Ok(config)
    }
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
    /// Pulls nonsensical values back into range instead of failing at runtime.
    fn sanitize(&mut self) {
        let defaults = ViewerConfig::default();
        self.max_lanes = self.max_lanes.max(1);
        self.sample_stride_px = self.sample_stride_px.max(1);
        if !(self.grid_spacing_px > 0.0) {
            self.grid_spacing_px = defaults.grid_spacing_px;
        }
        if !(self.grid_px_per_sec.is_finite() && self.grid_px_per_sec >= 0.0) {
            self.grid_px_per_sec = defaults.grid_px_per_sec;
        }
        if !(self.min_scale > 0.0) {
            self.min_scale = defaults.min_scale;
        }
        if !(self.zoom_step > 0.0) {
            self.zoom_step = defaults.zoom_step;
        }
        if !(self.min_speed > 0.0) || !(self.max_speed >= self.min_speed) {
            self.min_speed = defaults.min_speed;
            self.max_speed = defaults.max_speed;
        }
        if !(self.synthetic_sfreq > 0.0) {
            self.synthetic_sfreq = defaults.synthetic_sfreq;
        }
        if !self.display_gain.is_finite() {
            self.display_gain = defaults.display_gain;
        }
    }
}
