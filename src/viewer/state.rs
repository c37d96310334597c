/// Renderer-consumed view state. Created with defaults at mount and mutated
/// only by user interaction or the frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Seconds at the left edge of the visible window. Unclamped.
    pub offset: f64,
    /// Vertical amplification, never below the configured floor.
    pub scale: f64,
    /// Multiplier applied to wall-clock deltas while playing.
    pub speed: f64,
    pub is_playing: bool,
}
impl Default for ViewState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
            speed: 1.0,
            is_playing: false,
        }
    }
}
impl ViewState {
    pub fn toggle_play(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.is_playing
    }
    /// Seek. Any finite value is honoured, including negative offsets and
    /// offsets past the end of the data.
    pub fn set_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.offset = offset;
        }
    }
    /// Any positive finite speed is accepted; anything else is ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed > 0.0 {
            self.speed = speed;
        }
    }
    pub fn zoom_in(&mut self, step: f64) {
        self.scale += step.abs();
    }
    pub fn zoom_out(&mut self, step: f64, min_scale: f64) {
        self.scale = (self.scale - step.abs()).max(min_scale);
    }
}
/// Snaps a slider value onto `[min, max]` in `step` increments.
pub fn quantize_speed(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let clamped = value.clamp(min, max);
    if step <= 0.0 {
        return clamped;
    }
    (min + ((clamped - min) / step).round() * step).clamp(min, max)
}
