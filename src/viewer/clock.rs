use super::state::ViewState;
/// Turns wall-clock frame timestamps (seconds) into playback offset.
///
/// The first tick after construction, `reset`, or any paused tick only
/// captures a baseline. Pausing therefore never banks time that would make
/// the trace jump on resume.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaybackClock {
    last_timestamp: Option<f64>,
}
impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn tick(&mut self, now: f64, state: &mut ViewState) -> f64 {
        if !state.is_playing {
            self.last_timestamp = None;
            return state.offset;
        }
        if let Some(last) = self.last_timestamp {
            // Hosts occasionally report a timestamp from before the previous frame.
            let delta = (now - last).max(0.0);
            state.offset += delta * state.speed;
        }
        self.last_timestamp = Some(now);
        state.offset
    }
    pub fn reset(&mut self) {
        self.last_timestamp = None;
    }
    pub fn has_baseline(&self) -> bool {
        self.last_timestamp.is_some()
    }
}
