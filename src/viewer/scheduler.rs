/// Frame-scheduling capability. The viewer calls `start` whenever it wants
/// another frame (continuous while playing, once after an interaction while
/// paused) and `stop` to drop any pending frame.
pub trait FrameScheduler {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_scheduled(&self) -> bool;
}
/// Fixed-tick scheduler for headless runs: each pending frame is handed out
/// once, `period` seconds after the previous one.
#[derive(Clone, Debug)]
pub struct ManualScheduler {
    now: f64,
    period: f64,
    pending: bool,
}
impl ManualScheduler {
    pub fn new(period: f64) -> Self {
        Self {
            now: 0.0,
            period: period.max(0.0),
            pending: false,
        }
    }
    pub fn with_frame_rate(hz: f64) -> Self {
        Self::new(if hz > 0.0 { 1.0 / hz } else { 0.0 })
    }
    pub fn now(&self) -> f64 {
        self.now
    }
    /// Consumes the pending frame and returns its timestamp.
    pub fn next_frame(&mut self) -> Option<f64> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        self.now += self.period;
        Some(self.now)
    }
}
impl FrameScheduler for ManualScheduler {
    fn start(&mut self) {
        self.pending = true;
    }
    fn stop(&mut self) {
        self.pending = false;
    }
    fn is_scheduled(&self) -> bool {
        self.pending
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn frames_are_one_shot() {
        let mut scheduler = ManualScheduler::with_frame_rate(50.0);
        assert_eq!(scheduler.next_frame(), None);
        scheduler.start();
        assert!(scheduler.is_scheduled());
        assert!((scheduler.next_frame().unwrap() - 0.02).abs() < 1e-12);
        assert_eq!(scheduler.next_frame(), None);
        scheduler.start();
        scheduler.stop();
        assert_eq!(scheduler.next_frame(), None);
    }
}
