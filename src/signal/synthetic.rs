use std::f64::consts::PI;
/// Conventional 10-20 montage used whenever the record has no channel metadata.
pub const DEFAULT_MONTAGE: [&str; 15] = [
    "Fp1", "Fp2", "F7", "F3", "Fz", "F4", "F8", "C3", "Cz", "C4", "P3", "Pz", "P4", "O1", "O2",
];
/// Radians of phase added per channel so neighbouring lanes never line up.
pub const CHANNEL_PHASE_STEP: f64 = 13.5;
/// Default montage labels, truncated to what the renderer can lay out.
pub fn default_labels(max_lanes: usize) -> Vec<String> {
    DEFAULT_MONTAGE
        .iter()
        .take(max_lanes)
        .map(|s| s.to_string())
        .collect()
}
/// Deterministic EEG-looking waveform, in display units (pixels at scale 1).
///
/// Pure function of `(channel, t)`: an alpha-band component, a slow drift and a
/// small high-frequency ripple, with a spike multiplier where a slow envelope
/// crosses 0.9. No randomness, so redrawing the same offset is pixel-stable.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticWave {
    pub alpha_hz: f64,
    pub alpha_amplitude: f64,
    pub slow_hz: f64,
    pub slow_amplitude: f64,
    pub ripple_rad_per_sec: f64,
    pub ripple_amplitude: f64,
    pub spike_gain: f64,
}
impl Default for SyntheticWave {
    fn default() -> Self {
        Self {
            alpha_hz: 10.0,
            alpha_amplitude: 10.0,
            slow_hz: 1.0,
            slow_amplitude: 20.0,
            ripple_rad_per_sec: 50.0,
            ripple_amplitude: 2.0,
            spike_gain: 3.0,
        }
    }
}
impl SyntheticWave {
    pub fn value(&self, channel: usize, t: f64) -> f64 {
        let phase = channel as f64 * CHANNEL_PHASE_STEP;
        let alpha = (2.0 * PI * self.alpha_hz * t + phase).sin() * self.alpha_amplitude;
        let slow = (2.0 * PI * self.slow_hz * t + phase).sin() * self.slow_amplitude;
        let ripple = (self.ripple_rad_per_sec * t + phase).sin() * self.ripple_amplitude;
        let spike = if (t + phase).sin() > 0.9 {
            self.spike_gain
        } else {
            1.0
        };
        (alpha + slow + ripple) * spike
    }
    /// Largest magnitude `value` can return.
    pub fn peak(&self) -> f64 {
        (self.alpha_amplitude + self.slow_amplitude + self.ripple_amplitude) * self.spike_gain
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn same_inputs_give_same_value() {
        let wave = SyntheticWave::default();
        for i in 0..200 {
            let t = i as f64 * 0.013;
            assert_eq!(wave.value(3, t), wave.value(3, t));
        }
    }
    #[test]
    fn channels_differ_and_stay_bounded() {
        let wave = SyntheticWave::default();
        let a: Vec<f64> = (0..100).map(|i| wave.value(0, i as f64 * 0.01)).collect();
        let b: Vec<f64> = (0..100).map(|i| wave.value(1, i as f64 * 0.01)).collect();
        assert_ne!(a, b);
        assert!(a.iter().chain(&b).all(|v| v.abs() <= wave.peak()));
    }
    #[test]
    fn default_labels_are_capped() {
        assert_eq!(default_labels(16).len(), 15);
        assert_eq!(default_labels(4), ["Fp1", "Fp2", "F7", "F3"]);
        assert!(default_labels(0).is_empty());
    }
}
