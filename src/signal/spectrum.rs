use rustfft::{num_complex::Complex64, FftPlanner};
/// Clinical EEG bands, `[low, high)` in Hz.
pub const BANDS: [(&str, f64, f64); 4] = [
    ("Delta", 0.5, 4.0),
    ("Theta", 4.0, 8.0),
    ("Alpha", 8.0, 13.0),
    ("Beta", 13.0, 30.0),
];
/// Absolute power per band for one window of one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandPowers {
    pub delta: f64,
    pub theta: f64,
    pub alpha: f64,
    pub beta: f64,
}
impl BandPowers {
    pub fn as_array(&self) -> [f64; 4] {
        [self.delta, self.theta, self.alpha, self.beta]
    }
    pub fn dominant(&self) -> Option<&'static str> {
        let values = self.as_array();
        let (idx, max) = values
            .iter()
            .enumerate()
            .fold((0, 0.0f64), |acc, (i, v)| if *v > acc.1 { (i, *v) } else { acc });
        if max > 0.0 {
            Some(BANDS[idx].0)
        } else {
            None
        }
    }
}
/// Band powers of `samples` (sampled at `sample_rate_hz`). The mean is removed
/// first; windows shorter than 2 samples give all-zero powers.
pub fn band_powers(samples: &[f64], sample_rate_hz: f64) -> BandPowers {
    let n = samples.len();
    if n < 2 || sample_rate_hz <= 0.0 {
        return BandPowers::default();
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    let mut buffer: Vec<Complex64> = samples
        .iter()
        .map(|v| Complex64::new(v - mean, 0.0))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);
    let resolution = sample_rate_hz / n as f64;
    let mut totals = [0.0f64; 4];
    for (k, bin) in buffer.iter().take(n / 2 + 1).enumerate() {
        let freq = k as f64 * resolution;
        let power = bin.norm_sqr() / (n as f64 * n as f64);
        for (slot, (_, low, high)) in totals.iter_mut().zip(BANDS.iter()) {
            if freq >= *low && freq < *high {
                *slot += power;
            }
        }
    }
    BandPowers {
        delta: totals[0],
        theta: totals[1],
        alpha: totals[2],
        beta: totals[3],
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    fn tone(freq_hz: f64, sample_rate_hz: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate_hz).sin())
            .collect()
    }
    #[test]
    fn ten_hz_tone_lands_in_alpha() {
        let powers = band_powers(&tone(10.0, 100.0, 200), 100.0);
        assert_eq!(powers.dominant(), Some("Alpha"));
        assert!(powers.alpha > 100.0 * powers.delta.max(powers.beta));
    }
    #[test]
    fn two_hz_tone_lands_in_delta() {
        let powers = band_powers(&tone(2.0, 250.0, 500), 250.0);
        assert_eq!(powers.dominant(), Some("Delta"));
    }
    #[test]
    fn flat_and_tiny_windows_have_no_power() {
        assert_eq!(band_powers(&[5.0; 64], 100.0).dominant(), None);
        assert_eq!(band_powers(&[1.0], 100.0), BandPowers::default());
        assert_eq!(band_powers(&[], 100.0), BandPowers::default());
    }
}
