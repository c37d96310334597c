use crate::signal::synthetic::default_labels;
use crate::signal::SampleMatrix;
/// Backend the renderer reads from on every frame.
///
/// `samples` returning `None` means "no real data for this lane"; the renderer
/// fills such lanes from the synthetic waveform instead.
pub trait SignalSource {
    fn channel_labels(&self) -> &[String];
    fn sample_rate_hz(&self) -> f64;
    fn samples(&self, channel: usize) -> Option<&[f64]>;
    fn is_recorded(&self) -> bool;
}
/// Placeholder backend used in demo mode, while a fetch is outstanding, and
/// after a fetch fails.
#[derive(Clone, Debug)]
pub struct SyntheticSource {
    channel_labels: Vec<String>,
    sample_rate_hz: f64,
}
impl SyntheticSource {
    pub fn new(max_lanes: usize, sample_rate_hz: f64) -> Self {
        Self {
            channel_labels: default_labels(max_lanes),
            sample_rate_hz,
        }
    }
}
impl SignalSource for SyntheticSource {
    fn channel_labels(&self) -> &[String] {
        &self.channel_labels
    }
    fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
    fn samples(&self, _channel: usize) -> Option<&[f64]> {
        None
    }
    fn is_recorded(&self) -> bool {
        false
    }
}
impl SignalSource for SampleMatrix {
    fn channel_labels(&self) -> &[String] {
        SampleMatrix::channel_labels(self)
    }
    fn sample_rate_hz(&self) -> f64 {
        SampleMatrix::sample_rate_hz(self)
    }
    fn samples(&self, channel: usize) -> Option<&[f64]> {
        self.channel(channel)
    }
    fn is_recorded(&self) -> bool {
        true
    }
}
