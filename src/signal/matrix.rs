use serde::{Deserialize, Serialize};
use crate::signal::ViewerError;
/// Body of `GET /analysis/records/{id}/signal_data/`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SignalPayload {
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<f64>>, // channels x samples, raw physiological units
    pub sfreq: f64,
}
/// Read-only sample matrix for one analysis record.
///
/// Rows may have unequal (or zero) length; nothing here assumes a rectangular
/// matrix. Labels and rows are reconciled so that `labels().len()` covers every
/// row, naming unlabelled rows `Ch{n}`.
#[derive(Clone, Debug)]
pub struct SampleMatrix {
    sample_rate_hz: f64,
    channel_labels: Vec<String>,
    samples: Vec<Vec<f64>>,
}
impl SampleMatrix {
    pub fn from_payload(payload: SignalPayload) -> Result<Self, ViewerError> {
        if !payload.sfreq.is_finite() || payload.sfreq <= 0.0 {
            return Err(ViewerError::InvalidSampleRate(payload.sfreq));
        }
        if payload.channels.is_empty() && payload.data.is_empty() {
            return Err(ViewerError::EmptyRecording);
        }
        let mut channel_labels = payload.channels;
        if channel_labels.len() != payload.data.len() {
            log::warn!(
                "channel count mismatch: {} labels, {} sample rows",
                channel_labels.len(),
                payload.data.len()
            );
        }
        while channel_labels.len() < payload.data.len() {
            channel_labels.push(format!("Ch{}", channel_labels.len() + 1));
        }
        Ok(Self {
            sample_rate_hz: payload.sfreq,
            channel_labels,
            samples: payload.data,
        })
    }
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
    pub fn channel_labels(&self) -> &[String] {
        &self.channel_labels
    }
    /// Samples for `channel`, or `None` when the record has a label but no row.
    pub fn channel(&self, channel: usize) -> Option<&[f64]> {
        self.samples.get(channel).map(|c| c.as_slice())
    }
    pub fn longest_duration_seconds(&self) -> f64 {
        self.samples
            .iter()
            .map(|c| c.len())
            .max()
            .map(|len| len as f64 / self.sample_rate_hz)
            .unwrap_or(0.0)
    }
}
