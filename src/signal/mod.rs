// src/signal/mod.rs
// Signal Source: resident data for the viewer, real or synthetic.
pub mod error;
pub mod fetch;
pub mod matrix;
pub mod source;
pub mod spectrum;
pub mod synthetic;
pub use error::ViewerError;
pub use fetch::{FetchTask, HttpFetcher, LivenessToken, SignalFetcher};
pub use matrix::{SampleMatrix, SignalPayload};
pub use source::{SignalSource, SyntheticSource};
pub use spectrum::{band_powers, BandPowers, BANDS};
pub use synthetic::{default_labels, SyntheticWave, DEFAULT_MONTAGE};
