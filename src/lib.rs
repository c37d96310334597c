// src/lib.rs
//! Multi-channel EEG signal viewer: stacked lanes scrolling in real time over
//! either a fetched analysis record or a synthetic stand-in signal.
pub mod config;
pub mod signal;
pub mod types;
pub mod viewer;
pub use config::ViewerConfig;
pub use signal::ViewerError;
pub use types::ViewerCommand;
pub use viewer::SignalViewer;
