// src/types.rs

/// Host → viewer commands. Buttons, sliders and keyboard shortcuts all end up
/// as one of these.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerCommand {
    TogglePlay,
    Play,
    Pause,
    SetSpeed(f64),
    ZoomIn,
    ZoomOut,
    /// Jump to an absolute offset in seconds.
    Seek(f64),
    /// Switch to another analysis record; `None` means synthetic demo mode.
    LoadRecord(Option<String>),
}
