use thiserror::Error;
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("signal data request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sample rate must be a positive finite number, got {0}")]
    InvalidSampleRate(f64),
    #[error("recording has no channels and no sample rows")]
    EmptyRecording,
    #[error("fetch worker stopped before delivering a result")]
    FetchAborted,
    #[error("failed to render snapshot: {0}")]
    Plot(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ViewerError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ViewerError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ViewerError {
    fn from(value: image::ImageError) -> Self {
        ViewerError::Plot(value.to_string())
    }
}
