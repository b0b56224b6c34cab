use thiserror::Error;
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("insufficient data: need {needed}, have {available}")]
    InsufficientData { needed: usize, available: usize },
    #[error("sampling rate undetermined: no positive time delta between samples")]
    UndeterminedRate,
    #[error("sample rate must be finite and greater than zero, got {0}")]
    InvalidSampleRate(f64),
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
    #[error("fft error: {0}")]
    Fft(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for AnalysisError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        AnalysisError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for AnalysisError {
    fn from(value: image::ImageError) -> Self {
        AnalysisError::Plot(value.to_string())
    }
}
