use std::sync::Arc;
use log::{debug, info, warn};
use serde::Serialize;
use crate::analysis::config::AnalysisConfig;
use crate::analysis::fft::{compute_spectrum, Spectrum};
use crate::analysis::harmonics::select_harmonics;
use crate::analysis::peaks::{detect_peaks, noise_floor, NoiseFloor, Peak};
use crate::analysis::reconstruct::{mean_squared_error, reconstruct, Reconstruction, ReconstructionInput};
use crate::analysis::sampling::estimate_sample_rate;
use crate::analysis::source::SeriesSource;
use crate::analysis::{AnalysisError, Channel, Series};
/// Everything derived from one series snapshot for one configuration.
///
/// Stages that could not run leave their fields empty or `None`; the caller
/// decides what to show for those.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub source: String,
    pub channel: Channel,
    pub sample_count: usize,
    pub finite_count: usize,
    pub sample_rate_hz: Option<f64>,
    #[serde(skip)]
    pub spectrum: Option<Spectrum>,
    pub fft_size: Option<usize>,
    pub noise_floor: Option<NoiseFloor>,
    pub peaks: Vec<Peak>,
    pub selected: Vec<Peak>,
    pub reconstruction: Option<Reconstruction>,
    pub mean_squared_error: Option<f64>,
    /// Human-readable reasons for any stage that degraded.
    pub notes: Vec<String>,
}
impl AnalysisReport {
    pub fn equation(&self) -> Option<&str> {
        self.reconstruction.as_ref().map(|r| r.equation.as_str())
    }
}
/// Runs every stage on `series` for `config`. Never fails: a stage error is
/// recorded in `notes` and every later stage that depends on it is skipped.
pub fn analyze_series(series: &Series, source: &str, config: &AnalysisConfig) -> AnalysisReport {
    let channel = config.channel;
    let values = series.finite_values(channel);
    let mut report = AnalysisReport {
        source: source.to_string(),
        channel,
        sample_count: series.len(),
        finite_count: values.len(),
        sample_rate_hz: None,
        spectrum: None,
        fft_size: None,
        noise_floor: None,
        peaks: Vec::new(),
        selected: Vec::new(),
        reconstruction: None,
        mean_squared_error: None,
        notes: Vec::new(),
    };
    let rate = match estimate_sample_rate(series) {
        Ok(rate) => rate,
        Err(err) => {
            warn!("sampling rate: {err}");
            report.notes.push(format!("no sampling rate: {err}"));
            return report;
        }
    };
    report.sample_rate_hz = Some(rate);
    let spectrum = match compute_spectrum(&values, rate) {
        Ok(spectrum) => spectrum,
        Err(err) => {
            warn!("spectrum of {channel}: {err}");
            report.notes.push(format!("no spectrum: {err}"));
            return report;
        }
    };
    report.fft_size = Some(spectrum.fft_size);
    let fmin = config.min_frequency_hz;
    match noise_floor(&spectrum, fmin).and_then(|floor| Ok((floor, detect_peaks(&spectrum, fmin)?))) {
        Ok((floor, peaks)) => {
            report.noise_floor = Some(floor);
            report.peaks = peaks;
        }
        Err(err) => {
            debug!("peak detection above {fmin} Hz: {err}");
            report.notes.push(format!("no peaks: {err}"));
        }
    }
    report.selected = select_harmonics(&report.peaks, config.harmonic_count);
    report.reconstruction = reconstruct(&ReconstructionInput {
        spectrum: &spectrum,
        selected: &report.selected,
        series,
        channel,
        min_frequency_hz: fmin,
        window: config.window,
    });
    match &report.reconstruction {
        Some(fit) => report.mean_squared_error = mean_squared_error(fit, series, channel),
        None => report.notes.push("no reconstruction: no harmonics selected".into()),
    }
    report.spectrum = Some(spectrum);
    report
}
/// Holds the current series and re-derives everything from it on request.
///
/// Loading a recording swaps the shared snapshot in one step, and each
/// analysis clones the snapshot once, so a report never mixes two series.
pub struct AnalysisPipeline<S: SeriesSource> {
    source: S,
    current: Option<(String, Arc<Series>)>,
}
impl<S: SeriesSource> AnalysisPipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: None,
        }
    }
    /// Loads the next recording from the source, replacing the current series.
    /// A recording that fails to parse leaves the previous series in place.
    pub fn load_next(&mut self) -> Result<Option<Arc<Series>>, AnalysisError> {
        let Some(recording) = self.source.next_recording()? else {
            return Ok(None);
        };
        let series = Arc::new(recording.parse()?);
        info!(
            "loaded {}: {} samples, channels [{}]",
            recording.label,
            series.len(),
            series
                .channels()
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.current = Some((recording.label, Arc::clone(&series)));
        Ok(Some(series))
    }
    pub fn current(&self) -> Result<Arc<Series>, AnalysisError> {
        self.current
            .as_ref()
            .map(|(_, series)| Arc::clone(series))
            .ok_or_else(|| AnalysisError::Parse("no recording loaded yet".into()))
    }
    pub fn current_label(&self) -> Option<&str> {
        self.current.as_ref().map(|(label, _)| label.as_str())
    }
    pub fn analyze(&self, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
        config.validate()?;
        let (label, series) = self
            .current
            .as_ref()
            .map(|(label, series)| (label.clone(), Arc::clone(series)))
            .ok_or_else(|| AnalysisError::Parse("no recording loaded yet".into()))?;
        Ok(analyze_series(&series, &label, config))
    }
}
