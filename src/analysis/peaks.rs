use serde::Serialize;
use crate::analysis::fft::Spectrum;
use crate::analysis::sampling::median;
use crate::analysis::AnalysisError;
/// Fewest in-range bins needed for the median/MAD statistics.
pub const MIN_PEAK_CANDIDATES: usize = 5;
/// Threshold = median + `MAD_MULTIPLIER` * MAD.
pub const MAD_MULTIPLIER: f64 = 3.0;
/// Floor for the MAD so a perfectly flat spectrum still has a threshold above its level.
pub const MAD_FLOOR: f64 = 1e-12;
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Peak {
    pub bin_index: usize,
    pub frequency_hz: f64,
    pub magnitude: f64,
    /// Height above the detection threshold.
    pub residual: f64,
}
/// Robust noise estimate over the bins at or above the cutoff.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NoiseFloor {
    pub median: f64,
    pub mad: f64,
    pub threshold: f64,
}
pub fn noise_floor(spectrum: &Spectrum, min_frequency_hz: f64) -> Result<NoiseFloor, AnalysisError> {
    let candidates: Vec<f64> = spectrum
        .frequencies_hz
        .iter()
        .zip(&spectrum.magnitudes)
        .filter(|(f, _)| **f >= min_frequency_hz)
        .map(|(_, m)| *m)
        .collect();
    if candidates.len() < MIN_PEAK_CANDIDATES {
        return Err(AnalysisError::InsufficientData {
            needed: MIN_PEAK_CANDIDATES,
            available: candidates.len(),
        });
    }
    let med = median(&candidates).unwrap_or(0.0);
    let deviations: Vec<f64> = candidates.iter().map(|v| (v - med).abs()).collect();
    let mad = median(&deviations).unwrap_or(0.0).max(MAD_FLOOR);
    Ok(NoiseFloor {
        median: med,
        mad,
        threshold: med + MAD_MULTIPLIER * mad,
    })
}
/// Strict local maxima above the noise threshold, strongest residual first.
///
/// Only interior bins qualify, and an equal-height neighbour disqualifies a
/// bin, so flat plateaus never produce a peak.
pub fn detect_peaks(spectrum: &Spectrum, min_frequency_hz: f64) -> Result<Vec<Peak>, AnalysisError> {
    let floor = noise_floor(spectrum, min_frequency_hz)?;
    let mags = &spectrum.magnitudes;
    let mut peaks: Vec<Peak> = (1..mags.len().saturating_sub(1))
        .filter(|&i| spectrum.frequencies_hz[i] >= min_frequency_hz)
        .filter(|&i| mags[i] > floor.threshold && mags[i] > mags[i - 1] && mags[i] > mags[i + 1])
        .map(|i| Peak {
            bin_index: i,
            frequency_hz: spectrum.frequencies_hz[i],
            magnitude: mags[i],
            residual: mags[i] - floor.threshold,
        })
        .collect();
    peaks.sort_by(|a, b| b.residual.total_cmp(&a.residual));
    Ok(peaks)
}
