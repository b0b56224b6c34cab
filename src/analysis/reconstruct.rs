//! Cosine-sum reconstruction from selected spectral peaks.
//!
//! Each selected frequency is mapped back onto its nearest spectrum bin, whose
//! phase is reused directly and whose magnitude is rescaled to a time-domain
//! amplitude. The channel mean is added once to stand in for the DC term.
use std::f64::consts::PI;
use serde::Serialize;
use crate::analysis::config::WindowKind;
use crate::analysis::fft::Spectrum;
use crate::analysis::peaks::Peak;
use crate::analysis::{Channel, Series};
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Harmonic {
    pub bin_index: usize,
    pub frequency_hz: f64,
    pub magnitude: f64,
    pub phase_rad: f64,
    pub amplitude: f64,
}
impl Harmonic {
    pub fn value_at(&self, t_seconds: f64) -> f64 {
        self.amplitude * (2.0 * PI * self.frequency_hz * t_seconds + self.phase_rad).cos()
    }
}
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reconstruction {
    pub harmonics: Vec<Harmonic>,
    /// Mean of the channel's finite values, added once to the cosine sum.
    pub mean: f64,
    /// One value per series sample, in series order.
    pub values: Vec<f64>,
    pub equation: String,
}
/// Everything a reconstruction depends on, passed explicitly.
#[derive(Clone, Copy, Debug)]
pub struct ReconstructionInput<'a> {
    pub spectrum: &'a Spectrum,
    pub selected: &'a [Peak],
    pub series: &'a Series,
    pub channel: Channel,
    pub min_frequency_hz: f64,
    pub window: WindowKind,
}
/// Converts an FFT magnitude back into a sinusoid amplitude.
pub fn bin_amplitude(magnitude: f64, bin_index: usize, fft_size: usize, window: WindowKind) -> f64 {
    if bin_index == 0 {
        magnitude / fft_size as f64
    } else {
        2.0 * magnitude / (fft_size as f64 * window.coherent_gain())
    }
}
/// Looks up phase and amplitude for every selected frequency in range.
pub fn resolve_harmonics(
    spectrum: &Spectrum,
    selected: &[Peak],
    min_frequency_hz: f64,
    window: WindowKind,
) -> Vec<Harmonic> {
    let nyquist = spectrum.nyquist_hz();
    selected
        .iter()
        .filter(|peak| peak.frequency_hz >= min_frequency_hz && peak.frequency_hz <= nyquist)
        .filter_map(|peak| {
            let bin = spectrum.nearest_bin(peak.frequency_hz)?;
            let magnitude = spectrum.magnitudes[bin];
            Some(Harmonic {
                bin_index: bin,
                frequency_hz: peak.frequency_hz,
                magnitude,
                phase_rad: spectrum.phases[bin],
                amplitude: bin_amplitude(magnitude, bin, spectrum.fft_size, window),
            })
        })
        .collect()
}
/// `y(t) = A·cos(2π·F·t ± |φ|) + ...` with every field to four decimals.
pub fn format_equation(harmonics: &[Harmonic]) -> String {
    let terms: Vec<String> = harmonics
        .iter()
        .map(|h| {
            let phase = format!("{:.4}", h.phase_rad.abs());
            // a phase that rounds to zero prints as "+ 0.0000"
            let sign = if h.phase_rad < 0.0 && phase != "0.0000" { '-' } else { '+' };
            format!(
                "{:.4}·cos(2π·{:.4}·t {} {})",
                h.amplitude, h.frequency_hz, sign, phase
            )
        })
        .collect();
    format!("y(t) = {}", terms.join(" + "))
}
/// Rebuilds the channel as mean + Σ cosines at every sample time.
///
/// Returns `None` when no selected harmonic lies within `[min_frequency_hz, Nyquist]`
/// or when the channel has no finite values to take a mean from.
pub fn reconstruct(input: &ReconstructionInput<'_>) -> Option<Reconstruction> {
    let harmonics = resolve_harmonics(
        input.spectrum,
        input.selected,
        input.min_frequency_hz,
        input.window,
    );
    if harmonics.is_empty() {
        return None;
    }
    let mean = input.series.mean(input.channel)?;
    let values = input
        .series
        .relative_seconds()
        .into_iter()
        .map(|t| mean + harmonics.iter().map(|h| h.value_at(t)).sum::<f64>())
        .collect();
    let equation = format_equation(&harmonics);
    Some(Reconstruction {
        harmonics,
        mean,
        values,
        equation,
    })
}
/// Mean squared error against the samples where `channel` is present.
pub fn mean_squared_error(reconstruction: &Reconstruction, series: &Series, channel: Channel) -> Option<f64> {
    let (sum, count) = series
        .samples()
        .iter()
        .zip(&reconstruction.values)
        .filter_map(|(sample, fitted)| sample.get(channel).map(|actual| (actual - fitted).powi(2)))
        .fold((0.0, 0usize), |(sum, count), err| (sum + err, count + 1));
    (count > 0).then(|| sum / count as f64)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fft::compute_spectrum;
    use crate::analysis::harmonics::select_harmonics;
    use crate::analysis::peaks::detect_peaks;
    use crate::analysis::Sample;
    /// 1024 samples at 1 kHz so 62.5 Hz and 195.3125 Hz land exactly on bins.
    fn bin_aligned_series() -> Series {
        let samples = (0..1024)
            .map(|i| {
                let t = i as f64 / 1000.0;
                let v = 1.0 + 0.8 * (2.0 * PI * 62.5 * t).cos() + 0.3 * (2.0 * PI * 195.3125 * t).sin();
                Sample::new(i as i64).with(Channel::AccZ, v)
            })
            .collect();
        Series::from_samples(samples, vec![Channel::AccZ])
    }
    fn run(series: &Series, fmin: f64, count: usize) -> Option<Reconstruction> {
        let spectrum = compute_spectrum(&series.finite_values(Channel::AccZ), 1000.0).unwrap();
        let peaks = detect_peaks(&spectrum, fmin).unwrap();
        let selected = select_harmonics(&peaks, count);
        reconstruct(&ReconstructionInput {
            spectrum: &spectrum,
            selected: &selected,
            series,
            channel: Channel::AccZ,
            min_frequency_hz: fmin,
            window: WindowKind::Rectangular,
        })
    }
    #[test]
    fn recovers_bin_aligned_components_exactly() {
        let series = bin_aligned_series();
        let fit = run(&series, 1.0, 2).unwrap();
        assert_eq!(fit.harmonics.len(), 2);
        let first = fit.harmonics[0];
        assert_eq!(first.frequency_hz, 62.5);
        assert!((first.amplitude - 0.8).abs() < 1e-9);
        assert!(first.phase_rad.abs() < 1e-9);
        let second = fit.harmonics[1];
        assert_eq!(second.frequency_hz, 195.3125);
        assert!((second.amplitude - 0.3).abs() < 1e-9);
        // sin is a cosine delayed by a quarter turn
        assert!((second.phase_rad + PI / 2.0).abs() < 1e-9);
        assert!((fit.mean - 1.0).abs() < 1e-9);
        assert_eq!(fit.values.len(), series.len());
        let mse = mean_squared_error(&fit, &series, Channel::AccZ).unwrap();
        assert!(mse < 1e-18, "mse {mse}");
    }
    #[test]
    fn equation_lists_terms_in_selection_order() {
        let fit = run(&bin_aligned_series(), 1.0, 2).unwrap();
        assert_eq!(
            fit.equation,
            "y(t) = 0.8000·cos(2π·62.5000·t + 0.0000) + 0.3000·cos(2π·195.3125·t - 1.5708)"
        );
    }
    #[test]
    fn zero_harmonics_means_no_reconstruction() {
        assert!(run(&bin_aligned_series(), 1.0, 0).is_none());
    }
    #[test]
    fn out_of_range_selections_are_discarded() {
        let series = bin_aligned_series();
        let spectrum = compute_spectrum(&series.finite_values(Channel::AccZ), 1000.0).unwrap();
        let selected = [
            Peak {
                bin_index: 64,
                frequency_hz: 62.5,
                magnitude: 409.6,
                residual: 409.0,
            },
            Peak {
                bin_index: 600,
                frequency_hz: 600.0,
                magnitude: 1.0,
                residual: 1.0,
            },
        ];
        let input = ReconstructionInput {
            spectrum: &spectrum,
            selected: &selected,
            series: &series,
            channel: Channel::AccZ,
            min_frequency_hz: 100.0,
            window: WindowKind::Rectangular,
        };
        assert!(reconstruct(&input).is_none());
        let input = ReconstructionInput {
            min_frequency_hz: 0.0,
            ..input
        };
        let fit = reconstruct(&input).unwrap();
        assert_eq!(fit.harmonics.len(), 1);
        assert_eq!(fit.harmonics[0].bin_index, 64);
    }
    #[test]
    fn reconstruction_is_deterministic() {
        let series = bin_aligned_series();
        let a = run(&series, 1.0, 3).unwrap();
        let b = run(&series, 1.0, 3).unwrap();
        assert_eq!(a.equation, b.equation);
        let bits = |r: &Reconstruction| r.values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }
    #[test]
    fn dc_bin_amplitude_is_not_doubled() {
        assert_eq!(bin_amplitude(512.0, 0, 1024, WindowKind::Rectangular), 0.5);
        assert_eq!(bin_amplitude(512.0, 3, 1024, WindowKind::Rectangular), 1.0);
    }
}
