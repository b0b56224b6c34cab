//! Zero-padded radix-2 spectrum of one channel.
//!
//! The transform is a plain in-place Cooley-Tukey: bit-reversal permutation
//! followed by `log2(N)` butterfly stages. No window and no detrending are
//! applied, so bin 0 carries the channel mean.
use std::f64::consts::PI;
use rustfft::num_complex::Complex64;
use serde::Serialize;
use crate::analysis::AnalysisError;
/// Fewest finite samples a spectrum is computed from.
pub const MIN_SPECTRUM_SAMPLES: usize = 4;
/// Single-sided magnitude/phase spectrum; the three arrays are index aligned
/// and each holds `fft_size / 2 + 1` bins.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Spectrum {
    pub sample_rate_hz: f64,
    pub fft_size: usize,
    pub frequencies_hz: Vec<f64>,
    pub magnitudes: Vec<f64>,
    pub phases: Vec<f64>,
}
impl Spectrum {
    pub fn len(&self) -> usize {
        self.frequencies_hz.len()
    }
    pub fn is_empty(&self) -> bool {
        self.frequencies_hz.is_empty()
    }
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate_hz / self.fft_size as f64
    }
    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate_hz / 2.0
    }
    /// Index of the bin whose frequency is closest to `frequency_hz`.
    /// Ties resolve to the lower bin.
    pub fn nearest_bin(&self, frequency_hz: f64) -> Option<usize> {
        let freqs = &self.frequencies_hz;
        if freqs.is_empty() || !frequency_hz.is_finite() {
            return None;
        }
        let upper = freqs.partition_point(|f| *f < frequency_hz);
        if upper == 0 {
            return Some(0);
        }
        if upper == freqs.len() {
            return Some(freqs.len() - 1);
        }
        let below = frequency_hz - freqs[upper - 1];
        let above = freqs[upper] - frequency_hz;
        Some(if above < below { upper } else { upper - 1 })
    }
    /// Bin with the largest magnitude at or above `min_frequency_hz`.
    pub fn peak_bin(&self, min_frequency_hz: f64) -> Option<usize> {
        self.frequencies_hz
            .iter()
            .zip(&self.magnitudes)
            .enumerate()
            .filter(|(_, (f, _))| **f >= min_frequency_hz)
            .fold(None, |best: Option<(usize, f64)>, (idx, (_, m))| match best {
                Some((_, best_mag)) if best_mag >= *m => best,
                _ => Some((idx, *m)),
            })
            .map(|(idx, _)| idx)
    }
}
/// Smallest power of two holding `len` samples, never below 2.
pub fn padded_size(len: usize) -> usize {
    len.max(2).next_power_of_two()
}
/// Forward DFT of `buf` in place. The length must be a power of two.
pub fn fft_in_place(buf: &mut [Complex64]) -> Result<(), AnalysisError> {
    let n = buf.len();
    if !n.is_power_of_two() {
        return Err(AnalysisError::Fft(format!(
            "length {n} is not a power of two"
        )));
    }
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            buf.swap(i, j);
        }
    }
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = -2.0 * PI / len as f64;
        for start in (0..n).step_by(len) {
            for k in 0..half {
                let twiddle = Complex64::from_polar(1.0, step * k as f64);
                let u = buf[start + k];
                let t = buf[start + k + half] * twiddle;
                buf[start + k] = u + t;
                buf[start + k + half] = u - t;
            }
        }
        len <<= 1;
    }
    Ok(())
}
/// Computes the single-sided spectrum of `values` sampled at `sample_rate_hz`.
///
/// `values` must already be finite (the caller filters absent and non-finite
/// cells). At least [`MIN_SPECTRUM_SAMPLES`] values are required.
pub fn compute_spectrum(values: &[f64], sample_rate_hz: f64) -> Result<Spectrum, AnalysisError> {
    if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
        return Err(AnalysisError::InvalidSampleRate(sample_rate_hz));
    }
    if values.len() < MIN_SPECTRUM_SAMPLES {
        return Err(AnalysisError::InsufficientData {
            needed: MIN_SPECTRUM_SAMPLES,
            available: values.len(),
        });
    }
    let fft_size = padded_size(values.len());
    let mut buffer: Vec<Complex64> = values.iter().map(|v| Complex64::new(*v, 0.0)).collect();
    buffer.resize(fft_size, Complex64::new(0.0, 0.0));
    fft_in_place(&mut buffer)?;
    let bins = fft_size / 2 + 1;
    let bin_width = sample_rate_hz / fft_size as f64;
    let frequencies_hz = (0..bins).map(|k| k as f64 * bin_width).collect();
    let magnitudes = buffer[..bins].iter().map(|c| c.norm()).collect();
    // atan2(0, 0) is 0, so silent bins still get a finite phase
    let phases = buffer[..bins].iter().map(|c| c.im.atan2(c.re)).collect();
    Ok(Spectrum {
        sample_rate_hz,
        fft_size,
        frequencies_hz,
        magnitudes,
        phases,
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;
    fn tone(freq_hz: f64, sample_rate_hz: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate_hz).cos())
            .collect()
    }
    #[test]
    fn padded_size_rounds_up_to_power_of_two() {
        assert_eq!(padded_size(0), 2);
        assert_eq!(padded_size(1), 2);
        assert_eq!(padded_size(4), 4);
        assert_eq!(padded_size(5), 8);
        assert_eq!(padded_size(1000), 1024);
    }
    #[test]
    fn matches_rustfft_reference() {
        let input: Vec<Complex64> = (0..64)
            .map(|i| Complex64::new((i as f64 * 0.37).sin() + 0.1 * i as f64, 0.0))
            .collect();
        let mut ours = input.clone();
        fft_in_place(&mut ours).unwrap();
        let mut reference = input;
        let mut planner = FftPlanner::<f64>::new();
        planner.plan_fft_forward(64).process(&mut reference);
        for (a, b) in ours.iter().zip(&reference) {
            assert!((a - b).norm() < 1e-9, "{a} vs {b}");
        }
    }
    #[test]
    fn rejects_non_power_of_two_length() {
        let mut buf = vec![Complex64::new(1.0, 0.0); 6];
        assert!(matches!(fft_in_place(&mut buf), Err(AnalysisError::Fft(_))));
    }
    #[test]
    fn spectrum_shape_and_zero_padding() {
        let spectrum = compute_spectrum(&[1.0, 2.0, 3.0, 4.0, 5.0], 50.0).unwrap();
        assert_eq!(spectrum.fft_size, 8);
        assert_eq!(spectrum.len(), 5);
        assert_eq!(spectrum.magnitudes.len(), 5);
        assert_eq!(spectrum.phases.len(), 5);
        assert_eq!(spectrum.frequencies_hz[4], 25.0);
        // DC bin holds the plain sum since nothing is detrended
        assert!((spectrum.magnitudes[0] - 15.0).abs() < 1e-12);
        assert!(spectrum.magnitudes.iter().all(|m| *m >= 0.0));
    }
    #[test]
    fn silent_input_has_finite_phases() {
        let spectrum = compute_spectrum(&[0.0; 16], 100.0).unwrap();
        assert!(spectrum.phases.iter().all(|p| p.is_finite()));
        assert!(spectrum.magnitudes.iter().all(|m| *m == 0.0));
    }
    #[test]
    fn pure_tone_peaks_within_one_bin() {
        let sample_rate = 200.0;
        for &(freq, len) in &[(12.3, 64usize), (47.9, 300), (81.0, 1000)] {
            let spectrum = compute_spectrum(&tone(freq, sample_rate, len), sample_rate).unwrap();
            let peak = spectrum.peak_bin(0.0).unwrap();
            let found = spectrum.frequencies_hz[peak];
            assert!(
                (found - freq).abs() <= spectrum.bin_width_hz(),
                "expected {freq}, found {found}"
            );
        }
    }
    #[test]
    fn insufficient_samples_and_bad_rate() {
        assert!(matches!(
            compute_spectrum(&[1.0, 2.0, 3.0], 10.0),
            Err(AnalysisError::InsufficientData {
                needed: 4,
                available: 3
            })
        ));
        assert!(matches!(
            compute_spectrum(&[1.0; 8], 0.0),
            Err(AnalysisError::InvalidSampleRate(_))
        ));
    }
    #[test]
    fn nearest_bin_matches_linear_scan() {
        let spectrum = compute_spectrum(&tone(5.0, 100.0, 100), 100.0).unwrap();
        let linear = |f: f64| {
            let mut best = 0;
            for (idx, bin_freq) in spectrum.frequencies_hz.iter().enumerate() {
                if (bin_freq - f).abs() < (spectrum.frequencies_hz[best] - f).abs() {
                    best = idx;
                }
            }
            best
        };
        for &f in &[-3.0, 0.0, 0.39, 4.98, 5.0, 12.5, 33.3, 49.99, 50.0, 75.0] {
            assert_eq!(spectrum.nearest_bin(f), Some(linear(f)), "frequency {f}");
        }
        assert_eq!(spectrum.nearest_bin(f64::NAN), None);
    }
}
