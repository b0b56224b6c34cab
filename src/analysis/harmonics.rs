use crate::analysis::peaks::Peak;
/// Peaks closer together than this (Hz) are treated as the same harmonic.
pub const FREQUENCY_DEDUP_HZ: f64 = 1e-6;
/// Picks up to `count` peaks, strongest magnitude first.
///
/// Detection orders peaks by residual; selection re-ranks them by raw
/// magnitude. A peak whose frequency is within [`FREQUENCY_DEDUP_HZ`] of the
/// previously kept one is skipped. Returns fewer than `count` entries when
/// fewer peaks exist.
pub fn select_harmonics(peaks: &[Peak], count: usize) -> Vec<Peak> {
    if count == 0 {
        return Vec::new();
    }
    let mut ranked = peaks.to_vec();
    ranked.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    let mut selected: Vec<Peak> = Vec::with_capacity(count.min(ranked.len()));
    for peak in ranked {
        if selected.len() == count {
            break;
        }
        let duplicate = selected
            .last()
            .is_some_and(|last| (last.frequency_hz - peak.frequency_hz).abs() <= FREQUENCY_DEDUP_HZ);
        if !duplicate {
            selected.push(peak);
        }
    }
    selected
}
#[cfg(test)]
mod tests {
    use super::*;
    fn peak(bin_index: usize, frequency_hz: f64, magnitude: f64, residual: f64) -> Peak {
        Peak {
            bin_index,
            frequency_hz,
            magnitude,
            residual,
        }
    }
    #[test]
    fn zero_count_selects_nothing() {
        let peaks = [peak(3, 3.0, 10.0, 9.0)];
        assert!(select_harmonics(&peaks, 0).is_empty());
    }
    #[test]
    fn ranks_by_magnitude_and_truncates() {
        let peaks = [
            peak(3, 3.0, 10.0, 9.0),
            peak(9, 9.0, 30.0, 29.0),
            peak(6, 6.0, 20.0, 19.0),
        ];
        let selected = select_harmonics(&peaks, 2);
        let freqs: Vec<f64> = selected.iter().map(|p| p.frequency_hz).collect();
        assert_eq!(freqs, vec![9.0, 6.0]);
    }
    #[test]
    fn never_fabricates_beyond_available() {
        let peaks = [peak(3, 3.0, 10.0, 9.0), peak(6, 6.0, 20.0, 19.0)];
        assert_eq!(select_harmonics(&peaks, 10).len(), 2);
        assert!(select_harmonics(&[], 4).is_empty());
    }
    #[test]
    fn near_identical_frequencies_collapse() {
        let peaks = [
            peak(5, 5.0, 20.0, 19.0),
            peak(5, 5.0 + 1e-9, 19.0, 18.0),
            peak(8, 8.0, 4.0, 3.0),
        ];
        let selected = select_harmonics(&peaks, 3);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[1].frequency_hz, 8.0);
    }
}
