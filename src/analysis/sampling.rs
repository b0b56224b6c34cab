use crate::analysis::{AnalysisError, Series};
/// Median of a slice; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
/// Representative sampling rate in Hz: `1000 / median(positive deltas in ms)`.
///
/// The median keeps the estimate stable when the logger occasionally drops
/// samples and leaves a long gap.
pub fn estimate_sample_rate(series: &Series) -> Result<f64, AnalysisError> {
    if series.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            needed: 2,
            available: series.len(),
        });
    }
    let deltas: Vec<f64> = series
        .samples()
        .windows(2)
        .map(|pair| pair[1].timestamp_millis - pair[0].timestamp_millis)
        .filter(|delta| *delta > 0)
        .map(|delta| delta as f64)
        .collect();
    let median_ms = median(&deltas).ok_or(AnalysisError::UndeterminedRate)?;
    Ok(1000.0 / median_ms)
}
