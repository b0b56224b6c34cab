use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use crate::analysis::pipeline::AnalysisReport;
use crate::analysis::{AnalysisError, Series};
pub fn to_json(report: &AnalysisReport) -> Result<String, AnalysisError> {
    Ok(serde_json::to_string_pretty(report)?)
}
pub fn write_json<P: AsRef<Path>>(report: &AnalysisReport, path: P) -> Result<(), AnalysisError> {
    fs::write(path, to_json(report)?)?;
    Ok(())
}
/// Tab-separated original and reconstructed values against relative time.
/// Absent original cells are written empty.
pub fn reconstruction_tsv(report: &AnalysisReport, series: &Series) -> Option<String> {
    let fit = report.reconstruction.as_ref()?;
    let mut out = format!("time_s\t{}\treconstructed\n", report.channel.header());
    for ((t, sample), fitted) in series
        .relative_seconds()
        .into_iter()
        .zip(series.samples())
        .zip(&fit.values)
    {
        let original = sample
            .get(report.channel)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "{t:.3}\t{original}\t{fitted:.6}");
    }
    Some(out)
}
/// One-screen text summary for terminals.
pub fn summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "source:       {}", report.source);
    let _ = writeln!(
        out,
        "channel:      {} ({} of {} samples finite)",
        report.channel, report.finite_count, report.sample_count
    );
    match report.sample_rate_hz {
        Some(rate) => {
            let _ = writeln!(out, "sample rate:  {rate:.3} Hz");
        }
        None => {
            let _ = writeln!(out, "sample rate:  undetermined");
        }
    }
    if let Some(spectrum) = &report.spectrum {
        let _ = writeln!(
            out,
            "fft size:     {} (bin width {:.4} Hz, nyquist {:.3} Hz)",
            spectrum.fft_size,
            spectrum.bin_width_hz(),
            spectrum.nyquist_hz()
        );
    }
    if let Some(floor) = &report.noise_floor {
        let _ = writeln!(
            out,
            "noise floor:  median {:.4}, mad {:.4}, threshold {:.4}",
            floor.median, floor.mad, floor.threshold
        );
    }
    let _ = writeln!(out, "peaks found:  {}", report.peaks.len());
    if let Some(fit) = &report.reconstruction {
        let _ = writeln!(out, "harmonics:");
        let _ = writeln!(out, "  {:>10}  {:>10}  {:>10}  {:>8}", "freq (Hz)", "amplitude", "phase", "bin");
        for h in &fit.harmonics {
            let _ = writeln!(
                out,
                "  {:>10.4}  {:>10.4}  {:>10.4}  {:>8}",
                h.frequency_hz, h.amplitude, h.phase_rad, h.bin_index
            );
        }
        let _ = writeln!(out, "mean:         {:.4}", fit.mean);
        let _ = writeln!(out, "equation:     {}", fit.equation);
    }
    if let Some(mse) = report.mean_squared_error {
        let _ = writeln!(out, "mse:          {mse:.6}");
    }
    for note in &report.notes {
        let _ = writeln!(out, "note:         {note}");
    }
    out
}
