use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::analysis::error::AnalysisError;
use crate::analysis::fft::Spectrum;
use crate::analysis::pipeline::AnalysisReport;
use crate::analysis::Series;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub original: RGBColor,
    pub fitted: RGBColor,
    pub marker: RGBColor,
    /// Captions, tick labels and legends need a system font; turn them off
    /// to render on machines without one.
    pub labels: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            original: CYAN,
            fitted: RGBColor(255, 140, 0),
            marker: RED,
            labels: true,
        }
    }
}
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        (-1.0, 1.0)
    } else if (hi - lo).abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}
/// Original channel and its reconstruction against seconds since the first sample.
pub fn render_waveform_png(
    series: &Series,
    report: &AnalysisReport,
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    let channel = report.channel;
    let times = series.relative_seconds();
    let original: Vec<(f64, f64)> = times
        .iter()
        .zip(series.samples())
        .filter_map(|(t, s)| s.get(channel).map(|v| (*t, v)))
        .collect();
    if original.is_empty() {
        return Err(AnalysisError::Plot(format!("channel {channel} has no samples")));
    }
    let fitted: Vec<(f64, f64)> = report
        .reconstruction
        .as_ref()
        .map(|fit| times.iter().copied().zip(fit.values.iter().copied()).collect())
        .unwrap_or_default();
    let (y_min, y_max) = bounds(original.iter().chain(&fitted).map(|(_, v)| *v));
    let x_max = series.duration_seconds().max(f64::EPSILON);
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.labels {
            builder
                .caption(
                    format!("{} ({})", channel.name(), channel.unit()),
                    ("sans-serif", 20).into_font().color(&WHITE),
                )
                .set_label_area_size(LabelAreaPosition::Left, 55)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart = builder.build_cartesian_2d(0f64..x_max, y_min..y_max)?;
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&WHITE.mix(0.1));
        if style.labels {
            mesh.x_desc("t (s)").label_style(("sans-serif", 12).into_font().color(&WHITE));
        } else {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw()?;
        let original_color = style.original;
        chart
            .draw_series(LineSeries::new(original, &original_color))?
            .label("original")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], original_color));
        if !fitted.is_empty() {
            let fitted_color = style.fitted;
            chart
                .draw_series(LineSeries::new(fitted, &fitted_color))?
                .label("reconstructed")
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], fitted_color));
        }
        if style.labels {
            chart
                .configure_series_labels()
                .border_style(&WHITE.mix(0.2))
                .background_style(&style.background)
                .label_font(("sans-serif", 12).into_font().color(&WHITE))
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Magnitude spectrum with the detection threshold and selected harmonics marked.
pub fn render_spectrum_png(
    spectrum: &Spectrum,
    report: &AnalysisReport,
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    if spectrum.is_empty() {
        return Err(AnalysisError::Plot("spectrum has no bins".into()));
    }
    let x_max = spectrum.nyquist_hz().max(f64::EPSILON);
    let y_max = spectrum
        .magnitudes
        .iter()
        .skip(1)
        .copied()
        .fold(0.0f64, f64::max)
        .max(report.noise_floor.map(|f| f.threshold).unwrap_or(0.0))
        .max(1e-9)
        * 1.1;
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.labels {
            builder
                .caption("FFT Magnitude", ("sans-serif", 20).into_font().color(&WHITE))
                .set_label_area_size(LabelAreaPosition::Left, 55)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart = builder.build_cartesian_2d(0f64..x_max, 0f64..y_max)?;
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&WHITE.mix(0.1));
        if style.labels {
            mesh.x_desc("Hz").label_style(("sans-serif", 12).into_font().color(&WHITE));
        } else {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw()?;
        // bin 0 holds the channel mean and would flatten everything else
        let series = spectrum
            .frequencies_hz
            .iter()
            .copied()
            .zip(spectrum.magnitudes.iter().copied())
            .skip(1)
            .map(|(f, m)| (f, m.min(y_max)));
        chart.draw_series(LineSeries::new(series, &style.original))?;
        if let Some(floor) = report.noise_floor {
            let threshold = floor.threshold.min(y_max);
            chart.draw_series(LineSeries::new(
                vec![(0.0, threshold), (x_max, threshold)],
                WHITE.mix(0.5),
            ))?;
        }
        if let Some(fit) = &report.reconstruction {
            chart.draw_series(fit.harmonics.iter().map(|h| {
                Circle::new((h.frequency_hz, h.magnitude.min(y_max)), 4, style.marker.filled())
            }))?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, AnalysisError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| AnalysisError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
