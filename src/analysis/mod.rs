// src/analysis/mod.rs
pub mod config;
pub mod error;
pub mod fft;
pub mod harmonics;
pub mod peaks;
pub mod pipeline;
pub mod plot;
pub mod reconstruct;
pub mod report;
pub mod sampling;
pub mod series;
pub mod source;
pub use config::{AnalysisConfig, WindowKind};
pub use error::AnalysisError;
pub use fft::{compute_spectrum, fft_in_place, Spectrum};
pub use harmonics::select_harmonics;
pub use peaks::{detect_peaks, noise_floor, NoiseFloor, Peak};
pub use pipeline::{analyze_series, AnalysisPipeline, AnalysisReport};
pub use plot::{render_spectrum_png, render_waveform_png, PlotStyle};
pub use reconstruct::{reconstruct, Harmonic, Reconstruction, ReconstructionInput};
pub use sampling::estimate_sample_rate;
pub use series::{parse_series, Channel, Sample, Series};
pub use source::{FileSource, ManualSource, Recording, SeriesSource, BUNDLED_EXAMPLE};
