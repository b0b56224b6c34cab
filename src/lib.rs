//! Spectral decomposition of irregularly logged IMU recordings.
//!
//! A tab-delimited recording is parsed into a time-ordered [`Series`], its
//! sampling rate is estimated from the median time step, one channel is
//! transformed with a zero-padded radix-2 FFT, dominant peaks are picked above
//! a median/MAD noise floor, and the strongest ones are turned back into a
//! cosine sum with a printable equation.
//!
//! ```no_run
//! use imu_harmonics::{AnalysisConfig, AnalysisPipeline, Channel, FileSource};
//!
//! let mut pipeline = AnalysisPipeline::new(FileSource::new("recording.tsv"));
//! pipeline.load_next()?;
//! let config = AnalysisConfig::default().with_channel(Channel::AccZ).with_harmonic_count(2);
//! let report = pipeline.analyze(&config)?;
//! if let Some(equation) = report.equation() {
//!     println!("{equation}");
//! }
//! # Ok::<(), imu_harmonics::AnalysisError>(())
//! ```
pub mod analysis;
pub use analysis::*;
