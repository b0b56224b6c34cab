use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::analysis::{AnalysisError, Channel};
/// Analysis window applied before the transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// No tapering.
    #[default]
    Rectangular,
}
impl WindowKind {
    /// Mean of the window coefficients, used to undo the window's amplitude loss.
    pub fn coherent_gain(self) -> f64 {
        match self {
            WindowKind::Rectangular => 1.0,
        }
    }
}
/// User-tunable inputs of one analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub channel: Channel,
    /// Bins below this frequency are ignored by peak detection and reconstruction.
    pub min_frequency_hz: f64,
    pub harmonic_count: usize,
    pub window: WindowKind,
}
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            channel: Channel::AccX,
            min_frequency_hz: 0.0,
            harmonic_count: 3,
            window: WindowKind::Rectangular,
        }
    }
}
impl AnalysisConfig {
    /// Reads a JSON config file; missing fields fall back to [`Default`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let text = fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.min_frequency_hz.is_finite() || self.min_frequency_hz < 0.0 {
            return Err(AnalysisError::Config(format!(
                "min_frequency_hz must be a finite value >= 0, got {}",
                self.min_frequency_hz
            )));
        }
        Ok(())
    }
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }
    pub fn with_min_frequency(mut self, min_frequency_hz: f64) -> Self {
        self.min_frequency_hz = min_frequency_hz;
        self
    }
    pub fn with_harmonic_count(mut self, harmonic_count: usize) -> Self {
        self.harmonic_count = harmonic_count;
        self
    }
}
