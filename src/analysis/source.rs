use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use log::info;
use crate::analysis::series::parse_series;
use crate::analysis::{AnalysisError, Series};
/// Short recording shipped with the crate: AccX carries a 2 Hz tone, AccZ
/// gravity plus a 5 Hz tone, logged at 50 Hz with a few irregular rows.
pub const BUNDLED_EXAMPLE: &str = include_str!("../../data/example.tsv");
/// Raw recording text plus a label describing where it came from.
#[derive(Clone, Debug)]
pub struct Recording {
    pub label: String,
    pub text: String,
}
impl Recording {
    pub fn parse(&self) -> Result<Series, AnalysisError> {
        parse_series(&self.text)
    }
}
/// Something that can yield recordings on demand.
pub trait SeriesSource {
    fn next_recording(&mut self) -> Result<Option<Recording>, AnalysisError>;
}
/// Reads one file from disk, once.
pub struct FileSource {
    path: Option<PathBuf>,
}
impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
        }
    }
}
impl SeriesSource for FileSource {
    fn next_recording(&mut self) -> Result<Option<Recording>, AnalysisError> {
        let Some(path) = self.path.take() else {
            return Ok(None);
        };
        let bytes = fs::read(&path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| AnalysisError::Parse(format!("{} is not valid UTF-8", path.display())))?;
        info!("read {} ({} bytes)", path.display(), text.len());
        Ok(Some(Recording {
            label: path.display().to_string(),
            text,
        }))
    }
}
/// In-memory source useful for tests and for the bundled example.
pub struct ManualSource {
    queue: VecDeque<Recording>,
}
impl ManualSource {
    pub fn new(recordings: impl IntoIterator<Item = Recording>) -> Self {
        Self {
            queue: recordings.into_iter().collect(),
        }
    }
    pub fn from_text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new([Recording {
            label: label.into(),
            text: text.into(),
        }])
    }
    pub fn bundled_example() -> Self {
        Self::from_text("bundled example", BUNDLED_EXAMPLE)
    }
}
impl SeriesSource for ManualSource {
    fn next_recording(&mut self) -> Result<Option<Recording>, AnalysisError> {
        Ok(self.queue.pop_front())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Channel;
    #[test]
    fn manual_source_drains_in_order() {
        let mut source = ManualSource::new([
            Recording {
                label: "a".into(),
                text: "time\n".into(),
            },
            Recording {
                label: "b".into(),
                text: "time\n".into(),
            },
        ]);
        assert_eq!(source.next_recording().unwrap().unwrap().label, "a");
        assert_eq!(source.next_recording().unwrap().unwrap().label, "b");
        assert!(source.next_recording().unwrap().is_none());
    }
    #[test]
    fn bundled_example_parses() {
        let recording = ManualSource::bundled_example().next_recording().unwrap().unwrap();
        let series = recording.parse().unwrap();
        assert!(series.len() > 100);
        assert!(series.has_channel(Channel::AccZ));
        assert!(series.has_channel(Channel::AngleZ));
    }
    #[test]
    fn file_source_reads_once() {
        let path = std::env::temp_dir().join(format!("imu-harmonics-source-{}.tsv", std::process::id()));
        fs::write(&path, "time\tAccX(g)\n2024-03-01 10:00:00.000\t0.5\n").unwrap();
        let mut source = FileSource::new(&path);
        let recording = source.next_recording().unwrap().unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(recording.parse().unwrap().len(), 1);
        assert!(source.next_recording().unwrap().is_none());
    }
    #[test]
    fn missing_file_is_an_io_error() {
        let mut source = FileSource::new("/definitely/not/here.tsv");
        assert!(matches!(source.next_recording(), Err(AnalysisError::Io(_))));
    }
}
