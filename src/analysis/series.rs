//! Tab-delimited IMU recording ingestion.
//!
//! The header row must carry a `time` column. Recognised channel columns are
//! the nine WitMotion-style fields (acceleration in g, angular rate in °/s,
//! angle in °), matched with or without their unit suffix. Everything else in
//! the file is ignored.
use std::fmt;
use std::str::FromStr;
use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::analysis::AnalysisError;
pub const TIME_COLUMN: &str = "time";
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    AccX,
    AccY,
    AccZ,
    AsX,
    AsY,
    AsZ,
    AngleX,
    AngleY,
    AngleZ,
}
impl Channel {
    pub const COUNT: usize = 9;
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::AccX,
        Channel::AccY,
        Channel::AccZ,
        Channel::AsX,
        Channel::AsY,
        Channel::AsZ,
        Channel::AngleX,
        Channel::AngleY,
        Channel::AngleZ,
    ];
    pub fn index(self) -> usize {
        self as usize
    }
    pub fn name(self) -> &'static str {
        match self {
            Channel::AccX => "AccX",
            Channel::AccY => "AccY",
            Channel::AccZ => "AccZ",
            Channel::AsX => "AsX",
            Channel::AsY => "AsY",
            Channel::AsZ => "AsZ",
            Channel::AngleX => "AngleX",
            Channel::AngleY => "AngleY",
            Channel::AngleZ => "AngleZ",
        }
    }
    pub fn unit(self) -> &'static str {
        match self {
            Channel::AccX | Channel::AccY | Channel::AccZ => "g",
            Channel::AsX | Channel::AsY | Channel::AsZ => "°/s",
            Channel::AngleX | Channel::AngleY | Channel::AngleZ => "°",
        }
    }
    /// Column header as written by the logger, e.g. `AsX(°/s)`.
    pub fn header(self) -> String {
        format!("{}({})", self.name(), self.unit())
    }
    /// Matches `AccX` as well as `AccX(g)`, ignoring case and surrounding whitespace.
    pub fn from_header(header: &str) -> Option<Channel> {
        let header = header.trim();
        let bare = match header.find('(') {
            Some(open) if header.ends_with(')') => &header[..open],
            _ => header,
        };
        let bare = bare.trim();
        Channel::ALL
            .into_iter()
            .find(|channel| channel.name().eq_ignore_ascii_case(bare))
    }
}
impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl FromStr for Channel {
    type Err = AnalysisError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::from_header(s).ok_or_else(|| AnalysisError::UnknownChannel(s.to_string()))
    }
}
/// One row of the recording. Channels missing from the file, or whose cell
/// did not hold a finite number, are `None`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp_millis: i64,
    pub values: [Option<f64>; Channel::COUNT],
}
impl Sample {
    pub fn new(timestamp_millis: i64) -> Self {
        Self {
            timestamp_millis,
            values: [None; Channel::COUNT],
        }
    }
    pub fn get(&self, channel: Channel) -> Option<f64> {
        self.values[channel.index()]
    }
    pub fn with(mut self, channel: Channel, value: f64) -> Self {
        self.values[channel.index()] = Some(value);
        self
    }
}
/// Time-ordered samples from one source file; timestamps are unique and
/// strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Series {
    samples: Vec<Sample>,
    channels: Vec<Channel>,
}
impl Series {
    /// Sorts by timestamp and collapses duplicate timestamps to the first row seen.
    pub fn from_samples(mut samples: Vec<Sample>, channels: Vec<Channel>) -> Self {
        samples.sort_by_key(|s| s.timestamp_millis);
        samples.dedup_by_key(|s| s.timestamp_millis);
        Self { samples, channels }
    }
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
    /// Channels whose column was present in the header, in header order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }
    pub fn has_channel(&self, channel: Channel) -> bool {
        self.channels.contains(&channel)
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn timestamps_millis(&self) -> Vec<i64> {
        self.samples.iter().map(|s| s.timestamp_millis).collect()
    }
    /// Seconds elapsed since the first sample, one entry per sample.
    pub fn relative_seconds(&self) -> Vec<f64> {
        let Some(first) = self.samples.first() else {
            return Vec::new();
        };
        let origin = first.timestamp_millis;
        self.samples
            .iter()
            .map(|s| (s.timestamp_millis - origin) as f64 / 1000.0)
            .collect()
    }
    pub fn duration_seconds(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (last.timestamp_millis - first.timestamp_millis) as f64 / 1000.0,
            _ => 0.0,
        }
    }
    /// Finite values of `channel` in time order; absent cells are skipped.
    pub fn finite_values(&self, channel: Channel) -> Vec<f64> {
        self.samples
            .iter()
            .filter_map(|s| s.get(channel))
            .filter(|v| v.is_finite())
            .collect()
    }
    pub fn mean(&self, channel: Channel) -> Option<f64> {
        let values = self.finite_values(channel);
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
const TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
/// Parses a calendar timestamp with an optional 1-3 digit fractional second.
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (whole, fraction) = match raw.rsplit_once('.') {
        Some((whole, fraction)) if !whole.ends_with(|c: char| !c.is_ascii_digit()) => {
            (whole, Some(fraction))
        }
        _ => (raw, None),
    };
    let millis = match fraction {
        None => 0,
        Some(digits) => {
            if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let scale = [100, 10, 1][digits.len() - 1];
            digits.parse::<i64>().ok()? * scale
        }
    };
    let datetime = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(whole, fmt).ok())?;
    Some(datetime.and_utc().timestamp_millis() + millis)
}
fn parse_cell(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
/// Parses a whole recording into a [`Series`].
///
/// Rows whose `time` field cannot be parsed are dropped; channel cells that
/// are empty, non-numeric, or non-finite are left absent. Fails when the
/// header has no `time` column or when no row survives.
pub fn parse_series(text: &str) -> Result<Series, AnalysisError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| AnalysisError::Parse("input is empty".into()))?;
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    let time_idx = columns
        .iter()
        .position(|c| *c == TIME_COLUMN)
        .ok_or_else(|| AnalysisError::Parse(format!("header has no `{TIME_COLUMN}` column")))?;
    let mut channel_columns: Vec<(usize, Channel)> = Vec::new();
    for (idx, column) in columns.iter().enumerate() {
        if let Some(channel) = Channel::from_header(column) {
            if channel_columns.iter().all(|(_, seen)| *seen != channel) {
                channel_columns.push((idx, channel));
            }
        }
    }
    let mut samples = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        let Some(timestamp) = fields.get(time_idx).and_then(|raw| parse_timestamp_millis(raw)) else {
            dropped += 1;
            continue;
        };
        let mut sample = Sample::new(timestamp);
        for &(idx, channel) in &channel_columns {
            sample.values[channel.index()] = fields.get(idx).and_then(|raw| parse_cell(raw));
        }
        samples.push(sample);
    }
    if dropped > 0 {
        debug!("dropped {dropped} row(s) with an unparsable `{TIME_COLUMN}` field");
    }
    if samples.is_empty() {
        return Err(AnalysisError::Parse("no rows with a valid timestamp".into()));
    }
    let parsed = samples.len();
    let channels = channel_columns.into_iter().map(|(_, channel)| channel).collect();
    let series = Series::from_samples(samples, channels);
    if series.len() < parsed {
        debug!("collapsed {} duplicate timestamp row(s)", parsed - series.len());
    }
    Ok(series)
}
