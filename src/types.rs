use std::fmt;

use chrono::{NaiveDate, NaiveTime};

/// Result of casting a header token with [`cast`](crate::cast)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    /// 数字形式但非有限值（nan / inf）
    Unknown,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Unknown => f.write_str("Unknown"),
        }
    }
}

/// One channel line of a header
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    pub file_name: String,
    /// 存储格式，已去掉 x / : / + 修饰
    pub format: String,
    pub adc_gain: f64,
    pub baseline: i64,
    pub units: String,
    pub adc_resolution: Option<i64>,
    pub adc_zero: Option<i64>,
    pub initial_value: Option<i64>,
    pub checksum: Option<i64>,
    pub block_size: Option<i64>,
    pub name: String,
}

/// Parsed header of one record
///
/// Built by [`HeaderRecord::parse`](crate::HeaderRecord::parse) from the raw
/// header text. Fields that are absent or not numeric are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRecord {
    pub record_name: String,
    pub num_signals: Option<usize>,
    pub sampling_frequency: Option<f64>,
    pub counter_frequency: Option<f64>,
    pub num_samples: Option<u64>,
    pub base_time: Option<NaiveTime>,
    pub base_date: Option<NaiveDate>,
    pub channels: Vec<ChannelSpec>,
    pub signal_files: Vec<String>,
    /// 按首次出现顺序保存的注释标签及其值
    pub annotations: Vec<(String, Vec<String>)>,
    /// 通道行之后以 # 开头的原始行
    pub comments: Vec<String>,
}

impl HeaderRecord {
    /// Values recorded under an annotation tag, in header order
    pub fn annotation(&self, tag: &str) -> Option<&[String]> {
        self.annotations
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, values)| values.as_slice())
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn signal_formats(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.format.as_str()).collect()
    }

    /// Duration in seconds, when both sample count and frequency are known
    pub fn duration_seconds(&self) -> Option<f64> {
        match (self.num_samples, self.sampling_frequency) {
            (Some(n), Some(fs)) if fs > 0.0 => Some(n as f64 / fs),
            _ => None,
        }
    }
}
