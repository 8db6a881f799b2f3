use chrono::{NaiveDate, NaiveTime};
use log::{debug, warn};

use crate::config::HeaderConfig;
use crate::error::{ChallengeError, Result};
use crate::types::{ChannelSpec, HeaderRecord};
use crate::utils::{is_number, parse_integer, parse_number};
use crate::{DIAGNOSIS_TAG, IMAGE_TAG, VARIABLE_SEPARATOR};

/// 每个通道行的字段数
const CHANNEL_LINE_FIELDS: usize = 9;

fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or("")
}

fn record_field(text: &str, index: usize) -> Option<&str> {
    first_line(text).split_whitespace().nth(index)
}

/// Record name: first field of line 0, before any `/`
pub fn record_name(text: &str) -> String {
    record_field(text, 0)
        .and_then(|field| field.split('/').next())
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Number of signals, `None` unless the field is an integer
pub fn num_signals(text: &str) -> Option<usize> {
    record_field(text, 1)
        .and_then(parse_integer)
        .and_then(|n| usize::try_from(n).ok())
}

/// Sampling frequency in Hz, without the `/counter` suffix
pub fn sampling_frequency(text: &str) -> Option<f64> {
    let field = record_field(text, 2)?.split('/').next()?.trim();
    if is_number(field) {
        parse_number(field)
    } else {
        None
    }
}

/// Counter frequency, the part of the frequency field after `/`
pub fn counter_frequency(text: &str) -> Option<f64> {
    let field = record_field(text, 2)?.split('/').nth(1)?;
    parse_number(field.split('(').next()?)
}

/// Number of samples per signal, `None` unless the field is an integer
pub fn num_samples(text: &str) -> Option<u64> {
    record_field(text, 3)
        .and_then(parse_integer)
        .and_then(|n| u64::try_from(n).ok())
}

/// Base time of the recording (`HH:MM:SS[.fff]`)
pub fn base_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(record_field(text, 4)?, "%H:%M:%S%.f").ok()
}

/// Base date of the recording (`DD/MM/YYYY`)
pub fn base_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(record_field(text, 5)?, "%d/%m/%Y").ok()
}

/// Strips the `x<mult>`, `:<skew>` and `+<offset>` decorations from a format field.
///
/// The delimiters are cut one after the other in that order.
pub fn strip_format(field: &str) -> &str {
    ['x', ':', '+']
        .iter()
        .fold(field, |f, &delim| f.split(delim).next().unwrap_or(f))
}

fn parse_channel(line_number: usize, line: &str, cfg: &HeaderConfig) -> Result<ChannelSpec> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < CHANNEL_LINE_FIELDS {
        return Err(ChallengeError::InvalidFormat(format!(
            "line {}: expected {} fields, found {}",
            line_number,
            CHANNEL_LINE_FIELDS,
            fields.len()
        )));
    }

    // 增益字段: gain[(baseline)][/units]
    let mut gain_parts = fields[2].split('/');
    let value = gain_parts.next().unwrap_or("");
    let units = gain_parts
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| cfg.default_units.clone());

    let (gain_str, baseline_str) = match value.split_once('(') {
        Some((gain, rest)) if value.contains(')') => (gain, rest.split(')').next().unwrap_or("")),
        _ => (value, value),
    };

    let adc_gain = parse_number(gain_str).ok_or_else(|| {
        ChallengeError::InvalidFormat(format!("line {}: invalid ADC gain {:?}", line_number, fields[2]))
    })?;
    let baseline = parse_integer(baseline_str).ok_or_else(|| {
        ChallengeError::InvalidFormat(format!("line {}: invalid baseline {:?}", line_number, fields[2]))
    })?;

    Ok(ChannelSpec {
        file_name: fields[0].to_string(),
        format: strip_format(fields[1]).to_string(),
        adc_gain,
        baseline,
        units,
        adc_resolution: parse_integer(fields[3]),
        adc_zero: parse_integer(fields[4]),
        initial_value: parse_integer(fields[5]),
        checksum: parse_integer(fields[6]),
        block_size: parse_integer(fields[7]),
        name: fields[8].to_string(),
    })
}

fn parse_channels(text: &str, cfg: &HeaderConfig) -> Result<Vec<ChannelSpec>> {
    let count = num_signals(text).unwrap_or(0);
    let lines: Vec<&str> = text.split('\n').collect();
    let available = lines.len() - 1;
    if available < count {
        return Err(ChallengeError::InvalidFormat(format!(
            "expected {} channel lines, found {}",
            count, available
        )));
    }

    lines[1..=count]
        .iter()
        .enumerate()
        .map(|(i, line)| parse_channel(i + 1, line, cfg))
        .collect()
}

/// Storage format of each channel
pub fn signal_formats(text: &str) -> Result<Vec<String>> {
    Ok(parse_channels(text, &HeaderConfig::default())?
        .into_iter()
        .map(|c| c.format)
        .collect())
}

/// ADC gain of each channel
pub fn adc_gains(text: &str) -> Result<Vec<f64>> {
    Ok(parse_channels(text, &HeaderConfig::default())?
        .into_iter()
        .map(|c| c.adc_gain)
        .collect())
}

/// Baseline of each channel, from the parenthesised value or the gain field
pub fn baselines(text: &str) -> Result<Vec<i64>> {
    Ok(parse_channels(text, &HeaderConfig::default())?
        .into_iter()
        .map(|c| c.baseline)
        .collect())
}

/// Physical units of each channel, `mV` when absent
pub fn signal_units(text: &str) -> Result<Vec<String>> {
    Ok(parse_channels(text, &HeaderConfig::default())?
        .into_iter()
        .map(|c| c.units)
        .collect())
}

/// Channel names, the last field of each channel line
pub fn signal_names(text: &str) -> Result<Vec<String>> {
    Ok(parse_channels(text, &HeaderConfig::default())?
        .into_iter()
        .map(|c| c.name)
        .collect())
}

/// Signal files referenced by the channel lines, in order of first appearance
///
/// Collection stops at the first line past the signal count, the first
/// comment line, or the first blank line.
pub fn signal_files(text: &str) -> Vec<String> {
    let mut lines = text.split('\n');
    let mut files: Vec<String> = Vec::new();

    let num_channels = match lines.next() {
        Some(line) if !line.starts_with('#') => line
            .split_whitespace()
            .nth(1)
            .and_then(parse_integer)
            .unwrap_or(0),
        _ => return files,
    };

    for (i, line) in lines.enumerate() {
        if i as i64 + 1 > num_channels || line.starts_with('#') {
            break;
        }
        let Some(file) = line.split_whitespace().next() else {
            break;
        };
        if !files.iter().any(|f| f == file) {
            files.push(file.to_string());
        }
    }

    files
}

/// Value of the last line starting with `tag`, trimmed
///
/// Later lines override earlier ones.
///
/// ```rust
/// use ecgchallenge::header::get_variable;
///
/// let text = "r 0 500 5000\n#Age: 40\n#Age: 41\n";
/// assert_eq!(get_variable(text, "#Age:").as_deref(), Some("41"));
/// assert_eq!(get_variable(text, "#Sex:"), None);
/// ```
pub fn get_variable(text: &str, tag: &str) -> Option<String> {
    let mut variable = None;
    for line in text.split('\n') {
        if let Some(rest) = line.strip_prefix(tag) {
            variable = Some(rest.trim().to_string());
        }
    }
    variable
}

/// Values of every line starting with `tag`, split on `sep` and trimmed
///
/// Unlike [`get_variable`], values accumulate across all matching lines.
///
/// ```rust
/// use ecgchallenge::header::get_variables;
///
/// let text = "r 0 500 5000\n#Dx: AFIB, PVC\n#Dx: NORM\n";
/// assert_eq!(get_variables(text, "#Dx:", ","), vec!["AFIB", "PVC", "NORM"]);
/// ```
pub fn get_variables(text: &str, tag: &str, sep: &str) -> Vec<String> {
    collect_variables(text.split('\n'), tag, sep)
}

fn collect_variables<'a, I>(lines: I, tag: &str, sep: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut variables = Vec::new();
    for line in lines {
        if let Some(rest) = line.strip_prefix(tag) {
            variables.extend(rest.trim().split(sep).map(|v| v.trim().to_string()));
        }
    }
    variables
}

/// Diagnoses listed under `#Dx:`
///
/// # Errors
///
/// * `ChallengeError::MissingDiagnosis` - the header carries no diagnosis,
///   as is the case for held-out records
///
/// # Examples
///
/// ```rust
/// use ecgchallenge::{header::get_diagnoses, doctest_utils, ChallengeError};
///
/// let text = doctest_utils::sample_header();
/// assert_eq!(get_diagnoses(&text)?, vec!["NORM"]);
///
/// let unlabeled = doctest_utils::sample_unlabeled_header();
/// assert!(matches!(get_diagnoses(&unlabeled), Err(ChallengeError::MissingDiagnosis)));
/// # Ok::<(), ChallengeError>(())
/// ```
pub fn get_diagnoses(text: &str) -> Result<Vec<String>> {
    let diagnoses = get_variables(text, DIAGNOSIS_TAG, VARIABLE_SEPARATOR);
    if diagnoses.is_empty() {
        return Err(ChallengeError::MissingDiagnosis);
    }
    Ok(diagnoses)
}

/// Same as [`get_diagnoses`]
pub fn get_diagnosis(text: &str) -> Result<Vec<String>> {
    get_diagnoses(text)
}

/// Image files listed under `#Image:`, possibly none
pub fn get_images(text: &str) -> Vec<String> {
    get_variables(text, IMAGE_TAG, VARIABLE_SEPARATOR)
}

/// Same as [`get_images`]
pub fn get_image(text: &str) -> Vec<String> {
    get_images(text)
}

/// Returns a copy of the header text with a `#Dx:` line appended
///
/// ```rust
/// use ecgchallenge::header::{append_diagnoses, get_diagnoses};
///
/// let text = append_diagnoses("r 0 500 5000\n", &["AFIB", "PVC"]);
/// assert_eq!(text, "r 0 500 5000\n#Dx: AFIB, PVC\n");
/// assert_eq!(get_diagnoses(&text).unwrap(), vec!["AFIB", "PVC"]);
/// ```
pub fn append_diagnoses<S: AsRef<str>>(text: &str, diagnoses: &[S]) -> String {
    let joined = diagnoses
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(", ");
    format!("{}{} {}\n", text, DIAGNOSIS_TAG, joined)
}

/// 注释标签：首个字段直到第一个冒号（含），否则整个字段
fn annotation_tag(line: &str) -> &str {
    let token = line.split_whitespace().next().unwrap_or(line);
    match token.find(':') {
        Some(pos) => &token[..=pos],
        None => token,
    }
}

impl HeaderRecord {
    /// Parses header text with the default [`HeaderConfig`]
    ///
    /// # Errors
    ///
    /// * `ChallengeError::InvalidFormat` - a channel line is missing, has
    ///   fewer than 9 fields, or carries a non-numeric gain or baseline
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ecgchallenge::{doctest_utils, HeaderRecord};
    ///
    /// let header = HeaderRecord::parse(&doctest_utils::sample_header())?;
    /// assert_eq!(header.record_name, "00001_lr");
    /// assert_eq!(header.num_signals, Some(3));
    /// assert_eq!(header.channel_names(), vec!["I", "II", "V1"]);
    /// assert_eq!(header.annotation("#Dx:"), Some(&["NORM".to_string()][..]));
    /// # Ok::<(), ecgchallenge::ChallengeError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, &HeaderConfig::default())
    }

    pub fn parse_with(text: &str, cfg: &HeaderConfig) -> Result<Self> {
        let record_name = record_name(text);
        let num_signals = num_signals(text);
        if num_signals.is_none() {
            warn!("record {:?}: signal count is not an integer, no channels parsed", record_name);
        }

        let channels = parse_channels(text, cfg)?;

        let mut annotations: Vec<(String, Vec<String>)> = Vec::new();
        let mut comments = Vec::new();
        for line in text.split('\n').skip(channels.len() + 1) {
            if !line.starts_with('#') {
                continue;
            }
            comments.push(line.to_string());
            let tag = annotation_tag(line);
            let values = line[tag.len()..]
                .trim()
                .split(cfg.separator.as_str())
                .map(|v| v.trim().to_string());
            match annotations.iter_mut().find(|(t, _)| t == tag) {
                Some((_, existing)) => existing.extend(values),
                None => annotations.push((tag.to_string(), values.collect())),
            }
        }

        let header = HeaderRecord {
            record_name,
            num_signals,
            sampling_frequency: sampling_frequency(text),
            counter_frequency: counter_frequency(text),
            num_samples: num_samples(text),
            base_time: base_time(text),
            base_date: base_date(text),
            channels,
            signal_files: signal_files(text),
            annotations,
            comments,
        };

        debug!(
            "parsed header {:?}: {} channels, {} files, {} annotation tags",
            header.record_name,
            header.channels.len(),
            header.signal_files.len(),
            header.annotations.len()
        );

        Ok(header)
    }

    /// Diagnoses on every comment line starting with the configured tag
    ///
    /// # Errors
    ///
    /// * `ChallengeError::MissingDiagnosis` - no line carries the tag
    pub fn diagnoses(&self, cfg: &HeaderConfig) -> Result<Vec<String>> {
        let diagnoses = collect_variables(
            self.comments.iter().map(String::as_str),
            &cfg.diagnosis_tag,
            &cfg.separator,
        );
        if diagnoses.is_empty() {
            return Err(ChallengeError::MissingDiagnosis);
        }
        Ok(diagnoses)
    }

    /// Images on every comment line starting with the configured tag, possibly none
    pub fn images(&self, cfg: &HeaderConfig) -> Vec<String> {
        collect_variables(self.comments.iter().map(String::as_str), &cfg.image_tag, &cfg.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "rec01/2 2 500/1000(0) 5000 08:30:00 14/03/2021\n\
rec01.dat 16x2:3+24 1000.0(5)/uV 16 0 -12 3012 0 I\n\
rec01.dat 16 200 16 0 7 44 0 aVR\n\
#Dx: AFIB\n\
#Image: rec01-0.png, rec01-1.png\n";

    #[test]
    fn test_record_line() {
        assert_eq!(record_name(HEADER), "rec01");
        assert_eq!(num_signals(HEADER), Some(2));
        assert_eq!(sampling_frequency(HEADER), Some(500.0));
        assert_eq!(counter_frequency(HEADER), Some(1000.0));
        assert_eq!(num_samples(HEADER), Some(5000));
        assert_eq!(base_time(HEADER), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(base_date(HEADER), NaiveDate::from_ymd_opt(2021, 3, 14));
    }

    #[test]
    fn test_unknown_record_fields() {
        let text = "rec x abc 12.5\n";
        assert_eq!(num_signals(text), None);
        assert_eq!(sampling_frequency(text), None);
        assert_eq!(num_samples(text), None);
        assert_eq!(base_time(text), None);
        assert_eq!(base_date(text), None);

        assert_eq!(num_samples("r 0 500 1e20\n"), None);
    }

    #[test]
    fn test_strip_format() {
        assert_eq!(strip_format("16"), "16");
        assert_eq!(strip_format("212x4"), "212");
        assert_eq!(strip_format("16:3"), "16");
        assert_eq!(strip_format("16+24"), "16");
        assert_eq!(strip_format("16x2:3+24"), "16");
    }

    #[test]
    fn test_channel_fields() {
        assert_eq!(signal_formats(HEADER).unwrap(), vec!["16", "16"]);
        assert_eq!(adc_gains(HEADER).unwrap(), vec![1000.0, 200.0]);
        // 无括号时基线取增益字段的整数值
        assert_eq!(baselines(HEADER).unwrap(), vec![5, 200]);
        assert_eq!(signal_units(HEADER).unwrap(), vec!["uV", "mV"]);
        assert_eq!(signal_names(HEADER).unwrap(), vec!["I", "aVR"]);
    }

    #[test]
    fn test_signal_files() {
        assert_eq!(signal_files(HEADER), vec!["rec01.dat"]);
        assert!(signal_files("#comment\nrec 1 500 10\n").is_empty());
        assert!(signal_files("rec 0 500 10\n#Dx: A\n").is_empty());
    }

    #[test]
    fn test_short_channel_line_is_rejected() {
        let text = "rec 1 500 10\nrec.dat 16 200/mV 16 0\n";
        assert!(matches!(HeaderRecord::parse(text), Err(ChallengeError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_channel_lines_are_rejected() {
        let text = "rec 3 500 10\nrec.dat 16 200/mV 16 0 0 0 0 I";
        assert!(matches!(HeaderRecord::parse(text), Err(ChallengeError::InvalidFormat(_))));
    }

    #[test]
    fn test_annotation_tag() {
        assert_eq!(annotation_tag("#Dx: AFIB"), "#Dx:");
        assert_eq!(annotation_tag("#Image:a.png"), "#Image:");
        assert_eq!(annotation_tag("# free comment"), "#");
    }

    #[test]
    fn test_parse_collects_annotations() {
        let header = HeaderRecord::parse(HEADER).unwrap();
        assert_eq!(header.channels.len(), 2);
        assert_eq!(header.channels[0].baseline, 5);
        assert_eq!(header.channels[0].adc_resolution, Some(16));
        assert_eq!(header.channels[1].checksum, Some(44));
        assert_eq!(header.annotation("#Dx:"), Some(&["AFIB".to_string()][..]));
        assert_eq!(
            header.images(&HeaderConfig::default()),
            vec!["rec01-0.png", "rec01-1.png"]
        );
        assert_eq!(header.duration_seconds(), Some(10.0));
    }

    #[test]
    fn test_tag_without_colon_matches_by_prefix() {
        let text = "r 0 500 10\n#Dx: AFIB\n#Img-0.png\n";
        let cfg = HeaderConfig {
            diagnosis_tag: "#Dx".to_string(),
            image_tag: "#Img".to_string(),
            ..HeaderConfig::default()
        };
        let header = HeaderRecord::parse_with(text, &cfg).unwrap();

        assert_eq!(get_variables(text, "#Dx", ","), vec![": AFIB"]);
        assert_eq!(header.diagnoses(&cfg).unwrap(), get_variables(text, "#Dx", ","));
        assert_eq!(header.images(&cfg), vec!["-0.png"]);
        assert_eq!(header.comments, vec!["#Dx: AFIB", "#Img-0.png"]);
    }
}
