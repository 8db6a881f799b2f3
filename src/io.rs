//! Record-level text I/O around the header parser.
//!
//! A record is addressed by its path without extension (`data/00001_lr`);
//! its header lives next to it as `<record>.hea`.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use ndarray::{Array2, ArrayView2};

use crate::error::{ChallengeError, Result};
use crate::header::{append_diagnoses, get_diagnoses, get_images, signal_files};
use crate::types::HeaderRecord;
use crate::{FORMAT16_LIMIT, HEADER_EXTENSION};

/// Header file of a record: `<record>.hea`, unless the path already ends in `.hea`
pub fn header_file<P: AsRef<Path>>(record: P) -> PathBuf {
    let record = record.as_ref();
    if record.extension().map_or(false, |ext| ext == HEADER_EXTENSION) {
        return record.to_path_buf();
    }
    // 记录名可能含点号，不能用 set_extension
    let mut path = record.as_os_str().to_os_string();
    path.push(".");
    path.push(HEADER_EXTENSION);
    PathBuf::from(path)
}

/// Reads a whole text file
///
/// # Errors
///
/// * `ChallengeError::FileNotFound` - the file does not exist
/// * `ChallengeError::Io` - any other read failure
pub fn load_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ChallengeError::FileNotFound(format!("{}: {}", path.display(), e)),
        _ => ChallengeError::Io(e),
    })
}

/// Writes `text` to `path`, replacing any existing content
pub fn save_text<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    fs::write(path.as_ref(), text)?;
    debug!("wrote {} bytes to {}", text.len(), path.as_ref().display());
    Ok(())
}

/// Loads and parses the header of a record
///
/// # Examples
///
/// ```rust
/// use ecgchallenge::{io, doctest_utils};
///
/// let dir = std::env::temp_dir().join("ecgchallenge_doc_load_header");
/// std::fs::create_dir_all(&dir)?;
/// let record = dir.join("00001_lr");
/// io::save_text(io::header_file(&record), &doctest_utils::sample_header())?;
///
/// let header = io::load_header(&record)?;
/// assert_eq!(header.num_signals, Some(3));
/// assert_eq!(header.signal_files, vec!["00001_lr.dat"]);
///
/// # std::fs::remove_dir_all(&dir).ok();
/// # Ok::<(), ecgchallenge::ChallengeError>(())
/// ```
pub fn load_header<P: AsRef<Path>>(record: P) -> Result<HeaderRecord> {
    let text = load_text(header_file(record))?;
    HeaderRecord::parse(&text)
}

/// Diagnoses recorded in a record's header
///
/// # Errors
///
/// * `ChallengeError::MissingDiagnosis` - the header lists no diagnosis
pub fn load_diagnoses<P: AsRef<Path>>(record: P) -> Result<Vec<String>> {
    get_diagnoses(&load_text(header_file(record))?)
}

/// Appends a `#Dx:` line to a record's header file
pub fn save_diagnoses<P: AsRef<Path>, S: AsRef<str>>(record: P, diagnoses: &[S]) -> Result<()> {
    let path = header_file(record);
    let text = load_text(&path)?;
    save_text(&path, &append_diagnoses(&text, diagnoses))
}

/// Signal files referenced by a record's header
pub fn record_signal_files<P: AsRef<Path>>(record: P) -> Result<Vec<String>> {
    Ok(signal_files(&load_text(header_file(record))?))
}

/// Image files listed in a record's header
pub fn record_image_files<P: AsRef<Path>>(record: P) -> Result<Vec<String>> {
    Ok(get_images(&load_text(header_file(record))?))
}

/// Converts a signal to 16-bit samples for writing.
///
/// Every channel must use format `16`. Values are clamped to
/// `[-32767, 32767]` and truncated toward zero; NaN becomes 0.
///
/// # Errors
///
/// * `ChallengeError::UnsupportedFormat` - some channel uses another format;
///   the message lists the distinct formats, sorted
///
/// # Examples
///
/// ```rust
/// use ecgchallenge::io::to_format16;
/// use ndarray::array;
///
/// let signal = array![[1.9, -40000.0], [f64::NAN, 40000.0]];
/// let samples = to_format16(signal.view(), &["16", "16"])?;
/// assert_eq!(samples, array![[1_i16, -32767], [0, 32767]]);
///
/// assert!(to_format16(signal.view(), &["16", "212"]).is_err());
/// # Ok::<(), ecgchallenge::ChallengeError>(())
/// ```
pub fn to_format16<S: AsRef<str>>(signal: ArrayView2<'_, f64>, formats: &[S]) -> Result<Array2<i16>> {
    if !formats.iter().all(|f| f.as_ref() == "16") {
        let mut distinct: Vec<&str> = formats.iter().map(AsRef::as_ref).collect();
        distinct.sort_unstable();
        distinct.dedup();
        return Err(ChallengeError::UnsupportedFormat(distinct.join(", ")));
    }

    let limit = FORMAT16_LIMIT as f64;
    let clipped = signal.iter().filter(|v| v.abs() > limit).count();
    if clipped > 0 {
        warn!("clamping {} samples outside the 16-bit range", clipped);
    }

    Ok(signal.mapv(|v| v.clamp(-limit, limit) as i16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_file() {
        assert_eq!(header_file("data/00001_lr"), PathBuf::from("data/00001_lr.hea"));
        assert_eq!(header_file("data/00001_lr.hea"), PathBuf::from("data/00001_lr.hea"));
        assert_eq!(header_file("data/rec.v2"), PathBuf::from("data/rec.v2.hea"));
    }

    #[test]
    fn test_unsupported_format_lists_sorted_formats() {
        let signal = Array2::<f64>::zeros((2, 3));
        match to_format16(signal.view(), &["212", "16", "16", "8"]) {
            Err(ChallengeError::UnsupportedFormat(msg)) => assert_eq!(msg, "16, 212, 8"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_text("definitely/not/here.hea"),
            Err(ChallengeError::FileNotFound(_))
        ));
    }
}
