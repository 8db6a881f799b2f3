//! # ecgchallenge
//!
//! Header parsing, channel alignment and scoring for ECG challenge records.
//!
//! Records are described by WFDB-style `.hea` header text. This library parses
//! that text, aligns signal matrices recorded in different channel orders or
//! lengths, and computes the metrics used to score classification and signal
//! reconstruction submissions.
//!
//! ## Quick Start
//!
//! ### Parsing a header
//!
//! ```rust
//! use ecgchallenge::{HeaderRecord, header, Result};
//!
//! fn main() -> Result<()> {
//!     let text = "00001_lr 2 100 1000\n\
//!                 00001_lr.dat 16 1000.0(0)/mV 16 0 -119 1508 0 I\n\
//!                 00001_lr.dat 16 1000.0(0)/mV 16 0 -55 723 0 II\n\
//!                 #Dx: NORM, AFIB\n";
//!
//!     let record = HeaderRecord::parse(text)?;
//!     println!("Record: {}", record.record_name);
//!     println!("Sampling frequency: {:?} Hz", record.sampling_frequency);
//!
//!     for channel in &record.channels {
//!         println!("  {} format {} gain {} {}", channel.name, channel.format,
//!             channel.adc_gain, channel.units);
//!     }
//!
//!     // Diagnoses accumulate across every `#Dx:` line
//!     let diagnoses = header::get_diagnoses(text)?;
//!     assert_eq!(diagnoses, vec!["NORM", "AFIB"]);
//!     Ok(())
//! }
//! ```
//!
//! ### Aligning a signal to a reference layout
//!
//! ```rust
//! use ecgchallenge::align::{reorder_signal, trim_signal};
//! use ndarray::array;
//!
//! // [samples, channels] in the submission's channel order
//! let submitted = array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]];
//!
//! let reordered = reorder_signal(Some(submitted.view()), &["II", "I"], &["I", "II"]).unwrap();
//! let trimmed = trim_signal(Some(reordered.view()), 4).unwrap();
//! assert_eq!(trimmed.dim(), (4, 2));
//! assert_eq!(trimmed[[0, 0]], 0.2);
//! assert_eq!(trimmed[[3, 1]], 0.0);
//! ```
//!
//! ### Scoring
//!
//! ```rust
//! use ecgchallenge::metrics::{compute_f_measure, compute_snr};
//! use ndarray::array;
//!
//! let labels = vec![vec!["NORM"], vec!["AFIB"]];
//! let outputs = vec![vec!["NORM"], vec!["NORM"]];
//! let f = compute_f_measure(&labels, &outputs).unwrap();
//! println!("macro F = {:.3} over {:?}", f.macro_f_measure, f.classes);
//!
//! let reference = array![[1.0, 2.0], [3.0, 4.0]];
//! let reconstructed = array![[1.1, 2.0], [3.0, 3.9]];
//! let snr = compute_snr(Some(reference.view()), Some(reconstructed.view())).unwrap();
//! assert!(snr.unwrap() > 20.0);
//! ```

pub mod error;
pub mod types;
pub mod utils;
pub mod config;
pub mod header;
pub mod align;
pub mod metrics;
pub mod io;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{ChallengeError, Result};
pub use types::{ChannelSpec, HeaderRecord, Value};
pub use config::HeaderConfig;
pub use utils::{cast, is_finite_number, is_integer, is_nan, is_number};
pub use metrics::FMeasure;

// Header conventions
pub const DIAGNOSIS_TAG: &str = "#Dx:";
pub const IMAGE_TAG: &str = "#Image:";
pub const VARIABLE_SEPARATOR: &str = ",";
pub const DEFAULT_UNITS: &str = "mV";
pub const HEADER_EXTENSION: &str = "hea";
/// Largest magnitude written in format 16 (2^15 - 1)
pub const FORMAT16_LIMIT: i16 = i16::MAX;

/// Library version
///
/// Returns the current version of the ecgchallenge library.
///
/// # Examples
///
/// ```rust
/// let version = ecgchallenge::version();
/// assert!(!version.is_empty());
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
