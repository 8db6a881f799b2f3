//! Channel alignment between signal matrices.
//!
//! Signals are `[samples, channels]`. Both functions take an optional view and
//! return `None` for an absent signal, so a record without a signal file flows
//! through unchanged.
use std::collections::HashSet;
use std::ops::AddAssign;

use log::debug;
use ndarray::{s, Array2, ArrayView2, CowArray, Ix2};

fn fold_channel(name: &str) -> String {
    name.trim().to_lowercase()
}

fn all_unique<S: AsRef<str>>(names: &[S]) -> bool {
    let mut seen = HashSet::with_capacity(names.len());
    names.iter().all(|n| seen.insert(n.as_ref()))
}

/// Reorders the columns of `signal` from `input_channels` to `output_channels`.
///
/// Names are compared trimmed and case-insensitively. Every input column whose
/// name matches an output channel is added into that output column, so
/// duplicated input names are merged by summation. Output channels with no
/// match stay zero. When both name lists are identical and free of duplicates
/// the input view is returned as is.
///
/// ```rust
/// use ecgchallenge::align::reorder_signal;
/// use ndarray::array;
///
/// let signal = array![[1.0, 2.0], [3.0, 4.0]];
/// let out = reorder_signal(Some(signal.view()), &["I", "II"], &["ii", "V1", "I"]).unwrap();
/// assert_eq!(out, array![[2.0, 0.0, 1.0], [4.0, 0.0, 3.0]]);
/// ```
pub fn reorder_signal<'a, A, S, T>(
    signal: Option<ArrayView2<'a, A>>,
    input_channels: &[S],
    output_channels: &[T],
) -> Option<CowArray<'a, A, Ix2>>
where
    A: Clone + Default + AddAssign,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let signal = signal?;

    let same_order = input_channels.len() == output_channels.len()
        && input_channels
            .iter()
            .zip(output_channels)
            .all(|(i, o)| i.as_ref() == o.as_ref());
    if same_order && all_unique(output_channels) {
        return Some(CowArray::from(signal));
    }

    let inputs: Vec<String> = input_channels.iter().map(|c| fold_channel(c.as_ref())).collect();
    let outputs: Vec<String> = output_channels.iter().map(|c| fold_channel(c.as_ref())).collect();

    let mut reordered = Array2::from_elem((signal.nrows(), outputs.len()), A::default());
    for (i, output) in outputs.iter().enumerate() {
        for (column, input) in signal.columns().into_iter().zip(&inputs) {
            if input == output {
                let mut target = reordered.column_mut(i);
                target += &column;
            }
        }
    }

    debug!("reordered {} channels into {}", inputs.len(), outputs.len());
    Some(CowArray::from(reordered))
}

/// Zero-pads or truncates `signal` to `num_samples` rows.
///
/// Truncation returns a view of the leading rows; padding allocates.
///
/// ```rust
/// use ecgchallenge::align::trim_signal;
/// use ndarray::array;
///
/// let signal = array![[1, 2], [3, 4], [5, 6]];
/// assert_eq!(trim_signal(Some(signal.view()), 2).unwrap(), array![[1, 2], [3, 4]]);
/// assert_eq!(
///     trim_signal(Some(signal.view()), 4).unwrap(),
///     array![[1, 2], [3, 4], [5, 6], [0, 0]]
/// );
/// ```
pub fn trim_signal<A>(signal: Option<ArrayView2<'_, A>>, num_samples: usize) -> Option<CowArray<'_, A, Ix2>>
where
    A: Clone + Default,
{
    let signal = signal?;
    let (current, channels) = signal.dim();

    let trimmed = if current == num_samples {
        CowArray::from(signal)
    } else if current < num_samples {
        let mut padded = Array2::from_elem((num_samples, channels), A::default());
        padded.slice_mut(s![..current, ..]).assign(&signal);
        CowArray::from(padded)
    } else {
        CowArray::from(signal.slice_move(s![..num_samples, ..]))
    };

    Some(trimmed)
}
