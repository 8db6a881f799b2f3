//! Scoring metrics for classifier outputs and reconstructed signals.
use std::collections::BTreeSet;

use log::debug;
use ndarray::{Array2, Array3, ArrayView, Dimension, Zip};

use crate::error::{ChallengeError, Result};
use crate::utils::is_nan;

/// Macro F-measure together with its per-class breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct FMeasure {
    /// Mean of the finite per-class scores, NaN when none is finite
    pub macro_f_measure: f64,
    /// One score per class, NaN for a class that never occurs
    pub per_class_f_measure: Vec<f64>,
    /// Sorted class names, aligned with `per_class_f_measure`
    pub classes: Vec<String>,
}

/// Builds the one-hot encoding of `data` for `classes`.
///
/// A token matches a class when the two are equal, or when both represent NaN.
///
/// ```rust
/// use ecgchallenge::metrics::compute_one_hot_encoding;
///
/// let encoded = compute_one_hot_encoding(&[vec!["A", "nan"]], &["A", "B", "NaN"]);
/// assert_eq!(encoded.row(0).to_vec(), vec![true, false, true]);
/// ```
pub fn compute_one_hot_encoding<S, C>(data: &[Vec<S>], classes: &[C]) -> Array2<bool>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    let mut encoding = Array2::from_elem((data.len(), classes.len()), false);
    for (i, tokens) in data.iter().enumerate() {
        for token in tokens {
            let token = token.as_ref();
            for (j, class) in classes.iter().enumerate() {
                let class = class.as_ref();
                if token == class || (is_nan(token) && is_nan(class)) {
                    encoding[[i, j]] = true;
                }
            }
        }
    }
    encoding
}

/// Builds the one-vs-rest confusion matrix of every class.
///
/// The result has shape `[classes, 2, 2]`: `[k, 0, 0]` counts true
/// positives, `[k, 0, 1]` false positives, `[k, 1, 0]` false negatives and
/// `[k, 1, 1]` true negatives.
///
/// # Errors
///
/// * `ChallengeError::ShapeMismatch` - `labels` and `outputs` differ in shape,
///   or their width differs from the number of classes
pub fn compute_one_vs_rest_confusion_matrix<C: AsRef<str>>(
    labels: &Array2<bool>,
    outputs: &Array2<bool>,
    classes: &[C],
) -> Result<Array3<usize>> {
    if labels.shape() != outputs.shape() {
        return Err(ChallengeError::ShapeMismatch {
            expected: labels.shape().to_vec(),
            found: outputs.shape().to_vec(),
        });
    }
    if labels.ncols() != classes.len() {
        return Err(ChallengeError::ShapeMismatch {
            expected: vec![labels.nrows(), classes.len()],
            found: labels.shape().to_vec(),
        });
    }

    let mut confusion = Array3::<usize>::zeros((classes.len(), 2, 2));
    Zip::indexed(labels).and(outputs).for_each(|(_, j), &label, &output| {
        let (row, col) = match (label, output) {
            (true, true) => (0, 0),
            (false, true) => (0, 1),
            (true, false) => (1, 0),
            (false, false) => (1, 1),
        };
        confusion[[j, row, col]] += 1;
    });

    Ok(confusion)
}

/// Computes the macro F-measure of `outputs` against `labels`.
///
/// Classes are the sorted union of every token in both collections.
///
/// # Errors
///
/// * `ChallengeError::ShapeMismatch` - the two collections hold a different
///   number of instances
///
/// # Examples
///
/// ```rust
/// use ecgchallenge::metrics::compute_f_measure;
///
/// let labels = vec![vec!["A"], vec!["B"]];
/// let outputs = vec![vec!["A"], vec!["A"]];
/// let f = compute_f_measure(&labels, &outputs)?;
///
/// assert_eq!(f.classes, vec!["A", "B"]);
/// assert!((f.per_class_f_measure[0] - 2.0 / 3.0).abs() < 1e-12);
/// assert_eq!(f.per_class_f_measure[1], 0.0);
/// assert!((f.macro_f_measure - 1.0 / 3.0).abs() < 1e-12);
/// # Ok::<(), ecgchallenge::ChallengeError>(())
/// ```
pub fn compute_f_measure<S: AsRef<str>>(labels: &[Vec<S>], outputs: &[Vec<S>]) -> Result<FMeasure> {
    if labels.len() != outputs.len() {
        return Err(ChallengeError::ShapeMismatch {
            expected: vec![labels.len()],
            found: vec![outputs.len()],
        });
    }

    let classes: Vec<String> = labels
        .iter()
        .chain(outputs)
        .flatten()
        .map(|token| token.as_ref())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let encoded_labels = compute_one_hot_encoding(labels, classes.as_slice());
    let encoded_outputs = compute_one_hot_encoding(outputs, classes.as_slice());
    let confusion =
        compute_one_vs_rest_confusion_matrix(&encoded_labels, &encoded_outputs, classes.as_slice())?;

    let per_class_f_measure: Vec<f64> = confusion
        .outer_iter()
        .map(|a| {
            let (tp, fp, fn_) = (a[[0, 0]] as f64, a[[0, 1]] as f64, a[[1, 0]] as f64);
            if 2.0 * tp + fp + fn_ > 0.0 {
                2.0 * tp / (2.0 * tp + fp + fn_)
            } else {
                f64::NAN
            }
        })
        .collect();

    let finite: Vec<f64> = per_class_f_measure.iter().copied().filter(|f| f.is_finite()).collect();
    let macro_f_measure = if finite.is_empty() {
        f64::NAN
    } else {
        finite.iter().sum::<f64>() / finite.len() as f64
    };

    debug!(
        "macro F-measure {:.4} over {} classes ({} instances)",
        macro_f_measure,
        classes.len(),
        labels.len()
    );

    Ok(FMeasure {
        macro_f_measure,
        per_class_f_measure,
        classes,
    })
}

/// Computes the signal-to-noise ratio in dB of `output` against `label`.
///
/// NaN samples in either signal count as zero. A perfect reconstruction has
/// no noise energy and scores `+inf`. Returns `Ok(None)` when either signal
/// is absent.
///
/// # Errors
///
/// * `ChallengeError::ShapeMismatch` - the two signals differ in shape
///
/// # Examples
///
/// ```rust
/// use ecgchallenge::metrics::compute_snr;
/// use ndarray::array;
///
/// let label = array![1.0, 1.0, 1.0, 1.0];
/// let snr = compute_snr(Some(label.view()), Some(label.view()))?;
/// assert_eq!(snr, Some(f64::INFINITY));
/// # Ok::<(), ecgchallenge::ChallengeError>(())
/// ```
pub fn compute_snr<D: Dimension>(
    label: Option<ArrayView<'_, f64, D>>,
    output: Option<ArrayView<'_, f64, D>>,
) -> Result<Option<f64>> {
    let (Some(label), Some(output)) = (label, output) else {
        return Ok(None);
    };

    if label.shape() != output.shape() {
        return Err(ChallengeError::ShapeMismatch {
            expected: label.shape().to_vec(),
            found: output.shape().to_vec(),
        });
    }

    let mut signal_energy = 0.0;
    let mut noise_energy = 0.0;
    Zip::from(&label).and(&output).for_each(|&l, &o| {
        let l = if l.is_nan() { 0.0 } else { l };
        let o = if o.is_nan() { 0.0 } else { o };
        signal_energy += l * l;
        noise_energy += (o - l) * (o - l);
    });

    let snr = if noise_energy > 0.0 {
        10.0 * (signal_energy / noise_energy).log10()
    } else {
        f64::INFINITY
    };

    Ok(Some(snr))
}
