//! Header conventions.
//!
//! [`HeaderConfig`] names the annotation tags and defaults the parser relies
//! on. [`HeaderConfig::default()`] matches the challenge header files.

use crate::{DEFAULT_UNITS, DIAGNOSIS_TAG, IMAGE_TAG, VARIABLE_SEPARATOR};

/// Tag names and defaults used when parsing header text.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use ecgchallenge::HeaderConfig;
///
/// let cfg = HeaderConfig {
///     separator: ";".to_string(),
///     ..HeaderConfig::default()
/// };
/// assert_eq!(cfg.diagnosis_tag, "#Dx:");
/// ```
#[derive(Debug, Clone)]
pub struct HeaderConfig {
    /// Prefix of the annotation lines holding diagnoses.
    ///
    /// Default: `"#Dx:"`.
    pub diagnosis_tag: String,

    /// Prefix of the annotation lines holding image file names.
    ///
    /// Default: `"#Image:"`.
    pub image_tag: String,

    /// Separator between values on one annotation line.
    ///
    /// Default: `","`.
    pub separator: String,

    /// Units assigned to a channel whose gain field carries no `/units` part.
    ///
    /// Default: `"mV"`.
    pub default_units: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            diagnosis_tag: DIAGNOSIS_TAG.to_string(),
            image_tag: IMAGE_TAG.to_string(),
            separator: VARIABLE_SEPARATOR.to_string(),
            default_units: DEFAULT_UNITS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_challenge_headers() {
        let cfg = HeaderConfig::default();
        assert_eq!(cfg.diagnosis_tag, "#Dx:");
        assert_eq!(cfg.image_tag, "#Image:");
        assert_eq!(cfg.separator, ",");
        assert_eq!(cfg.default_units, "mV");
    }
}
