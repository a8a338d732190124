//! The four horsemen: fixed categories of financial pressure
//!
//! Plans carry free-text labels ("Taxes", "debt", "Insurance"). These are
//! normalized onto the closed [`Horseman`] set. Normalization is total: every
//! label maps to either a recognized horseman or an explicit
//! [`HorsemanLabel::Unrecognized`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label used in reports for a plan with no recognized horseman
pub const UNKNOWN_LABEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horseman {
    Interest,
    Taxes,
    Insurance,
    Education,
}

impl Horseman {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interest => "interest",
            Self::Taxes => "taxes",
            Self::Insurance => "insurance",
            Self::Education => "education",
        }
    }

    /// All horsemen in report order
    pub fn all() -> &'static [Horseman] {
        &[
            Self::Interest,
            Self::Taxes,
            Self::Insurance,
            Self::Education,
        ]
    }
}

impl fmt::Display for Horseman {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Horseman {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match HorsemanLabel::parse(s) {
            HorsemanLabel::Recognized(h) => Ok(h),
            HorsemanLabel::Unrecognized(raw) => Err(format!("Unknown horseman: {}", raw)),
        }
    }
}

/// Result of normalizing one free-text label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HorsemanLabel {
    Recognized(Horseman),
    Unrecognized(String),
}

impl HorsemanLabel {
    /// Case-insensitive; `debt` and `tax` are accepted as synonyms
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "interest" | "debt" => Self::Recognized(Horseman::Interest),
            "taxes" | "tax" => Self::Recognized(Horseman::Taxes),
            "insurance" => Self::Recognized(Horseman::Insurance),
            "education" => Self::Recognized(Horseman::Education),
            _ => Self::Unrecognized(label.to_string()),
        }
    }

    pub fn horseman(&self) -> Option<Horseman> {
        match self {
            Self::Recognized(h) => Some(*h),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Recognized horsemen for a set of labels, deduplicated in first-seen order
pub fn normalize_labels<S: AsRef<str>>(labels: &[S]) -> Vec<Horseman> {
    let mut out = Vec::new();
    for label in labels {
        if let Some(h) = HorsemanLabel::parse(label.as_ref()).horseman() {
            if !out.contains(&h) {
                out.push(h);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            HorsemanLabel::parse("Taxes"),
            HorsemanLabel::Recognized(Horseman::Taxes)
        );
        assert_eq!(
            HorsemanLabel::parse("  INSURANCE "),
            HorsemanLabel::Recognized(Horseman::Insurance)
        );
        assert_eq!(
            HorsemanLabel::parse("education"),
            HorsemanLabel::Recognized(Horseman::Education)
        );
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(HorsemanLabel::parse("debt").horseman(), Some(Horseman::Interest));
        assert_eq!(HorsemanLabel::parse("Tax").horseman(), Some(Horseman::Taxes));
    }

    #[test]
    fn test_unrecognized_keeps_original_text() {
        assert_eq!(
            HorsemanLabel::parse("Gardening"),
            HorsemanLabel::Unrecognized("Gardening".to_string())
        );
        assert!(HorsemanLabel::parse("").horseman().is_none());
        assert!("Gardening".parse::<Horseman>().is_err());
    }

    #[test]
    fn test_normalize_labels_dedupes() {
        let labels = ["Taxes", "debt", "tax", "Gardening"];
        assert_eq!(
            normalize_labels(&labels),
            vec![Horseman::Taxes, Horseman::Interest]
        );
        assert!(normalize_labels::<&str>(&[]).is_empty());
    }
}
