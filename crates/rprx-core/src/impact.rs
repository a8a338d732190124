//! Impact string parser
//!
//! Turns a free-text impact description from a strategy ("$500-$3,000",
//! "$1,200/month", "thousands") into an annual [`ImpactRange`]. This is a
//! best-effort heuristic: it never fails, falling back to keyword ranges and
//! finally to the configured default.

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::defaults::EstimatorDefaults;
use crate::error::Result;
use crate::models::ImpactRange;

/// Which rule produced a parsed range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactBasis {
    /// An explicit `N - M` or `N to M` range
    Range,
    /// A single amount widened by the configured factors
    Single,
    /// "thousands" keyword
    Thousands,
    /// "hundreds" keyword
    Hundreds,
    /// Nothing recognizable
    Fallback,
}

impl ImpactBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Range => "range",
            Self::Single => "single",
            Self::Thousands => "thousands",
            Self::Hundreds => "hundreds",
            Self::Fallback => "fallback",
        }
    }
}

/// A parsed range plus how it was derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedImpact {
    pub range: ImpactRange,
    pub basis: ImpactBasis,
    /// Amounts were quoted per month and annualized
    pub monthly: bool,
}

/// Parser for free-text impact descriptions
pub struct ImpactParser {
    defaults: EstimatorDefaults,
    range_re: Regex,
    number_re: Regex,
    monthly_re: Regex,
}

impl ImpactParser {
    pub fn new(defaults: EstimatorDefaults) -> Result<Self> {
        Ok(Self {
            defaults,
            range_re: Regex::new(r"(\d+(?:\.\d+)?)\s*(?:-|–|to)\s*(\d+(?:\.\d+)?)")?,
            number_re: Regex::new(r"\d+(?:\.\d+)?")?,
            monthly_re: Regex::new(r"(?:/\s*|\bper\s+)mo(?:nth)?\b")?,
        })
    }

    pub fn defaults(&self) -> &EstimatorDefaults {
        &self.defaults
    }

    /// Parse a description into an annual range
    pub fn parse(&self, text: Option<&str>) -> ImpactRange {
        self.parse_detailed(text).range
    }

    pub fn parse_detailed(&self, text: Option<&str>) -> ParsedImpact {
        let raw = text.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return self.fallback(false);
        }

        let cleaned = raw.replace(['$', ','], "").to_lowercase();
        let monthly = self.monthly_re.is_match(&cleaned);
        let multiplier = if monthly {
            self.defaults.months_per_year
        } else {
            1.0
        };

        if let Some(caps) = self.range_re.captures(&cleaned) {
            let first = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
            let second = caps.get(2).and_then(|m| m.as_str().parse::<f64>().ok());
            if let (Some(a), Some(b)) = (first, second) {
                let range = ImpactRange::new(a.min(b) * multiplier, a.max(b) * multiplier);
                debug!(text = raw, low = range.low, high = range.high, "Parsed impact range");
                return ParsedImpact {
                    range,
                    basis: ImpactBasis::Range,
                    monthly,
                };
            }
        }

        if let Some(n) = self
            .number_re
            .find(&cleaned)
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            let amount = n * multiplier;
            let range = ImpactRange::new(
                amount * self.defaults.single_low_factor,
                amount * self.defaults.single_high_factor,
            );
            debug!(text = raw, amount, "Parsed single impact amount");
            return ParsedImpact {
                range,
                basis: ImpactBasis::Single,
                monthly,
            };
        }

        if cleaned.contains("thousand") {
            return ParsedImpact {
                range: self.defaults.thousands,
                basis: ImpactBasis::Thousands,
                monthly,
            };
        }
        if cleaned.contains("hundred") {
            return ParsedImpact {
                range: self.defaults.hundreds,
                basis: ImpactBasis::Hundreds,
                monthly,
            };
        }

        self.fallback(monthly)
    }

    fn fallback(&self, monthly: bool) -> ParsedImpact {
        ParsedImpact {
            range: self.defaults.parse_fallback,
            basis: ImpactBasis::Fallback,
            monthly,
        }
    }
}
