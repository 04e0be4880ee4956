//! Investment frequency presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance used when matching a day count against a preset.
const DAYS_EPSILON: f64 = 1e-9;

/// How often the periodic investment is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentFrequency {
    TwiceAWeek,
    Weekly,
    Biweekly,
    Monthly,
}

impl InvestmentFrequency {
    pub const ALL: [InvestmentFrequency; 4] = [
        InvestmentFrequency::TwiceAWeek,
        InvestmentFrequency::Weekly,
        InvestmentFrequency::Biweekly,
        InvestmentFrequency::Monthly,
    ];

    /// Calendar days between investments.
    pub fn days(self) -> f64 {
        match self {
            InvestmentFrequency::TwiceAWeek => 3.5,
            InvestmentFrequency::Weekly => 7.0,
            InvestmentFrequency::Biweekly => 14.0,
            InvestmentFrequency::Monthly => 30.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InvestmentFrequency::TwiceAWeek => "twice-a-week",
            InvestmentFrequency::Weekly => "weekly",
            InvestmentFrequency::Biweekly => "biweekly",
            InvestmentFrequency::Monthly => "monthly",
        }
    }

    /// Match a day count against the supported presets.
    pub fn from_days(days: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| (f.days() - days).abs() < DAYS_EPSILON)
    }
}

impl fmt::Display for InvestmentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InvestmentFrequency {
    type Err = String;

    /// Accepts preset labels ("weekly", "Every two weeks", ...) or a day count ("3.5").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "twice-a-week" | "twice-weekly" | "semiweekly" => Ok(Self::TwiceAWeek),
            "weekly" => Ok(Self::Weekly),
            "biweekly" | "every-two-weeks" | "fortnightly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            other => other
                .parse::<f64>()
                .ok()
                .and_then(Self::from_days)
                .ok_or_else(|| {
                    format!(
                        "unknown frequency '{s}'. Valid: twice-a-week, weekly, biweekly, monthly, 3.5, 7, 14, 30"
                    )
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_from_the_form() {
        assert_eq!("Twice a week".parse::<InvestmentFrequency>(), Ok(InvestmentFrequency::TwiceAWeek));
        assert_eq!("Weekly".parse::<InvestmentFrequency>(), Ok(InvestmentFrequency::Weekly));
        assert_eq!("Every two weeks".parse::<InvestmentFrequency>(), Ok(InvestmentFrequency::Biweekly));
        assert_eq!("monthly".parse::<InvestmentFrequency>(), Ok(InvestmentFrequency::Monthly));
    }

    #[test]
    fn parses_day_counts() {
        assert_eq!("3.5".parse::<InvestmentFrequency>(), Ok(InvestmentFrequency::TwiceAWeek));
        assert_eq!("14".parse::<InvestmentFrequency>(), Ok(InvestmentFrequency::Biweekly));
        assert!("10".parse::<InvestmentFrequency>().is_err());
    }

    #[test]
    fn from_days_rejects_unsupported() {
        assert_eq!(InvestmentFrequency::from_days(30.0), Some(InvestmentFrequency::Monthly));
        assert_eq!(InvestmentFrequency::from_days(1.0), None);
    }
}
