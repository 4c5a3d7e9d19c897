use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// First quarter covered by the bundled dataset.
pub const CATALOG_START: Period = Period {
    year: 2013,
    quarter: 1,
};

/// Last quarter covered by the bundled dataset.
pub const CATALOG_END: Period = Period {
    year: 2025,
    quarter: 4,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("invalid period format: {0:?} (expected <year>_Q<1-4>, e.g. 2013_Q1)")]
    InvalidPeriodFormat(String),
}

/// A calendar quarter such as `2013_Q1`.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub quarter: u8,
}

impl Period {
    pub const fn new(year: i32, quarter: u8) -> Option<Self> {
        if quarter >= 1 && quarter <= 4 {
            Some(Self { year, quarter })
        } else {
            None
        }
    }

    /// Strict parser for `<4-digit-year>_Q<1-4>`.
    pub fn parse(value: &str) -> Result<Self, PeriodError> {
        let invalid = || PeriodError::InvalidPeriodFormat(value.to_string());

        let (year, quarter) = value.split_once('_').ok_or_else(invalid)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let digit = quarter.strip_prefix('Q').ok_or_else(invalid)?;
        if digit.len() != 1 {
            return Err(invalid());
        }

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let quarter = digit.parse::<u8>().map_err(|_| invalid())?;
        Self::new(year, quarter).ok_or_else(invalid)
    }

    /// Builds a period from the split form events carry (`2014`, `"Q2"`).
    pub fn from_parts(year: i32, quarter: &str) -> Option<Self> {
        let digit = quarter.strip_prefix('Q')?;
        if digit.len() != 1 {
            return None;
        }
        Self::new(year, digit.parse().ok()?)
    }

    /// `year * 10 + quarter`. Only meaningful for comparing periods.
    pub const fn ordinal(self) -> i64 {
        self.year as i64 * 10 + self.quarter as i64
    }

    /// `"Q1"`..`"Q4"`.
    pub fn label(self) -> String {
        format!("Q{}", self.quarter)
    }

    /// Human form used in menus, `"2013 Q1"`.
    pub fn display_label(self) -> String {
        format!("{} Q{}", self.year, self.quarter)
    }

    pub const fn next(self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    pub const fn prev(self) -> Self {
        if self.quarter == 1 {
            Self {
                year: self.year - 1,
                quarter: 4,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter - 1,
            }
        }
    }

    /// Clamps into the catalog range.
    pub fn clamp_to_catalog(self) -> Self {
        self.clamp(CATALOG_START, CATALOG_END)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_Q{}", self.year, self.quarter)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Every quarter from `CATALOG_START` to `CATALOG_END`, in order.
pub fn catalog() -> impl Iterator<Item = Period> {
    (CATALOG_START.year..=CATALOG_END.year)
        .flat_map(|year| (1..=4).map(move |quarter| Period { year, quarter }))
}

/// Lenient ordinal for loosely formatted strings such as `"2013_Q1"` or
/// `"2013 Q1"`. Strips the first `_`, space and `Q`, then reads the leading
/// integer. Empty or unparseable input yields `0`.
pub fn quarter_value(value: &str) -> i64 {
    if value.is_empty() {
        return 0;
    }

    let cleaned = value
        .replacen('_', "", 1)
        .replacen(' ', "", 1)
        .replacen('Q', "", 1);
    let trimmed = cleaned.trim_start();

    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}
