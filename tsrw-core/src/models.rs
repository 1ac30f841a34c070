use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::TsrwError;

/// Sequential id assigned to each accepted line, starting at 1
pub type EntryId = u32;

/// One validated row of the input log
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub requirement: String,
    pub test_case: String,
    /// Duration in seconds, always strictly positive
    pub duration: f64,
    pub status: String,
}

/// Field a sort index is maintained for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Requirement,
    TestCase,
    Duration,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Requirement,
        SortKey::TestCase,
        SortKey::Duration,
        SortKey::Status,
    ];
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Requirement => write!(f, "Requirement"),
            SortKey::TestCase => write!(f, "Test Case"),
            SortKey::Duration => write!(f, "Duration"),
            SortKey::Status => write!(f, "Status"),
        }
    }
}

/// Order in which records are exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportOrder {
    /// Pre-built sort index of the given field
    By(SortKey),
    /// Id order, i.e. the order lines were accepted
    Insertion,
}

impl Default for ExportOrder {
    fn default() -> Self {
        ExportOrder::By(SortKey::Duration)
    }
}

impl fmt::Display for ExportOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportOrder::By(key) => write!(f, "{}", key),
            ExportOrder::Insertion => write!(f, "none"),
        }
    }
}

impl FromStr for ExportOrder {
    type Err = TsrwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Requirement" => Ok(ExportOrder::By(SortKey::Requirement)),
            "Test Case" | "TestCase" => Ok(ExportOrder::By(SortKey::TestCase)),
            "Duration" => Ok(ExportOrder::By(SortKey::Duration)),
            "Status" => Ok(ExportOrder::By(SortKey::Status)),
            "none" => Ok(ExportOrder::Insertion),
            _ => Err(TsrwError::InvalidSortKey(s.to_string())),
        }
    }
}

/// Integer of any length, ordered by value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Numeral {
    negative: bool,
    /// Decimal digits without leading zeros, empty for zero
    digits: String,
}

impl Numeral {
    /// Parses an optionally signed run of ASCII digits, ignoring surrounding whitespace
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let digits = unsigned.trim_start_matches('0').to_string();
        Some(Self {
            negative: negative && !digits.is_empty(),
            digits,
        })
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl From<i64> for Numeral {
    fn from(value: i64) -> Self {
        let digits = if value == 0 {
            String::new()
        } else {
            value.unsigned_abs().to_string()
        };
        Self {
            negative: value < 0,
            digits,
        }
    }
}

impl Ord for Numeral {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for Numeral {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.negative, self.digits.is_empty()) {
            (_, true) => write!(f, "0"),
            (true, false) => write!(f, "-{}", self.digits),
            (false, false) => write!(f, "{}", self.digits),
        }
    }
}

/// Numeric prefix of a requirement; non-numeric prefixes sort after all numbers
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prefix {
    Number(Numeral),
    Unbounded,
}

/// Natural ordering key derived from a requirement identifier
///
/// `12_Motor_Unit_3` becomes `(12, "Motor_Unit", 3)`, so numeric parts
/// compare as numbers instead of text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequirementKey {
    pub prefix: Prefix,
    pub name: String,
    pub suffix: Numeral,
}

impl RequirementKey {
    pub fn from_requirement(requirement: &str) -> Self {
        let parts: Vec<&str> = requirement.split('_').collect();

        match parts.as_slice() {
            [first, middle @ .., last] if !middle.is_empty() => RequirementKey {
                prefix: Numeral::parse(first).map_or(Prefix::Unbounded, Prefix::Number),
                name: middle.join("_"),
                suffix: Numeral::parse(last).unwrap_or_default(),
            },
            [first, second] => match Numeral::parse(first) {
                Some(prefix) => RequirementKey {
                    prefix: Prefix::Number(prefix),
                    name: (*second).to_string(),
                    suffix: Numeral::default(),
                },
                None => RequirementKey {
                    prefix: Prefix::Unbounded,
                    name: (*first).to_string(),
                    suffix: Numeral::parse(second).unwrap_or_default(),
                },
            },
            _ => RequirementKey {
                prefix: Prefix::Unbounded,
                name: requirement.to_string(),
                suffix: Numeral::default(),
            },
        }
    }
}

/// Why a data line was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    ColumnCount(usize),
    EmptyField,
    TestCase(String),
    Duration(String),
    Status(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ColumnCount(n) => write!(f, "{} columns instead of 3", n),
            RejectReason::EmptyField => write!(f, "Empty field"),
            RejectReason::TestCase(raw) => {
                write!(f, "Test case parse error. Invalid value: '{}'", raw)
            }
            RejectReason::Duration(raw) => {
                write!(f, "Duration parse error. Invalid value: '{}'", raw)
            }
            RejectReason::Status(raw) => write!(f, "Status parse error. Invalid value: '{}'", raw),
        }
    }
}

/// Ledger entry for a skipped line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLine {
    /// Physical line number, the header being line 1
    pub line_number: usize,
    pub reason: RejectReason,
}

impl fmt::Display for ReviewLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {} skipped: {}", self.line_number, self.reason)
    }
}
