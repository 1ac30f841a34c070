//! Field parsers
//!
//! Each parser validates one column of a data line. Parsers never fail the
//! run: they log a diagnostic and return `None`, leaving the decision to
//! skip the line to the caller.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::logger::Logger;

/// Separator between requirement and test case in the first column
pub const TEST_CASE_SEPARATOR: char = '\\';

/// Turns a raw column value into a typed value, or `None` if it is invalid
pub trait FieldParser {
    type Output;

    fn parse(&self, value: &str) -> Option<Self::Output>;
}

/// Requirement and test case parsed from `<requirement>\<test case>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseId {
    pub requirement: String,
    pub test_case: String,
}

#[derive(Debug, Clone)]
pub struct TestCaseParser {
    logger: Logger,
}

impl TestCaseParser {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl FieldParser for TestCaseParser {
    type Output = TestCaseId;

    fn parse(&self, value: &str) -> Option<TestCaseId> {
        if value.matches(TEST_CASE_SEPARATOR).count() != 1 {
            self.logger.error(format!(
                "TestCaseParser: Expected exactly one backslash in '{}'.",
                value
            ));
            return None;
        }

        let (left, right) = value.split_once(TEST_CASE_SEPARATOR)?;
        let (requirement, test_case) = (left.trim(), right.trim());
        if requirement.is_empty() || test_case.is_empty() {
            self.logger.error(format!(
                "TestCaseParser: One side of the backslash is empty in '{}'.",
                value
            ));
            return None;
        }

        Some(TestCaseId {
            requirement: requirement.to_string(),
            test_case: test_case.to_string(),
        })
    }
}

/// Multiplier to seconds for a known unit
fn unit_multiplier(unit: &str) -> Option<f64> {
    match unit {
        "hr" | "hour" => Some(3600.0),
        "min" => Some(60.0),
        "sec" | "s" => Some(1.0),
        "ms" | "millisecond" => Some(0.001),
        "ns" | "nanosecond" => Some(1e-9),
        _ => None,
    }
}

/// Largest value accepted without a warning for minute and second units
const SEXAGESIMAL_MAX: f64 = 59.0;

fn warns_above_sexagesimal(unit: &str) -> bool {
    matches!(unit, "min" | "sec" | "s")
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(-?[0-9]+(?:\.[0-9]+)?)\s+([a-zA-Z]+)").expect("duration pattern is valid")
    })
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parses durations such as `5 sec` or `2 min 48 sec` into seconds
#[derive(Debug, Clone)]
pub struct DurationParser {
    logger: Logger,
}

impl DurationParser {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl FieldParser for DurationParser {
    type Output = f64;

    fn parse(&self, value: &str) -> Option<f64> {
        let lowered = value.to_lowercase();
        let components: Vec<(&str, &str, &str)> = duration_pattern()
            .captures_iter(&lowered)
            .filter_map(|caps| {
                let whole = caps.get(0)?.as_str();
                let number = caps.get(1)?.as_str();
                let unit = caps.get(2)?.as_str();
                Some((whole, number, unit))
            })
            .collect();

        if components.is_empty() {
            self.logger
                .error(format!("DurationParser: Time format incorrect: '{}'", value));
            return None;
        }

        let matched: String = components
            .iter()
            .map(|(whole, _, _)| strip_whitespace(whole))
            .collect();
        let stripped = strip_whitespace(&lowered);
        if matched != stripped {
            let unrecognized = stripped.replacen(&matched, "", 1);
            self.logger.error(format!(
                "DurationParser: Unrecognized components in '{}': '{}'",
                value, unrecognized
            ));
            return None;
        }

        let mut total_seconds = 0.0;
        let mut used_units = HashSet::new();

        for (_, number, unit) in components {
            let amount: f64 = match number.parse() {
                Ok(amount) => amount,
                Err(_) => {
                    self.logger.error(format!(
                        "DurationParser: Invalid numeric value '{}' in '{}'",
                        number, value
                    ));
                    return None;
                }
            };

            if amount < 0.0 {
                self.logger.error(format!(
                    "DurationParser: Negative value '{} {}' in '{}'.",
                    amount, unit, value
                ));
                return None;
            }

            let Some(multiplier) = unit_multiplier(unit) else {
                self.logger.error(format!(
                    "DurationParser: Unknown unit '{}' in '{}'.",
                    unit, value
                ));
                return None;
            };

            if !used_units.insert(unit) {
                self.logger.error(format!(
                    "DurationParser: Unit '{}' used multiple times in '{}'.",
                    unit, value
                ));
                return None;
            }

            if warns_above_sexagesimal(unit) && amount > SEXAGESIMAL_MAX {
                self.logger.warning(format!(
                    "DurationParser: '{} {}' > '{}' is unusual.",
                    amount, unit, SEXAGESIMAL_MAX
                ));
            }

            total_seconds += amount * multiplier;
        }

        if total_seconds == 0.0 {
            self.logger.error(format!(
                "DurationParser: Total duration is zero for '{}'.",
                value
            ));
            return None;
        }

        if !total_seconds.is_finite() {
            self.logger.error(format!(
                "DurationParser: Total duration is out of range for '{}'.",
                value
            ));
            return None;
        }

        Some(total_seconds)
    }
}

/// Parses the status column
///
/// Any non-blank text is a status; surrounding whitespace is dropped
#[derive(Debug, Clone)]
pub struct StatusParser {
    logger: Logger,
}

impl StatusParser {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl FieldParser for StatusParser {
    type Output = String;

    fn parse(&self, value: &str) -> Option<String> {
        let status = value.trim();
        if status.is_empty() {
            self.logger.error("StatusParser: Status is empty.");
            return None;
        }
        Some(status.to_string())
    }
}
