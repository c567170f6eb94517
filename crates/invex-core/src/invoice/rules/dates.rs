//! Invoice date extraction from plain text.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, INVOICE_DATE, LABELED_DATE};
use super::{FieldExtractor, TextMatch};

/// Date field extractor.
///
/// Values are returned as printed; a match is only accepted when it names a
/// real calendar date.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = TextMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        let patterns = [
            (&*INVOICE_DATE, 0.95),
            (&*LABELED_DATE, 0.85),
            (&*DATE_DMY, 0.6),
        ];

        for (pattern, confidence) in patterns {
            for caps in pattern.captures_iter(text) {
                let (Some(start), Some(end)) = (caps.get(1), caps.get(3)) else {
                    continue;
                };
                let raw = text[start.start()..end.end()].to_string();
                if parse_date(&caps[1], &caps[2], &caps[3]).is_none() {
                    continue;
                }
                if results.iter().any(|r| r.value == raw) {
                    continue;
                }

                let Some(full_match) = caps.get(0) else {
                    continue;
                };
                results.push(
                    TextMatch::new(raw, confidence, full_match.as_str())
                        .at(full_match.range()),
                );
            }
        }

        results
    }
}

/// Interpret day, month and year fields, falling back to month-first order.
pub fn parse_date(first: &str, second: &str, year: &str) -> Option<NaiveDate> {
    let first: u32 = first.parse().ok()?;
    let second: u32 = second.parse().ok()?;
    let year = parse_year(year)?;

    NaiveDate::from_ymd_opt(year, second, first)
        .or_else(|| NaiveDate::from_ymd_opt(year, first, second))
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() == 2 {
        Some(2000 + year)
    } else {
        Some(year)
    }
}
