use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::status::ValidationStatus;

/// Bilingual month abbreviations as they appear on passports, where the
/// English and French forms sit side by side and OCR reads them as one
/// word ("08 JAN JAN 1976" -> "08janjan1976"). Each maps to its two-digit
/// month. British passports print "SEP SEPT", hence the extra spelling.
const MONTH_ABBREVIATIONS: [(&str, &str); 19] = [
    ("janjan", "01"),
    ("febfev", "02"),
    ("febfév", "02"),
    ("marmar", "03"),
    ("apravr", "04"),
    ("maymai", "05"),
    ("junjui", "06"),
    ("junejuin", "06"),
    ("juljul", "07"),
    ("julyjuil", "07"),
    ("augaoû", "08"),
    ("augaou", "08"),
    ("sepsep", "09"),
    ("septsept", "09"),
    ("sepsept", "09"),
    ("octoct", "10"),
    ("novnov", "11"),
    ("decdec", "12"),
    ("decdéc", "12"),
];

/// Substrings shaped like a date. Alternatives are ordered longest-first
/// within each family so an 8-digit run is not eaten as 6 digits.
static DATE_SHAPES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d{8}|\d{6}|\d{2}[a-z]{3}\d{4}|\d{4}[a-z]{3}\d{2}|\d{2}[a-z]{3}\d{2}|[a-z]{3}\d{2}\d{4}|[a-z]{3}\d{2}\d{2})",
    )
    .expect("date shape regex is valid")
});

/// Every year/month/day ordering implied by the shapes, with 2- and
/// 4-digit year variants.
const DATE_TEMPLATES: [&str; 12] = [
    "%Y%m%d", "%y%m%d", "%d%m%Y", "%d%m%y", "%m%d%Y", "%m%d%y", "%Y%b%d", "%y%b%d", "%d%b%Y",
    "%d%b%y", "%b%d%Y", "%b%d%y",
];

/// Two-digit years parsing past this are assumed to belong to the previous
/// century ("58" is 1958, not 2058).
const TWO_DIGIT_YEAR_CUTOFF: i32 = 2026;

/// Incrementally matches OCR text against the claimed date of birth.
/// Both flags are monotonic for the life of the matcher.
#[derive(Debug, Clone)]
pub struct DobMatcher {
    claimed: NaiveDate,
    year_matched: bool,
    full_matched: bool,
}

impl DobMatcher {
    pub fn new(claimed: NaiveDate) -> Self {
        Self {
            claimed,
            year_matched: false,
            full_matched: false,
        }
    }

    /// Scan one piece of OCR output for the claimed date of birth.
    pub fn observe(&mut self, text: &str) {
        let mut cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '\n')
            .collect();

        // Append a corrected copy per month abbreviation found, never
        // replacing in place: with several abbreviations present the
        // copies compound, so every combination gets scanned.
        for (abbreviation, month) in MONTH_ABBREVIATIONS {
            if cleaned.contains(abbreviation) {
                let corrected = cleaned.replace(abbreviation, month);
                cleaned.push('\n');
                cleaned.push_str(&corrected);
            }
        }

        // OCR often reads a leading 1 as 4 (1979 -> 4979). Scan a copy
        // with that particular 4-digit span corrected back.
        let claimed_year = self.claimed.year().to_string();
        if let Some(rest) = claimed_year.strip_prefix('1') {
            let misread = format!("4{rest}");
            if cleaned.contains(&misread) {
                let corrected = cleaned.replace(&misread, &claimed_year);
                cleaned.push('\n');
                cleaned.push_str(&corrected);
            }
        }

        if cleaned.contains(&claimed_year) {
            self.year_matched = true;
        }

        for shape in DATE_SHAPES.find_iter(&cleaned) {
            for template in DATE_TEMPLATES {
                let Ok(parsed) = NaiveDate::parse_from_str(shape.as_str(), template) else {
                    continue;
                };
                self.note(parsed);
                if template.contains("%y") && parsed.year() > TWO_DIGIT_YEAR_CUTOFF {
                    if let Some(shifted) = parsed.with_year(parsed.year() - 100) {
                        self.note(shifted);
                    }
                }
            }
        }
    }

    fn note(&mut self, candidate: NaiveDate) {
        if candidate.year() == self.claimed.year() {
            self.year_matched = true;
        }
        if candidate == self.claimed {
            self.full_matched = true;
        }
    }

    pub fn status(&self) -> ValidationStatus {
        if self.full_matched {
            ValidationStatus::Complete
        } else if self.year_matched {
            ValidationStatus::Partial
        } else {
            ValidationStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matcher() -> DobMatcher {
        DobMatcher::new(NaiveDate::from_ymd_opt(1979, 5, 8).unwrap())
    }

    #[test]
    fn eight_digit_day_month_year_completes() {
        let mut m = matcher();
        m.observe("ID CARD\n08051979\nEXP 2031");
        assert_eq!(m.status(), ValidationStatus::Complete);
    }

    #[test]
    fn year_month_day_completes() {
        let mut m = matcher();
        m.observe("19790508");
        assert_eq!(m.status(), ValidationStatus::Complete);
    }

    #[test]
    fn bare_year_is_partial_not_complete() {
        let mut m = matcher();
        m.observe("born 1979 somewhere");
        assert_eq!(m.status(), ValidationStatus::Partial);
    }

    #[test]
    fn six_digit_two_digit_year_completes() {
        let mut m = matcher();
        m.observe("080579");
        assert_eq!(m.status(), ValidationStatus::Complete);
    }

    #[test]
    fn passport_month_pair_is_corrected() {
        let mut m = matcher();
        // "08 MAY MAI 1979" after cleaning.
        m.observe("08maymai1979");
        assert_eq!(m.status(), ValidationStatus::Complete);
    }

    #[test]
    fn single_month_abbreviation_parses_directly() {
        let mut m = matcher();
        m.observe("08may1979");
        assert_eq!(m.status(), ValidationStatus::Complete);
    }

    #[test]
    fn misread_leading_four_is_recovered() {
        let mut m = matcher();
        m.observe("08054979");
        assert_eq!(m.status(), ValidationStatus::Complete);
    }

    #[test]
    fn future_two_digit_year_shifts_back_a_century() {
        let mut m = DobMatcher::new(NaiveDate::from_ymd_opt(1958, 3, 2).unwrap());
        // %d%m%y reads "020358" as 2058-03-02 before the century shift.
        m.observe("020358");
        assert_eq!(m.status(), ValidationStatus::Complete);
    }

    #[test]
    fn wrong_date_fails() {
        let mut m = matcher();
        m.observe("12121999");
        assert_eq!(m.status(), ValidationStatus::Failed);
    }

    #[test]
    fn flags_are_monotonic_across_observations() {
        let mut m = matcher();
        m.observe("1979");
        assert_eq!(m.status(), ValidationStatus::Partial);
        m.observe("nothing datelike");
        assert_eq!(m.status(), ValidationStatus::Partial);
        m.observe("08051979");
        assert_eq!(m.status(), ValidationStatus::Complete);
        m.observe("garbage");
        assert_eq!(m.status(), ValidationStatus::Complete);
    }
}
