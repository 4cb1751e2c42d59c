use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::core::errors::Error;

/// The identity a document claims to prove: a normalized name and a date of
/// birth, as read from the per-document `info.txt`.
#[derive(Debug, Clone)]
pub struct ClaimedIdentity {
    name_tokens: Vec<String>,
    dob: NaiveDate,
}

impl ClaimedIdentity {
    /// Normalize a claimed name and pair it with a date of birth.
    ///
    /// The name is case-folded and split on whitespace; tokens that are a
    /// single character after stripping trailing dots (initials like the
    /// "D." in "John D. Smith") are discarded. At least two tokens must
    /// survive, otherwise the claim can never reach Complete and the input
    /// is rejected as a configuration error.
    pub fn new(name: &str, dob: NaiveDate) -> Result<Self, Error> {
        let name_tokens: Vec<String> = name
            .to_lowercase()
            .split_whitespace()
            .filter(|token| token.trim_matches('.').len() > 1)
            .map(|token| token.to_string())
            .collect();

        if name_tokens.len() < 2 {
            return Err(Error::Config(format!(
                "claimed name {name:?} has fewer than two usable tokens"
            )));
        }

        Ok(Self { name_tokens, dob })
    }

    /// Parse an info file: line 1 is the claimed name (case-insensitive),
    /// line 2 the date of birth as `YYYY/MM/DD`.
    pub fn from_info_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;

        let mut lines = contents.lines();
        let name = lines
            .next()
            .ok_or_else(|| Error::Config(format!("{} is empty", path.display())))?
            .trim();
        let dob_line = lines
            .next()
            .ok_or_else(|| Error::Config(format!("{} is missing a date of birth", path.display())))?
            .trim();

        let dob = NaiveDate::parse_from_str(dob_line, "%Y/%m/%d").map_err(|e| {
            Error::Config(format!(
                "bad date of birth {dob_line:?} in {}: {e}",
                path.display()
            ))
        })?;

        Self::new(name, dob)
    }

    pub fn name_tokens(&self) -> &[String] {
        &self.name_tokens
    }

    pub fn dob(&self) -> NaiveDate {
        self.dob
    }
}
