use std::collections::{BTreeSet, HashSet};

use strsim::{normalized_levenshtein, sorensen_dice};

use crate::core::identity::ClaimedIdentity;
use crate::core::status::ValidationStatus;

const FUZZY_MATCH_THRESHOLD: f64 = 85.0;

/// Incrementally matches OCR text against the claimed name tokens.
///
/// The found-token set only grows: once a token has been spotted in any
/// attempt, at any orientation, it stays found for the rest of the run.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    claimed: Vec<String>,
    found: HashSet<String>,
    status: ValidationStatus,
}

impl NameMatcher {
    pub fn new(identity: &ClaimedIdentity) -> Self {
        Self {
            claimed: identity.name_tokens().to_vec(),
            found: HashSet::new(),
            status: ValidationStatus::Failed,
        }
    }

    /// Scan one piece of OCR output for claimed name tokens.
    pub fn observe(&mut self, text: &str) {
        // Keep only letters and whitespace; OCR noise like "j0hn," becomes "jhn".
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .collect();

        for word in cleaned.split_whitespace() {
            for token in &self.claimed {
                if self.found.contains(token) {
                    continue;
                }
                if token_set_ratio(token, word) > FUZZY_MATCH_THRESHOLD {
                    self.found.insert(token.clone());
                }
            }
        }

        if self.found.len() >= 2 {
            self.status.advance(ValidationStatus::Complete);
        } else if self.found.len() == 1 {
            self.status.advance(ValidationStatus::Partial);
        }
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn found_tokens(&self) -> &HashSet<String> {
        &self.found
    }
}

/// Token-set fuzzy ratio in [0, 100].
///
/// Both strings are treated as token sets; the score is the best
/// normalized-Levenshtein similarity among (shared tokens, shared + a-only,
/// shared + b-only) pairings, so shared words dominate and word order is
/// irrelevant. For single-word inputs this degrades to plain edit
/// similarity.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_tokens: BTreeSet<&str> = a.split_whitespace().collect();
    let b_tokens: BTreeSet<&str> = b.split_whitespace().collect();

    let shared = join(a_tokens.intersection(&b_tokens));
    let a_rest = join(a_tokens.difference(&b_tokens));
    let b_rest = join(b_tokens.difference(&a_tokens));

    let shared_plus_a = concat(&shared, &a_rest);
    let shared_plus_b = concat(&shared, &b_rest);

    let mut best = similarity(&shared_plus_a, &shared_plus_b);
    if !shared.is_empty() {
        best = best
            .max(similarity(&shared, &shared_plus_a))
            .max(similarity(&shared, &shared_plus_b));
    }
    best * 100.0
}

/// Edit similarity with a bigram fallback. Levenshtein punishes a single
/// doubled or dropped character in a short token harder than OCR noise
/// deserves; the Sorensen-Dice bigram score recovers those while staying
/// low for genuinely different words.
fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b).max(sorensen_dice(a, b))
}

fn join<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn concat(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}
