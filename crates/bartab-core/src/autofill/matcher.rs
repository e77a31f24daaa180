//! Approximate name matching with Levenshtein distance
//!
//! A candidate is accepted only when its distance to the query is at most
//! half the query's length (integer division). Short queries therefore
//! tolerate almost no edits while long ones tolerate proportionally more.
//! The bound deliberately depends on the query alone, not on the candidate.

use tracing::debug;

/// Outcome of matching one query against a candidate list
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult<'a, T> {
    Resolved(&'a T),
    Unresolved { query: String },
}

impl<'a, T> MatchResult<'a, T> {
    pub fn resolved(&self) -> Option<&'a T> {
        match self {
            Self::Resolved(candidate) => Some(candidate),
            Self::Unresolved { .. } => None,
        }
    }
}

/// Edit distance between two strings (unit cost insert/delete/substitute)
///
/// Operates on chars, not bytes, and keeps only two rows of the table.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Maximum distance accepted for a query
pub fn acceptance_threshold(query: &str) -> usize {
    query.chars().count() / 2
}

/// Find the candidate whose selected field is closest to `query`
///
/// Comparison is case-insensitive. The first exact match wins immediately;
/// otherwise the first candidate with the lowest distance is kept, and it is
/// returned only if that distance is within `acceptance_threshold(query)`.
pub fn find_best_match<'a, T, F>(query: &str, candidates: &'a [T], field: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    if query.is_empty() || candidates.is_empty() {
        return None;
    }

    let needle = query.to_lowercase();
    let mut best: Option<(&'a T, usize)> = None;

    for candidate in candidates {
        let distance = levenshtein(&needle, &field(candidate).to_lowercase());
        if distance == 0 {
            return Some(candidate);
        }
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }

    let threshold = acceptance_threshold(query);
    match best {
        Some((candidate, distance)) if distance <= threshold => {
            debug!(query, distance, threshold, "Fuzzy match accepted");
            Some(candidate)
        }
        Some((_, distance)) => {
            debug!(query, distance, threshold, "Fuzzy match rejected");
            None
        }
        None => None,
    }
}

/// Like `find_best_match`, but keeps the query text when nothing matched
pub fn resolve<'a, T, F>(query: &str, candidates: &'a [T], field: F) -> MatchResult<'a, T>
where
    F: Fn(&T) -> &str,
{
    match find_best_match(query, candidates, field) {
        Some(candidate) => MatchResult::Resolved(candidate),
        None => MatchResult::Unresolved {
            query: query.to_string(),
        },
    }
}
