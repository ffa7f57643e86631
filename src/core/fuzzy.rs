//! Fuzzy - pick the best candidate name for a free-text phrase
//!
//! Scores are 0-100. A phrase that merely *contains* a candidate (e.g.
//! "where is crocin" vs "Crocin") scores high through the partial ratio,
//! which is what makes whole-sentence input usable.

use strsim::normalized_levenshtein;

/// Minimum score for a match to count as confident
pub const DEFAULT_THRESHOLD: u8 = 60;

/// Best-scoring candidate for `text`, if it clears `threshold`.
///
/// Ties keep the earlier candidate. Scores equal to the threshold are
/// rejected.
pub fn extract_best_match<'a>(
    text: &str,
    candidates: &'a [String],
    threshold: u8,
) -> Option<&'a str> {
    let mut best: Option<(&'a str, u8)> = None;

    for candidate in candidates {
        let s = score(text, candidate);
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((candidate.as_str(), s));
        }
    }

    let (name, score) = best?;
    tracing::debug!(text, name, score, "best fuzzy candidate");
    (score > threshold).then_some(name)
}

/// Weighted similarity between two strings (0-100).
///
/// Takes the plain ratio for similar-length strings, and scaled partial
/// ratios once one side is much longer than the other.
pub fn score(a: &str, b: &str) -> u8 {
    let a = preprocess(a);
    let b = preprocess(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = ratio(&a, &b);
    let (short_len, long_len) = {
        let (x, y) = (a.chars().count(), b.chars().count());
        (x.min(y) as f64, x.max(y) as f64)
    };
    let len_ratio = long_len / short_len;

    let best = if len_ratio < 1.5 {
        base.max(token_sort_ratio(&a, &b) * 0.95)
    } else {
        let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
        base.max(partial_ratio(&a, &b) * partial_scale)
            .max(partial_ratio(&sort_tokens(&a), &sort_tokens(&b)) * 0.95 * partial_scale)
    };

    best.round().clamp(0.0, 100.0) as u8
}

/// Lowercase and replace anything non-alphanumeric with a space
fn preprocess(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sort_tokens(a), &sort_tokens(b))
}

/// Best ratio of the shorter string against every same-length window of
/// the longer one
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let width = short.chars().count();
    let long: Vec<char> = long.chars().collect();

    long.windows(width)
        .map(|w| ratio(short, &w.iter().collect::<String>()))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sentence_containing_candidate() {
        let candidates = names(&["Crocin", "Aspirin"]);
        assert_eq!(
            extract_best_match("Where is Crocin", &candidates, DEFAULT_THRESHOLD),
            Some("Crocin")
        );
    }

    #[test]
    fn test_unrelated_text_is_rejected() {
        let candidates = names(&["Crocin", "Aspirin"]);
        assert_eq!(
            extract_best_match("xyz", &candidates, DEFAULT_THRESHOLD),
            None
        );
    }

    #[test]
    fn test_misspelling_still_matches() {
        let candidates = names(&["Paracetamol", "Aspirin"]);
        assert_eq!(
            extract_best_match("paracetmol", &candidates, DEFAULT_THRESHOLD),
            Some("Paracetamol")
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(extract_best_match("crocin", &[], DEFAULT_THRESHOLD), None);
        assert_eq!(score("", "Crocin"), 0);
        assert_eq!(score("?!", "Crocin"), 0);
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(score("Crocin", "crocin"), 100);
        assert_eq!(score("shelf a", "A SHELF"), 95);
        assert!(score("abc", "xyz") < 10);
    }
}
