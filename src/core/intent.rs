//! Intent - classify one line of free text
//!
//! Patterns are tried in a fixed order and the first hit wins:
//!
//! 1. `(add|put|update) <n> <medicine> (to|in|at) <location>`
//! 2. `(where is|find|search|locate) <medicine>`
//! 3. anything containing `list` or `show all`
//! 4. otherwise unknown
//!
//! Matching runs on the trimmed, lowercased input. Extracted phrases are
//! raw text; nothing here checks them against the catalog.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ADD_RE: Regex =
        Regex::new(r"(?i)(add|put|update)\s+([0-9]+)\s+(.+)\s+(to|in|at)\s+(.+)").unwrap();
    static ref SEARCH_RE: Regex = Regex::new(r"(?i)(where is|find|search|locate)\s+(.+)").unwrap();
}

/// A classified command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Add `quantity` units of `medicine` at `location`
    AddStock {
        quantity: i64,
        medicine: String,
        location: String,
    },
    /// Look up a medicine by substring
    Search { term: String },
    /// Show the whole inventory
    List,
    Unknown,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::AddStock { .. } => "add",
            Intent::Search { .. } => "search",
            Intent::List => "list",
            Intent::Unknown => "unknown",
        }
    }
}

/// Classify `text`. Never fails; unmatched input is [`Intent::Unknown`].
pub fn classify(text: &str) -> Intent {
    let input = text.trim().to_lowercase();

    if let Some(caps) = ADD_RE.captures(&input) {
        // A count too large for i64 falls through to the later patterns
        if let Ok(quantity) = caps[2].parse::<i64>() {
            return Intent::AddStock {
                quantity,
                medicine: caps[3].trim().to_string(),
                location: caps[5].trim().to_string(),
            };
        }
    }

    if let Some(caps) = SEARCH_RE.captures(&input) {
        let term = caps[2].replace('?', "").trim().to_string();
        return Intent::Search { term };
    }

    if input.contains("list") || input.contains("show all") {
        return Intent::List;
    }

    Intent::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(quantity: i64, medicine: &str, location: &str) -> Intent {
        Intent::AddStock {
            quantity,
            medicine: medicine.to_string(),
            location: location.to_string(),
        }
    }

    fn search(term: &str) -> Intent {
        Intent::Search {
            term: term.to_string(),
        }
    }

    #[test]
    fn test_add_variants() {
        assert_eq!(
            classify("Add 10 Aspirin to Shelf A"),
            add(10, "aspirin", "shelf a")
        );
        assert_eq!(classify("Put 5 Crocin in Shelf 1"), add(5, "crocin", "shelf 1"));
        assert_eq!(
            classify("  UPDATE 3 Vitamin C at Fridge  "),
            add(3, "vitamin c", "fridge")
        );
    }

    #[test]
    fn test_add_medicine_is_greedy_up_to_last_preposition() {
        assert_eq!(
            classify("add 2 cough syrup to go in box at top"),
            add(2, "cough syrup to go in box", "top")
        );
    }

    #[test]
    fn test_add_requires_a_number_and_a_preposition() {
        assert_eq!(classify("add aspirin to shelf a"), Intent::Unknown);
        assert_eq!(classify("add 10 aspirin"), Intent::Unknown);
    }

    #[test]
    fn test_oversized_quantity_falls_through() {
        assert_eq!(
            classify("add 99999999999999999999 aspirin to shelf a"),
            Intent::Unknown
        );
    }

    #[test]
    fn test_search_variants() {
        assert_eq!(classify("Where is Crocin?"), search("crocin"));
        assert_eq!(classify("find paracetamol"), search("paracetamol"));
        assert_eq!(classify("Search Aspirin ?"), search("aspirin"));
        assert_eq!(classify("locate vitamin c??"), search("vitamin c"));
    }

    #[test]
    fn test_add_takes_precedence_over_search() {
        assert_eq!(
            classify("add 4 find-me drops to shelf b"),
            add(4, "find-me drops", "shelf b")
        );
    }

    #[test]
    fn test_search_takes_precedence_over_list() {
        assert_eq!(classify("find listerine"), search("listerine"));
    }

    #[test]
    fn test_list_variants() {
        assert_eq!(classify("list inventory"), Intent::List);
        assert_eq!(classify("Show all"), Intent::List);
        assert_eq!(classify("can you LIST everything"), Intent::List);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify("hello there"), Intent::Unknown);
        assert_eq!(classify(""), Intent::Unknown);
        assert_eq!(Intent::Unknown.name(), "unknown");
    }
}
