//! Anchored regular-expression matching for text terminals.

use regex_automata::Anchored;

pub use regex_automata::meta::Regex;

/// What a prefix match produced: the whole matched text and every capture
/// group after the implicit group 0, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures {
    pub text: String,
    pub groups: Vec<Option<String>>,
}

impl Captures {
    /// The text of capture group `index` (1-based), if it participated.
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index.checked_sub(1)?)?.as_deref()
    }
}

/// A matcher that can match at a fixed position of a haystack.
///
/// The match must start exactly at `start`; a matcher that would find one
/// further along reports no match.
pub trait PrefixMatcher {
    fn match_prefix(&self, haystack: &str, start: usize) -> Option<Captures>;
}

impl PrefixMatcher for Regex {
    fn match_prefix(&self, haystack: &str, start: usize) -> Option<Captures> {
        let input = regex_automata::Input::new(haystack)
            .range(start..)
            .anchored(Anchored::Yes);
        let mut captures = self.create_captures();
        self.search_captures(&input, &mut captures);
        let whole = captures.get_match()?;
        let groups = (1..captures.group_len())
            .map(|index| {
                captures
                    .get_group(index)
                    .map(|span| haystack[span.range()].to_owned())
            })
            .collect();
        Some(Captures {
            text: haystack[whole.range()].to_owned(),
            groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_at_the_start_position() {
        let regex = Regex::new(r"[0-9]+").unwrap();
        assert_eq!(regex.match_prefix("ab12", 0), None);
        let captures = regex.match_prefix("ab12", 2).unwrap();
        assert_eq!(captures.text, "12");
        assert!(captures.groups.is_empty());
    }

    #[test]
    fn reports_groups_in_order() {
        let regex = Regex::new(r"(\w+)@(\w+)?").unwrap();
        let captures = regex.match_prefix("user@", 0).unwrap();
        assert_eq!(captures.text, "user@");
        assert_eq!(captures.group(1), Some("user"));
        assert_eq!(captures.group(2), None);
        assert_eq!(captures.groups.len(), 2);
    }
}
