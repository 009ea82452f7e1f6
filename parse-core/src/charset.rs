use std::{cmp::Ordering, fmt, ops::RangeInclusive};

const MAX: u32 = char::MAX as u32;

/// A set of characters, stored as sorted disjoint code point ranges.
///
/// ```
/// # use parse_core::CharSet;
/// let hex = CharSet::range('0'..='9')
///     .union(&CharSet::range('a'..='f'))
///     .union(&CharSet::range('A'..='F'));
/// assert!(hex.contains('c'));
/// assert!(!hex.inverted().contains('c'));
/// assert_eq!(hex.to_string(), "[0-9A-Fa-f]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharSet {
    ranges: Vec<(u32, u32)>,
}

impl CharSet {
    /// The set containing no characters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Exactly the characters of `chars`.
    pub fn chars(chars: &str) -> Self {
        Self::from_ranges(chars.chars().map(|c| (c as u32, c as u32)))
    }

    pub fn range(range: RangeInclusive<char>) -> Self {
        Self::from_ranges([(*range.start() as u32, *range.end() as u32)])
    }

    pub fn union(&self, other: &CharSet) -> Self {
        Self::from_ranges(self.ranges.iter().chain(&other.ranges).copied())
    }

    /// Every character not in `self`.
    pub fn inverted(&self) -> Self {
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0;
        for &(start, end) in &self.ranges {
            if start > next {
                ranges.push((next, start - 1));
            }
            next = end + 1;
        }
        if next <= MAX {
            ranges.push((next, MAX));
        }
        Self { ranges }
    }

    pub fn contains(&self, c: char) -> bool {
        let c = c as u32;
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < c {
                    Ordering::Less
                } else if start > c {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    fn from_ranges(ranges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut sorted: Vec<_> = ranges.into_iter().filter(|(s, e)| s <= e).collect();
        sorted.sort_unstable();
        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(sorted.len());
        for (start, end) in sorted {
            match merged.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        Self { ranges: merged }
    }
}

impl FromIterator<char> for CharSet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self::from_ranges(iter.into_iter().map(|c| (c as u32, c as u32)))
    }
}

fn write_code_point(f: &mut fmt::Formatter<'_>, code_point: u32) -> fmt::Result {
    match char::from_u32(code_point) {
        Some(c) => write!(f, "{}", c.escape_debug()),
        None => write!(f, "\\u{{{code_point:x}}}"),
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for &(start, end) in &self.ranges {
            write_code_point(f, start)?;
            if end > start {
                if end > start + 1 {
                    f.write_str("-")?;
                }
                write_code_point(f, end)?;
            }
        }
        f.write_str("]")
    }
}
