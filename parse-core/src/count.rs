use std::fmt;

/// How many repetitions a repeating parser must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLimit {
    AtLeast(usize),
    AtMost(usize),
    Between(usize, usize),
    Exactly(usize),
}

impl CountLimit {
    pub fn at_least(n: usize) -> Self {
        CountLimit::AtLeast(n)
    }

    pub fn at_most(n: usize) -> Self {
        CountLimit::AtMost(n)
    }

    pub fn between(min: usize, max: usize) -> Self {
        CountLimit::Between(min, max)
    }

    pub fn exactly(n: usize) -> Self {
        CountLimit::Exactly(n)
    }

    /// The fewest repetitions that satisfy the limit.
    pub fn min(&self) -> usize {
        match *self {
            CountLimit::AtLeast(n) | CountLimit::Exactly(n) | CountLimit::Between(n, _) => n,
            CountLimit::AtMost(_) => 0,
        }
    }

    /// The most repetitions worth attempting, if bounded.
    pub fn max(&self) -> Option<usize> {
        match *self {
            CountLimit::AtLeast(_) => None,
            CountLimit::AtMost(n) | CountLimit::Exactly(n) | CountLimit::Between(_, n) => Some(n),
        }
    }

    pub fn admits(&self, count: usize) -> bool {
        count >= self.min() && self.max().map_or(true, |max| count <= max)
    }

    /// Whether another repetition may still be attempted after `count`.
    pub fn wants_more(&self, count: usize) -> bool {
        self.max().map_or(true, |max| count < max)
    }
}

impl Default for CountLimit {
    fn default() -> Self {
        CountLimit::AtLeast(0)
    }
}

impl fmt::Display for CountLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountLimit::AtLeast(n) => write!(f, "at least {n}"),
            CountLimit::AtMost(n) => write!(f, "at most {n}"),
            CountLimit::Between(min, max) => write!(f, "between {min} and {max}"),
            CountLimit::Exactly(n) => write!(f, "exactly {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(CountLimit::at_least(2), 1, false)]
    #[case(CountLimit::at_least(2), 9, true)]
    #[case(CountLimit::at_most(2), 0, true)]
    #[case(CountLimit::at_most(2), 3, false)]
    #[case(CountLimit::between(1, 3), 3, true)]
    #[case(CountLimit::between(1, 3), 0, false)]
    #[case(CountLimit::exactly(2), 2, true)]
    #[case(CountLimit::exactly(2), 1, false)]
    fn admits(#[case] limit: CountLimit, #[case] count: usize, #[case] expected: bool) {
        assert_eq!(limit.admits(count), expected);
    }

    #[test]
    fn bounded_limits_stop_asking() {
        assert!(CountLimit::exactly(2).wants_more(1));
        assert!(!CountLimit::exactly(2).wants_more(2));
        assert!(CountLimit::at_least(2).wants_more(100));
    }

    #[test]
    fn renders_as_prose() {
        assert_eq!(CountLimit::between(2, 4).to_string(), "between 2 and 4");
        assert_eq!(CountLimit::at_least(1).to_string(), "at least 1");
    }
}
