//! Version parsing and comparison.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A dotted version number. Missing components are zero, so "3.8"
/// compares equal to "3.8.0".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").expect("version regex"))
}

impl Version {
    /// Parse a bare version string ("3.8", "3.11.4").
    ///
    /// Returns None unless the string is only a version number, so manifest
    /// typos like "latest" or ">=3.8" are rejected rather than misread.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let captures = version_regex().captures(s)?;
        if captures.get(0)?.as_str() != s {
            return None;
        }
        Some(Self::from_captures(&captures))
    }

    /// Extract the first version number from arbitrary text, e.g. the
    /// output of `python --version` ("Python 3.11.4").
    pub fn extract(text: &str) -> Option<Self> {
        let captures = version_regex().captures(text)?;
        Some(Self::from_captures(&captures))
    }

    fn from_captures(captures: &regex::Captures<'_>) -> Self {
        let part = |i: usize| {
            captures
                .get(i)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        Self {
            major: part(1),
            minor: part(2),
            patch: part(3),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_version() {
        let v = Version::parse("3.11.4").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (3, 11, 4));
    }

    #[test]
    fn parse_two_component_version() {
        let v = Version::parse("3.8").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (3, 8, 0));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Version::parse("latest").is_none());
        assert!(Version::parse(">=3.8").is_none());
        assert!(Version::parse("3.8 or so").is_none());
    }

    #[test]
    fn extract_from_interpreter_output() {
        let v = Version::extract("Python 3.11.4\n").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (3, 11, 4));
    }

    #[test]
    fn extract_returns_none_without_version() {
        assert!(Version::extract("command not found").is_none());
    }

    #[test]
    fn ordering_compares_numerically() {
        let old = Version::parse("3.9").unwrap();
        let new = Version::parse("3.10").unwrap();
        assert!(old < new);
    }

    #[test]
    fn two_component_equals_zero_patch() {
        assert_eq!(Version::parse("3.8").unwrap(), Version::parse("3.8.0").unwrap());
    }

    #[test]
    fn display_is_three_component() {
        assert_eq!(Version::parse("3.8").unwrap().to_string(), "3.8.0");
    }
}
