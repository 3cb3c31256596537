use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

static TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("static regex"));

/// Parses a string that is exactly `major.minor.patch` (surrounding whitespace
/// allowed). Pre-release and build suffixes are rejected.
pub fn parse_triple(s: &str) -> Option<Version> {
    let mut parts = s.trim().split('.');
    let major = parse_component(parts.next()?)?;
    let minor = parse_component(parts.next()?)?;
    let patch = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(Version::new(major, minor, patch))
}

/// Returns the first `major.minor.patch` substring of `text`.
pub fn find_triple(text: &str) -> Option<&str> {
    TRIPLE.find(text).map(|m| m.as_str())
}

/// Returns every `major.minor.patch` substring of `text`, in order.
pub fn find_triples(text: &str) -> impl Iterator<Item = &str> {
    TRIPLE.find_iter(text).map(|m| m.as_str())
}

fn parse_component(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
