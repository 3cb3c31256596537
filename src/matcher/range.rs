use regex::{Captures, Regex};
use semver::Version;
use std::sync::LazyLock;

use super::version::{find_triple, parse_triple};

static EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=?\s*(\d+\.\d+\.\d+)$").expect("static regex"));
static CARET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\^(\d+)\.(\d+)\.(\d+)$").expect("static regex"));
static TILDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^~(\d+)\.(\d+)\.(\d+)$").expect("static regex"));
static WILDCARD_MAJOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.[xX*](?:\.[xX*])?$").expect("static regex"));
static WILDCARD_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)\.[xX*]$").expect("static regex"));
static COMPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(>=|<=|>|<)\s*(\d+\.\d+\.\d+)$").expect("static regex"));
static HYPHEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.\d+\.\d+)\s*-\s*(\d+\.\d+\.\d+)$").expect("static regex")
});

/// Single-bound comparison operator. Plain `=` and bare versions are
/// classified as [`Clause::Exact`] before comparators are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gte,
    Gt,
    Lte,
    Lt,
}

impl Comparator {
    fn from_op(op: &str) -> Option<Self> {
        match op {
            ">=" => Some(Comparator::Gte),
            ">" => Some(Comparator::Gt),
            "<=" => Some(Comparator::Lte),
            "<" => Some(Comparator::Lt),
            _ => None,
        }
    }

    fn holds(&self, version: &Version, bound: &Version) -> bool {
        match self {
            Comparator::Gte => version >= bound,
            Comparator::Gt => version > bound,
            Comparator::Lte => version <= bound,
            Comparator::Lt => version < bound,
        }
    }
}

/// One `||` branch of a range specifier.
///
/// `Caret`, `Tilde` and `Wildcard` are half-open `[lower, upper)`; `Hyphen`
/// is closed on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Exact(Version),
    Caret { lower: Version, upper: Version },
    Tilde { lower: Version, upper: Version },
    Wildcard { lower: Version, upper: Version },
    Comparator(Comparator, Version),
    Hyphen { lower: Version, upper: Version },
    /// No shape matched, but the text contains a triple. Exact match on it.
    Loose(Version),
}

impl Clause {
    /// Classifies a trimmed clause. Shapes are tried in a fixed order and the
    /// first one that matches the whole clause wins.
    ///
    /// Returns `None` for clauses that match no shape and contain no triple,
    /// or whose numbers do not fit.
    pub fn parse(clause: &str) -> Option<Clause> {
        let clause = clause.trim();
        if clause.is_empty() {
            return None;
        }

        if let Some(caps) = EXACT.captures(clause) {
            return parse_triple(&caps[1]).map(Clause::Exact);
        }

        if let Some(caps) = CARET.captures(clause) {
            let (major, minor, patch) = numbers(&caps)?;
            return Some(Clause::Caret {
                lower: Version::new(major, minor, patch),
                upper: Version::new(major.checked_add(1)?, 0, 0),
            });
        }

        if let Some(caps) = TILDE.captures(clause) {
            let (major, minor, patch) = numbers(&caps)?;
            return Some(Clause::Tilde {
                lower: Version::new(major, minor, patch),
                upper: Version::new(major, minor.checked_add(1)?, 0),
            });
        }

        if let Some(caps) = WILDCARD_MAJOR.captures(clause) {
            let major: u64 = caps[1].parse().ok()?;
            return Some(Clause::Wildcard {
                lower: Version::new(major, 0, 0),
                upper: Version::new(major.checked_add(1)?, 0, 0),
            });
        }

        if let Some(caps) = WILDCARD_MINOR.captures(clause) {
            let major: u64 = caps[1].parse().ok()?;
            let minor: u64 = caps[2].parse().ok()?;
            return Some(Clause::Wildcard {
                lower: Version::new(major, minor, 0),
                upper: Version::new(major, minor.checked_add(1)?, 0),
            });
        }

        if let Some(caps) = COMPARATOR.captures(clause) {
            let op = Comparator::from_op(&caps[1])?;
            return parse_triple(&caps[2]).map(|v| Clause::Comparator(op, v));
        }

        if let Some(caps) = HYPHEN.captures(clause) {
            return Some(Clause::Hyphen {
                lower: parse_triple(&caps[1])?,
                upper: parse_triple(&caps[2])?,
            });
        }

        find_triple(clause).and_then(parse_triple).map(Clause::Loose)
    }

    pub fn admits(&self, version: &Version) -> bool {
        match self {
            Clause::Exact(v) | Clause::Loose(v) => version == v,
            Clause::Caret { lower, upper }
            | Clause::Tilde { lower, upper }
            | Clause::Wildcard { lower, upper } => version >= lower && version < upper,
            Clause::Comparator(op, bound) => op.holds(version, bound),
            Clause::Hyphen { lower, upper } => version >= lower && version <= upper,
        }
    }
}

/// A parsed range specifier: the `||` alternatives that could be classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeExpr {
    pub clauses: Vec<Clause>,
}

impl RangeExpr {
    pub fn parse(expr: &str) -> Self {
        let clauses = expr
            .split("||")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .filter_map(|c| {
                let parsed = Clause::parse(c);
                if parsed.is_none() {
                    tracing::trace!(clause = c, "unrecognized range clause");
                }
                parsed
            })
            .collect();
        Self { clauses }
    }

    pub fn admits(&self, version: &Version) -> bool {
        self.clauses.iter().any(|clause| clause.admits(version))
    }
}

fn numbers(caps: &Captures<'_>) -> Option<(u64, u64, u64)> {
    Some((
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u64, minor: u64, patch: u64) -> Version {
        Version::new(major, minor, patch)
    }

    #[test]
    fn test_classify_shapes() {
        assert_eq!(Clause::parse("1.2.3"), Some(Clause::Exact(v(1, 2, 3))));
        assert_eq!(Clause::parse("=1.2.3"), Some(Clause::Exact(v(1, 2, 3))));
        assert_eq!(
            Clause::parse("^1.2.3"),
            Some(Clause::Caret {
                lower: v(1, 2, 3),
                upper: v(2, 0, 0)
            })
        );
        assert_eq!(
            Clause::parse("~1.2.3"),
            Some(Clause::Tilde {
                lower: v(1, 2, 3),
                upper: v(1, 3, 0)
            })
        );
        assert_eq!(
            Clause::parse("3.x"),
            Some(Clause::Wildcard {
                lower: v(3, 0, 0),
                upper: v(4, 0, 0)
            })
        );
        assert_eq!(
            Clause::parse("3.1.*"),
            Some(Clause::Wildcard {
                lower: v(3, 1, 0),
                upper: v(3, 2, 0)
            })
        );
        assert_eq!(
            Clause::parse("<= 2.0.0"),
            Some(Clause::Comparator(Comparator::Lte, v(2, 0, 0)))
        );
        assert_eq!(
            Clause::parse("1.0.0 - 2.0.0"),
            Some(Clause::Hyphen {
                lower: v(1, 0, 0),
                upper: v(2, 0, 0)
            })
        );
        assert_eq!(
            Clause::parse("npm:other@4.1.0"),
            Some(Clause::Loose(v(4, 1, 0)))
        );
    }

    #[test]
    fn test_compound_clause_falls_back_to_first_triple() {
        assert_eq!(
            Clause::parse(">=1.2.3 <2.0.0"),
            Some(Clause::Loose(v(1, 2, 3)))
        );
    }

    #[test]
    fn test_unrecognized_clauses() {
        assert_eq!(Clause::parse(""), None);
        assert_eq!(Clause::parse("*"), None);
        assert_eq!(Clause::parse("^1"), None);
        assert_eq!(Clause::parse("github:user/repo"), None);
    }

    #[test]
    fn test_overflowing_bound_is_malformed() {
        let max = u64::MAX.to_string();
        assert_eq!(Clause::parse(&format!("^{}.0.0", max)), None);
        assert_eq!(Clause::parse(&format!("~1.{}.0", max)), None);
    }

    #[test]
    fn test_range_expr_skips_malformed_clauses() {
        let expr = RangeExpr::parse("latest || ^2.0.0 ||  || *");
        assert_eq!(expr.clauses.len(), 1);
        assert!(expr.admits(&v(2, 3, 4)));
        assert!(!expr.admits(&v(1, 0, 0)));
    }

    #[test]
    fn test_empty_range_expr() {
        let expr = RangeExpr::parse("");
        assert!(expr.clauses.is_empty());
        assert!(!expr.admits(&v(0, 0, 0)));
    }
}
