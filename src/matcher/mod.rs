//! Version-range satisfiability.
//!
//! Decides whether a declared npm range specifier would permit installing a
//! given malicious version. The grammar covered is the common subset seen in
//! real manifests: exact, caret, tilde, wildcard, single comparator, hyphen
//! ranges, and `||` alternatives.
//!
//! Each `||` branch is classified into exactly one [`Clause`]. Space-separated
//! constraints inside a branch are not intersected: `>=1.0.0 <2.0.0` only
//! matches `1.0.0` exactly, through the [`Clause::Loose`] fallback.
//!
//! # Example
//!
//! ```
//! use iocscan::matcher::admits;
//!
//! assert!(admits("^1.2.3", "1.9.9"));
//! assert!(!admits("^1.2.3", "2.0.0"));
//! assert!(admits("^1.0.0 || ^2.0.0", "2.5.0"));
//! ```

mod range;
mod version;

pub use range::{Clause, Comparator, RangeExpr};
pub use version::{find_triple, find_triples, parse_triple};

/// Returns true if `range` admits `malicious_version`.
///
/// An empty range never admits, and neither does a version that is not a
/// plain `major.minor.patch` triple.
pub fn admits(range: &str, malicious_version: &str) -> bool {
    match parse_triple(malicious_version) {
        Some(version) => RangeExpr::parse(range).admits(&version),
        None => false,
    }
}
