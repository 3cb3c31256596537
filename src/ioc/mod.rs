//! Indicator-of-compromise database.
//!
//! The feed is CSV text: a header row, then one row per package with the
//! package name in column 0 and free text in column 1 from which every
//! `major.minor.patch` substring is taken as a malicious version.
//!
//! ```
//! use iocscan::IocDatabase;
//!
//! let db = IocDatabase::from_csv("Package,Version\nleft-pad,= 1.3.0 || = 1.3.1\n");
//! assert!(db.contains("left-pad", "1.3.1"));
//! assert!(!db.contains("left-pad", "1.2.0"));
//! ```

mod feed;

pub use feed::{FeedSource, FileFeed, HttpFeed, DEFAULT_FEED_URL};

use crate::matcher::{find_triples, parse_triple};
use std::collections::{BTreeMap, BTreeSet};

/// Known-malicious versions keyed by package name. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IocDatabase {
    packages: BTreeMap<String, BTreeSet<String>>,
}

impl IocDatabase {
    /// Builds the database from raw feed text.
    ///
    /// A package that appears on several rows keeps only the versions from
    /// its last row.
    pub fn from_csv(text: &str) -> Self {
        let mut packages = BTreeMap::new();

        for line in text.trim().lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let mut columns = line.split(',');
            let name = columns.next().unwrap_or_default().trim();
            if name.is_empty() {
                continue;
            }

            let versions: BTreeSet<String> = columns
                .next()
                .map(|raw| find_triples(raw).map(str::to_string).collect())
                .unwrap_or_default();

            if packages.insert(name.to_string(), versions).is_some() {
                tracing::debug!(package = name, "feed row replaces earlier entry");
            }
        }

        Self { packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn get(&self, package: &str) -> Option<&BTreeSet<String>> {
        self.packages.get(package)
    }

    /// Literal membership test, no range logic.
    pub fn contains(&self, package: &str, version: &str) -> bool {
        self.packages
            .get(package)
            .is_some_and(|versions| versions.contains(version))
    }

    /// Malicious versions of `package`, lowest first by numeric order.
    pub fn versions_ascending(&self, package: &str) -> Vec<&str> {
        let mut versions: Vec<&str> = self
            .packages
            .get(package)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default();
        versions.sort_by_key(|v| parse_triple(v));
        versions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "Package,Version\n\
        @ctrl/tinycolor,= 4.1.1 || = 4.1.2\n\
        \n\
        left-pad,  1.3.0\n\
        ngx-toastr , = 19.0.1\n";

    #[test]
    fn test_parse_feed() {
        let db = IocDatabase::from_csv(FEED);
        assert_eq!(db.len(), 3);
        assert!(db.contains("@ctrl/tinycolor", "4.1.1"));
        assert!(db.contains("@ctrl/tinycolor", "4.1.2"));
        assert!(db.contains("left-pad", "1.3.0"));
        assert!(db.contains("ngx-toastr", "19.0.1"));
        assert!(!db.contains("lodash", "4.17.21"));
    }

    #[test]
    fn test_header_row_is_discarded() {
        let db = IocDatabase::from_csv("left-pad,1.0.0\nright-pad,2.0.0\n");
        assert_eq!(db.len(), 1);
        assert!(db.get("left-pad").is_none());
        assert!(db.contains("right-pad", "2.0.0"));
    }

    #[test]
    fn test_recurring_package_replaces_versions() {
        let db = IocDatabase::from_csv("h,v\npkg,1.0.0 1.0.1\npkg,2.0.0\n");
        let versions = db.get("pkg").unwrap();
        assert_eq!(versions.len(), 1);
        assert!(versions.contains("2.0.0"));
        assert!(!db.contains("pkg", "1.0.0"));
    }

    #[test]
    fn test_row_without_versions() {
        let db = IocDatabase::from_csv("h,v\nlonely\nother,no version here\n");
        assert_eq!(db.len(), 2);
        assert!(db.get("lonely").unwrap().is_empty());
        assert!(db.get("other").unwrap().is_empty());
    }

    #[test]
    fn test_prerelease_suffix_ignored() {
        let db = IocDatabase::from_csv("h,v\npkg,= 3.0.0-beta.2\n");
        assert!(db.contains("pkg", "3.0.0"));
    }

    #[test]
    fn test_versions_ascending_is_numeric() {
        let db = IocDatabase::from_csv("h,v\npkg,1.10.0 1.9.0 1.2.0\n");
        assert_eq!(db.versions_ascending("pkg"), vec!["1.2.0", "1.9.0", "1.10.0"]);
        assert!(db.versions_ascending("missing").is_empty());
    }

    #[test]
    fn test_empty_feed() {
        assert!(IocDatabase::from_csv("").is_empty());
        assert!(IocDatabase::from_csv("Package,Version\n").is_empty());
    }
}
