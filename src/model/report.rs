use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ManifestFile;

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hit {
    /// A lockfile pins a version that is in the malicious set.
    InstalledExact {
        package: String,
        version: String,
        file: PathBuf,
    },
    /// A declared range would admit a malicious version.
    RangeVulnerable {
        package: String,
        range: String,
        malicious_version: String,
        file: PathBuf,
    },
    ArtifactFile {
        path: PathBuf,
    },
    ArtifactDirectory {
        path: PathBuf,
    },
}

impl Hit {
    pub fn package(&self) -> Option<&str> {
        match self {
            Hit::InstalledExact { package, .. } | Hit::RangeVulnerable { package, .. } => {
                Some(package)
            }
            Hit::ArtifactFile { .. } | Hit::ArtifactDirectory { .. } => None,
        }
    }
}

/// Accumulated results of one scan run.
///
/// Hits are append-only and kept in discovery order: artifacts in traversal
/// order first, then package findings in per-file processing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_time: DateTime<Utc>,
    pub root: PathBuf,
    pub manifest_files: Vec<ManifestFile>,
    /// Number of packages in the indicator database.
    pub tracked_packages: usize,
    pub hits: Vec<Hit>,
}

impl ScanReport {
    pub fn new(root: impl Into<PathBuf>, tracked_packages: usize) -> Self {
        Self {
            scan_time: Utc::now(),
            root: root.into(),
            manifest_files: Vec::new(),
            tracked_packages,
            hits: Vec::new(),
        }
    }

    pub fn record(&mut self, hit: Hit) {
        self.hits.push(hit);
    }

    pub fn has_findings(&self) -> bool {
        !self.hits.is_empty()
    }

    pub fn installed_hits(&self) -> impl Iterator<Item = &Hit> {
        self.hits
            .iter()
            .filter(|h| matches!(h, Hit::InstalledExact { .. }))
    }

    pub fn range_hits(&self) -> impl Iterator<Item = &Hit> {
        self.hits
            .iter()
            .filter(|h| matches!(h, Hit::RangeVulnerable { .. }))
    }

    pub fn artifact_files(&self) -> impl Iterator<Item = &Hit> {
        self.hits
            .iter()
            .filter(|h| matches!(h, Hit::ArtifactFile { .. }))
    }

    pub fn artifact_dirs(&self) -> impl Iterator<Item = &Hit> {
        self.hits
            .iter()
            .filter(|h| matches!(h, Hit::ArtifactDirectory { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_starts_clean() {
        let report = ScanReport::new("/tmp/project", 42);
        assert!(!report.has_findings());
        assert_eq!(report.tracked_packages, 42);
        assert!(report.manifest_files.is_empty());
    }

    #[test]
    fn test_report_keeps_discovery_order() {
        let mut report = ScanReport::new("/p", 1);
        report.record(Hit::ArtifactDirectory {
            path: "/p/.truffler-cache".into(),
        });
        report.record(Hit::InstalledExact {
            package: "left-pad".to_string(),
            version: "1.3.0".to_string(),
            file: "/p/package-lock.json".into(),
        });
        report.record(Hit::ArtifactFile {
            path: "/p/bun_environment.js".into(),
        });

        assert_eq!(report.hits.len(), 3);
        assert!(matches!(report.hits[0], Hit::ArtifactDirectory { .. }));
        assert_eq!(report.installed_hits().count(), 1);
        assert_eq!(report.range_hits().count(), 0);
        assert_eq!(report.artifact_files().count(), 1);
        assert_eq!(report.artifact_dirs().count(), 1);
        assert_eq!(report.hits[1].package(), Some("left-pad"));
        assert_eq!(report.hits[2].package(), None);
    }

    #[test]
    fn test_hit_serializes_with_kind_tag() {
        let hit = Hit::RangeVulnerable {
            package: "chalk".to_string(),
            range: "^5.0.0".to_string(),
            malicious_version: "5.6.1".to_string(),
            file: "package.json".into(),
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["kind"], "range_vulnerable");
        assert_eq!(json["malicious_version"], "5.6.1");
    }
}
