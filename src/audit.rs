//! Cross-references a project tree against the indicator database.
//!
//! ```no_run
//! use iocscan::{audit::Auditor, IocDatabase};
//! use std::path::Path;
//!
//! let db = IocDatabase::from_csv("Package,Version\nleft-pad,1.3.0\n");
//! let report = Auditor::new(&db).audit(Path::new("./my-project"));
//!
//! for hit in &report.hits {
//!     println!("{:?}", hit);
//! }
//! ```

use std::path::Path;

use crate::config::IgnoreConfig;
use crate::ioc::IocDatabase;
use crate::matcher::admits;
use crate::model::{Dependencies, Hit, ManifestFile, ScanReport, VersionMap};
use crate::parser::parse_manifest;
use crate::walker;

/// Runs one scan against a shared, read-only database.
pub struct Auditor<'a> {
    db: &'a IocDatabase,
    ignore: IgnoreConfig,
}

impl<'a> Auditor<'a> {
    pub fn new(db: &'a IocDatabase) -> Self {
        Self {
            db,
            ignore: IgnoreConfig::default(),
        }
    }

    pub fn with_ignore(mut self, ignore: IgnoreConfig) -> Self {
        self.ignore = ignore;
        self
    }

    /// Walks `root`, records artifacts, then checks every manifest in
    /// traversal order.
    pub fn audit(&self, root: &Path) -> ScanReport {
        let outcome = walker::walk(root);
        let mut report = ScanReport::new(root, self.db.len());

        for path in outcome.artifact_files {
            report.record(Hit::ArtifactFile { path });
        }
        for path in outcome.artifact_dirs {
            report.record(Hit::ArtifactDirectory { path });
        }

        for file in &outcome.manifests {
            self.check_file(file, &mut report);
        }
        report.manifest_files = outcome.manifests;

        tracing::info!(hits = report.hits.len(), "audit complete");
        report
    }

    /// Checks one manifest and appends its hits to `report`.
    pub fn check_file(&self, file: &ManifestFile, report: &mut ScanReport) {
        match parse_manifest(file) {
            Dependencies::Installed(installed) => self.check_installed(file, &installed, report),
            Dependencies::Declared(declared) => self.check_declared(file, &declared, report),
        }
    }

    fn check_installed(
        &self,
        file: &ManifestFile,
        installed: &VersionMap,
        report: &mut ScanReport,
    ) {
        for (package, version) in installed {
            if !self.db.contains(package, version) || self.ignored(package) {
                continue;
            }
            tracing::debug!(
                package = %package,
                version = %version,
                path = %file.path.display(),
                "installed version is malicious"
            );
            report.record(Hit::InstalledExact {
                package: package.clone(),
                version: version.clone(),
                file: file.path.clone(),
            });
        }
    }

    fn check_declared(
        &self,
        file: &ManifestFile,
        declared: &VersionMap,
        report: &mut ScanReport,
    ) {
        for (package, range) in declared {
            if self.db.get(package).is_none() || self.ignored(package) {
                continue;
            }
            let first_admitted = self
                .db
                .versions_ascending(package)
                .into_iter()
                .find(|malicious| admits(range, malicious));

            if let Some(malicious) = first_admitted {
                tracing::debug!(
                    package = %package,
                    range = %range,
                    malicious,
                    path = %file.path.display(),
                    "declared range admits malicious version"
                );
                report.record(Hit::RangeVulnerable {
                    package: package.clone(),
                    range: range.clone(),
                    malicious_version: malicious.to_string(),
                    file: file.path.clone(),
                });
            }
        }
    }

    fn ignored(&self, package: &str) -> bool {
        let ignored = self.ignore.should_ignore_package(package);
        if ignored {
            tracing::debug!(package, "finding suppressed by ignore list");
        }
        ignored
    }
}
