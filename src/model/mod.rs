//! Core data types for manifests, findings, and scan reports.
//!
//! - [`ManifestKind`] / [`ManifestFile`] - a recognized manifest or lockfile
//! - [`Dependencies`] - what a parser extracted from one file
//! - [`Hit`] - a single finding
//! - [`ScanReport`] - everything a run found, in discovery order
//!
//! # Example
//!
//! ```
//! use iocscan::{Hit, ScanReport};
//!
//! let mut report = ScanReport::new("/srv/app", 3);
//! report.record(Hit::ArtifactFile { path: "/srv/app/bun_environment.js".into() });
//!
//! assert!(report.has_findings());
//! assert_eq!(report.artifact_files().count(), 1);
//! ```

mod manifest;
mod report;

pub use manifest::*;
pub use report::*;
