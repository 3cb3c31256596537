//! Manifest and lockfile parsers.
//!
//! | Parser | File | Produces |
//! |--------|------|----------|
//! | [`PackageJsonParser`] | `package.json` | declared ranges |
//! | [`NpmLockParser`] | `package-lock.json` | installed versions |
//! | [`YarnLockParser`] | `yarn.lock` | installed versions |
//! | [`PnpmLockParser`] | `pnpm-lock.yaml` | installed versions |
//!
//! Every parser maps package names to a single version string; when a name
//! occurs more than once the later occurrence wins.
//!
//! # Example
//!
//! ```
//! use iocscan::model::{Dependencies, ManifestKind};
//! use iocscan::parser::get_parser;
//!
//! let parser = get_parser(ManifestKind::NpmLock);
//! let deps = parser
//!     .parse(r#"{"packages": {"node_modules/left-pad": {"version": "1.3.0"}}}"#)
//!     .unwrap();
//!
//! match deps {
//!     Dependencies::Installed(map) => assert_eq!(map["left-pad"], "1.3.0"),
//!     Dependencies::Declared(_) => unreachable!(),
//! }
//! ```

mod npm_lock;
mod package_json;
mod pnpm_lock;
mod yarn_lock;

pub use npm_lock::NpmLockParser;
pub use package_json::PackageJsonParser;
pub use pnpm_lock::PnpmLockParser;
pub use yarn_lock::YarnLockParser;

use crate::error::ParseError;
use crate::model::{Dependencies, ManifestFile, ManifestKind};
use std::fs;

/// Extracts dependencies from the contents of one file format.
pub trait ManifestParser: Send + Sync {
    /// The file format this parser handles.
    fn kind(&self) -> ManifestKind;

    /// Parses file contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents are not valid for the format.
    fn parse(&self, content: &str) -> Result<Dependencies, ParseError>;
}

/// Returns the parser for a file kind.
pub fn get_parser(kind: ManifestKind) -> Box<dyn ManifestParser> {
    match kind {
        ManifestKind::PackageJson => Box::new(PackageJsonParser),
        ManifestKind::NpmLock => Box::new(NpmLockParser),
        ManifestKind::YarnLock => Box::new(YarnLockParser),
        ManifestKind::PnpmLock => Box::new(PnpmLockParser),
    }
}

/// Reads and parses a manifest file.
///
/// Never fails: an unreadable or malformed file yields an empty map of the
/// right flavour so the scan can move on to the next file.
pub fn parse_manifest(file: &ManifestFile) -> Dependencies {
    match read_and_parse(file) {
        Ok(deps) => deps,
        Err(err) => {
            tracing::debug!(
                path = %file.path.display(),
                error = %err,
                "treating manifest as empty"
            );
            Dependencies::empty(file.kind)
        }
    }
}

fn read_and_parse(file: &ManifestFile) -> Result<Dependencies, ParseError> {
    let bytes = fs::read(&file.path).map_err(|source| ParseError::Io {
        path: file.path.clone(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    get_parser(file.kind).parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VersionMap;

    #[test]
    fn test_get_parser_kinds() {
        for kind in ManifestKind::ALL {
            assert_eq!(get_parser(kind).kind(), kind);
        }
    }

    #[test]
    fn test_parse_manifest_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = ManifestFile::new(dir.path().join("package.json"), ManifestKind::PackageJson);

        assert_eq!(
            parse_manifest(&file),
            Dependencies::Declared(VersionMap::new())
        );
    }

    #[test]
    fn test_parse_manifest_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package-lock.json");
        fs::write(&path, "{ this is not json").unwrap();
        let file = ManifestFile::new(path, ManifestKind::NpmLock);

        assert_eq!(
            parse_manifest(&file),
            Dependencies::Installed(VersionMap::new())
        );
    }

    #[test]
    fn test_parse_manifest_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        let mut bytes = br#"{"description": ""#.to_vec();
        bytes.push(0xff);
        bytes.extend_from_slice(br#"", "dependencies": {"chalk": "^5.0.0"}}"#);
        fs::write(&path, bytes).unwrap();
        let file = ManifestFile::new(path, ManifestKind::PackageJson);

        match parse_manifest(&file) {
            Dependencies::Declared(map) => assert_eq!(map["chalk"], "^5.0.0"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
