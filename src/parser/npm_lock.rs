//! `package-lock.json` parser.
//!
//! Lockfile v2/v3 keeps installed packages under `packages`, keyed by install
//! path. v1 (and v2, for backwards compatibility) also has a nested
//! `dependencies` map keyed by package name:
//!
//! ```json
//! {
//!   "lockfileVersion": 2,
//!   "packages": {
//!     "": { "name": "my-app" },
//!     "node_modules/left-pad": { "version": "1.3.0" }
//!   },
//!   "dependencies": {
//!     "left-pad": { "version": "1.3.0" }
//!   }
//! }
//! ```

use serde_json::Value;

use super::ManifestParser;
use crate::error::ParseError;
use crate::model::{Dependencies, ManifestKind, VersionMap};

const INSTALL_PREFIX: &str = "node_modules/";

/// Parser for installed versions in `package-lock.json`.
pub struct NpmLockParser;

impl ManifestParser for NpmLockParser {
    fn kind(&self) -> ManifestKind {
        ManifestKind::NpmLock
    }

    fn parse(&self, content: &str) -> Result<Dependencies, ParseError> {
        let json: Value = serde_json::from_str(content)?;
        let root = json
            .as_object()
            .ok_or(ParseError::Schema("package-lock.json is not an object"))?;

        let mut installed = VersionMap::new();

        if let Some(packages) = root.get("packages").and_then(Value::as_object) {
            for (key, entry) in packages {
                if !key.starts_with(INSTALL_PREFIX) {
                    continue;
                }
                // Everything after the first separator, so nested installs
                // keep their full relative path.
                let name = key.split_once('/').map_or(key.as_str(), |(_, rest)| rest);
                if let Some(version) = version_of(entry) {
                    installed.insert(name.to_string(), version.to_string());
                }
            }
        }

        if let Some(deps) = root.get("dependencies").and_then(Value::as_object) {
            for (name, entry) in deps {
                if let Some(version) = version_of(entry) {
                    installed.insert(name.clone(), version.to_string());
                }
            }
        }

        Ok(Dependencies::Installed(installed))
    }
}

fn version_of(entry: &Value) -> Option<&str> {
    entry
        .get("version")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(content: &str) -> VersionMap {
        match NpmLockParser.parse(content).unwrap() {
            Dependencies::Installed(map) => map,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_packages_schema() {
        let map = installed(
            r#"{
                "lockfileVersion": 3,
                "packages": {
                    "": { "name": "my-app", "version": "1.0.0" },
                    "node_modules/left-pad": { "version": "1.3.0" },
                    "node_modules/@ctrl/tinycolor": { "version": "4.1.1" }
                }
            }"#,
        );

        assert_eq!(map.len(), 2);
        assert_eq!(map["left-pad"], "1.3.0");
        assert_eq!(map["@ctrl/tinycolor"], "4.1.1");
    }

    #[test]
    fn test_nested_install_keeps_relative_path() {
        let map = installed(
            r#"{
                "packages": {
                    "node_modules/a/node_modules/b": { "version": "2.0.0" }
                }
            }"#,
        );
        assert_eq!(map["a/node_modules/b"], "2.0.0");
    }

    #[test]
    fn test_legacy_dependencies_schema() {
        let map = installed(
            r#"{
                "lockfileVersion": 1,
                "dependencies": {
                    "left-pad": { "version": "1.3.0", "resolved": "https://..." },
                    "broken": "not an object"
                }
            }"#,
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map["left-pad"], "1.3.0");
    }

    #[test]
    fn test_legacy_schema_overwrites_packages() {
        let map = installed(
            r#"{
                "packages": { "node_modules/left-pad": { "version": "1.2.0" } },
                "dependencies": { "left-pad": { "version": "1.3.0" } }
            }"#,
        );
        assert_eq!(map["left-pad"], "1.3.0");
    }

    #[test]
    fn test_entries_without_version_skipped() {
        let map = installed(
            r#"{
                "packages": {
                    "node_modules/linked": { "link": true },
                    "node_modules/empty": { "version": "" },
                    "packages/local": { "version": "0.1.0" }
                }
            }"#,
        );
        assert!(map.is_empty());
    }
}
