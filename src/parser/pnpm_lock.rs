use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

use super::ManifestParser;
use crate::error::ParseError;
use crate::model::{Dependencies, ManifestKind, VersionMap};

/// `/name@1.2.3`, `name@1.2.3(peer@2.0.0)`, `/@scope/name@1.2.3`, ...
static PACKAGE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/?((?:@[^@/]+/)?[^@/]+)@(\d[\d.]*)").expect("static regex")
});

/// Parser for installed versions in `pnpm-lock.yaml`.
///
/// Reads the top-level `packages` mapping. An explicit `version` on an entry
/// takes precedence over the version embedded in its key.
pub struct PnpmLockParser;

impl ManifestParser for PnpmLockParser {
    fn kind(&self) -> ManifestKind {
        ManifestKind::PnpmLock
    }

    fn parse(&self, content: &str) -> Result<Dependencies, ParseError> {
        let yaml: Value = serde_yaml::from_str(content)?;
        if !yaml.is_mapping() {
            return Err(ParseError::Schema("pnpm-lock.yaml is not a mapping"));
        }

        let mut installed = VersionMap::new();

        let Some(packages) = yaml.get("packages").and_then(Value::as_mapping) else {
            return Ok(Dependencies::Installed(installed));
        };

        for (key, entry) in packages {
            let Some(key) = key.as_str() else {
                continue;
            };
            let Some(caps) = PACKAGE_KEY.captures(key) else {
                tracing::trace!(key, "unrecognized pnpm package key");
                continue;
            };

            let version = entry
                .get("version")
                .and_then(Value::as_str)
                .unwrap_or(&caps[2]);
            if !version.is_empty() {
                installed.insert(caps[1].to_string(), version.to_string());
            }
        }

        Ok(Dependencies::Installed(installed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installed(content: &str) -> VersionMap {
        match PnpmLockParser.parse(content).unwrap() {
            Dependencies::Installed(map) => map,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_v6_keys() {
        let map = installed(
            r#"
lockfileVersion: '6.0'
packages:
  /left-pad@1.3.0:
    resolution: {integrity: sha512-abc}
    dev: false
  /@ctrl/tinycolor@4.1.1:
    resolution: {integrity: sha512-def}
  /react-dom@18.2.0(react@18.2.0):
    resolution: {integrity: sha512-ghi}
"#,
        );

        assert_eq!(map.len(), 3);
        assert_eq!(map["left-pad"], "1.3.0");
        assert_eq!(map["@ctrl/tinycolor"], "4.1.1");
        assert_eq!(map["react-dom"], "18.2.0");
    }

    #[test]
    fn test_v9_keys_without_slash() {
        let map = installed(
            r#"
lockfileVersion: '9.0'
packages:
  chalk@5.6.1:
    resolution: {integrity: sha512-abc}
"#,
        );
        assert_eq!(map["chalk"], "5.6.1");
    }

    #[test]
    fn test_explicit_version_field_wins() {
        let map = installed(
            r#"
packages:
  /forked@1.0.0:
    version: 1.0.1-patched
"#,
        );
        assert_eq!(map["forked"], "1.0.1-patched");
    }

    #[test]
    fn test_unrecognized_keys_skipped() {
        let map = installed(
            r#"
packages:
  /old-style/1.0.0:
    resolution: {integrity: sha512-abc}
  /tarball@file:vendor/tarball.tgz:
    resolution: {integrity: sha512-def}
"#,
        );
        assert!(map.is_empty());
    }

    #[test]
    fn test_no_packages_section() {
        assert!(installed("lockfileVersion: '9.0'\nimporters: {}\n").is_empty());
    }

    #[test]
    fn test_rejects_non_mapping() {
        assert!(PnpmLockParser.parse("- a\n- b\n").is_err());
        assert!(PnpmLockParser.parse("packages: [unterminated").is_err());
    }
}
