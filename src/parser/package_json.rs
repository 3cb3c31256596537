use serde_json::Value;

use super::ManifestParser;
use crate::error::ParseError;
use crate::model::{Dependencies, ManifestKind, VersionMap};

/// Dependency sections read from `package.json`, in merge order.
const SECTIONS: [&str; 3] = ["dependencies", "devDependencies", "peerDependencies"];

/// Parser for declared ranges in `package.json`.
///
/// The three sections are merged into one map. A package listed in more than
/// one section keeps the range from the last section.
pub struct PackageJsonParser;

impl ManifestParser for PackageJsonParser {
    fn kind(&self) -> ManifestKind {
        ManifestKind::PackageJson
    }

    fn parse(&self, content: &str) -> Result<Dependencies, ParseError> {
        let json: Value = serde_json::from_str(content)?;
        let root = json
            .as_object()
            .ok_or(ParseError::Schema("package.json is not an object"))?;

        let mut declared = VersionMap::new();
        for section in SECTIONS {
            let Some(deps) = root.get(section).and_then(Value::as_object) else {
                continue;
            };
            for (name, range) in deps {
                // Workspace tooling sometimes writes objects here; skip them.
                if let Some(range) = range.as_str() {
                    declared.insert(name.clone(), range.to_string());
                }
            }
        }

        Ok(Dependencies::Declared(declared))
    }
}
