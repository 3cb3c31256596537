//! `yarn.lock` parser.
//!
//! Both classic (v1) and berry lockfiles are plain-text blocks separated by
//! blank lines. The header names every range the block satisfies:
//!
//! ```text
//! "@babel/core@^7.0.0", "@babel/core@^7.1.0":
//!   version "7.1.2"
//!   resolved "https://registry.yarnpkg.com/@babel/core/-/core-7.1.2.tgz"
//!
//! "lodash@npm:^4.17.21":
//!   version: 4.17.21
//! ```

use regex::Regex;
use std::sync::LazyLock;

use super::ManifestParser;
use crate::error::ParseError;
use crate::model::{Dependencies, ManifestKind, VersionMap};

static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*version:?[ \t]+"?([^"\n]+)"?"#).expect("static regex")
});

/// Parser for installed versions in `yarn.lock`.
///
/// Blocks for different ranges of the same package collapse onto one name;
/// the last block wins.
pub struct YarnLockParser;

impl ManifestParser for YarnLockParser {
    fn kind(&self) -> ManifestKind {
        ManifestKind::YarnLock
    }

    fn parse(&self, content: &str) -> Result<Dependencies, ParseError> {
        let content = content.replace("\r\n", "\n");
        let mut installed = VersionMap::new();

        for block in blocks(&content) {
            let Some(name) = block.first().and_then(|header| package_name(header)) else {
                continue;
            };
            let body = block[1..].join("\n");
            if let Some(caps) = VERSION_LINE.captures(&body) {
                let version = caps[1].trim();
                if !version.is_empty() {
                    installed.insert(name.to_string(), version.to_string());
                }
            }
        }

        Ok(Dependencies::Installed(installed))
    }
}

/// Groups non-comment lines into blank-line separated blocks.
fn blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        if line.trim_start().starts_with('#') {
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Bare package name from a block header, e.g. `"@scope/pkg@^1.0.0", ...:`
/// gives `@scope/pkg`.
fn package_name(header: &str) -> Option<&str> {
    if header.starts_with(char::is_whitespace) {
        return None;
    }
    let header = header.trim_end().strip_suffix(':')?;
    let first = header.split(',').next()?.trim().trim_matches('"');

    let name = match first.strip_prefix('@') {
        Some(rest) => match rest.find('@') {
            Some(pos) => &first[..pos + 1],
            None => first,
        },
        None => first.split('@').next().unwrap_or(first),
    };

    (!name.is_empty()).then_some(name)
}
