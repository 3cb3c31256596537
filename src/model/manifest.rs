use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The four file formats the scanner understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManifestKind {
    /// `package.json`, declared version ranges.
    PackageJson,
    /// `package-lock.json`, installed versions.
    NpmLock,
    /// `yarn.lock`, installed versions.
    YarnLock,
    /// `pnpm-lock.yaml`, installed versions.
    PnpmLock,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 4] = [
        ManifestKind::PackageJson,
        ManifestKind::NpmLock,
        ManifestKind::YarnLock,
        ManifestKind::PnpmLock,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::PackageJson => "package.json",
            ManifestKind::NpmLock => "package-lock.json",
            ManifestKind::YarnLock => "yarn.lock",
            ManifestKind::PnpmLock => "pnpm-lock.yaml",
        }
    }

    /// Maps an exact basename to its kind.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.file_name() == name)
    }

    /// True for lockfiles, which record installed rather than declared versions.
    pub fn is_lockfile(&self) -> bool {
        !matches!(self, ManifestKind::PackageJson)
    }
}

impl std::fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: PathBuf,
    pub kind: ManifestKind,
}

impl ManifestFile {
    pub fn new(path: impl Into<PathBuf>, kind: ManifestKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Package name to version string, as extracted from one file.
pub type VersionMap = BTreeMap<String, String>;

/// What a parser extracted from a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependencies {
    /// Package name to raw range specifier.
    Declared(VersionMap),
    /// Package name to resolved version.
    Installed(VersionMap),
}

impl Dependencies {
    /// An empty result of the flavour the given kind produces.
    pub fn empty(kind: ManifestKind) -> Self {
        if kind.is_lockfile() {
            Dependencies::Installed(VersionMap::new())
        } else {
            Dependencies::Declared(VersionMap::new())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dependencies::Declared(map) | Dependencies::Installed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
