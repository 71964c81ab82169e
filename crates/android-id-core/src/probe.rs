// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Connectias

//! Filesystem existence probes.

use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::artifacts::ArtifactPathSet;

/// Existence checks for emulator artifacts.
///
/// Errors while probing a path (permission denied, I/O failure) count as
/// "does not exist" and never stop a scan.
#[derive(Debug, Clone, Default)]
pub struct FileProbe {
    root: Option<PathBuf>,
}

impl FileProbe {
    /// Probe the live filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe under `root`; absolute artifact paths are re-rooted there too.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path.trim_start_matches('/')),
            None => PathBuf::from(path),
        }
    }

    /// Whether the artifact `path` exists.
    pub fn exists(&self, path: &str) -> bool {
        path_exists(&self.resolve(path))
    }

    /// First path of `set` that exists.
    pub fn first_present(&self, set: &ArtifactPathSet) -> Option<&'static str> {
        let found = set.paths.iter().copied().find(|p| self.exists(p));
        if let Some(path) = found {
            debug!("{} artifact present: {}", set.name, path);
        }
        found
    }

    pub fn any_present(&self, set: &ArtifactPathSet) -> bool {
        self.first_present(set).is_some()
    }
}

fn path_exists(path: &Path) -> bool {
    match path.try_exists() {
        Ok(exists) => exists,
        Err(err) => {
            trace!("cannot probe {}: {}", path.display(), err);
            false
        }
    }
}

/// The paths in `paths` that exist, in their original order.
///
/// Paths are used exactly as given.
pub fn check_files_exist<I, S>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .filter_map(|p| {
            let path: &str = p.as_ref();
            path_exists(Path::new(path)).then(|| path.to_string())
        })
        .collect()
}
