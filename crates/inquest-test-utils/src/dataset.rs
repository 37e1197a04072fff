// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::{Path, PathBuf};

use crate::fixtures::PAPERS_JSON;

/// A dataset file that lives as long as this value.
pub struct TempDataset {
    path: PathBuf,
    _dir: tempfile::TempDir,
}

impl TempDataset {
    /// Writes the fixture papers.
    pub fn new() -> Self {
        Self::with_json(PAPERS_JSON)
    }

    /// Writes `json` verbatim, valid or not.
    pub fn with_json(json: &str) -> Self {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("papers.json");
        std::fs::write(&path, json).expect("write dataset");
        Self { path, _dir: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Default for TempDataset {
    fn default() -> Self {
        Self::new()
    }
}
