// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shares one loaded [`Corpus`] per dataset path across concurrent runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use inquest_core::InquestError;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::dataset::Corpus;
use crate::error::CorpusError;

struct CachedCorpus {
    modified: Option<SystemTime>,
    corpus: Arc<Corpus>,
}

/// Path-keyed cache of immutable corpora.
///
/// An entry is reused while the file's modification time is unchanged; a
/// newer file is reloaded on the next request. Runs already holding the old
/// `Arc<Corpus>` keep using it.
#[derive(Default)]
pub struct CorpusCache {
    entries: RwLock<HashMap<PathBuf, CachedCorpus>>,
}

impl CorpusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the corpus for `path`, loading it on a blocking thread if needed.
    pub async fn get(&self, path: &Path) -> Result<Arc<Corpus>, InquestError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| CorpusError::Io(e).into_dataset_error(path))?;
        let modified = metadata.modified().ok();

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(path)
                && entry.modified == modified
            {
                debug!(path = %path.display(), "corpus cache hit");
                return Ok(Arc::clone(&entry.corpus));
            }
        }

        let owned = path.to_path_buf();
        let corpus = tokio::task::spawn_blocking(move || Corpus::load(&owned))
            .await
            .map_err(|e| InquestError::Internal(format!("dataset loader panicked: {e}")))??;
        let corpus = Arc::new(corpus);

        self.entries.write().await.insert(
            path.to_path_buf(),
            CachedCorpus {
                modified,
                corpus: Arc::clone(&corpus),
            },
        );
        info!(path = %path.display(), papers = corpus.len(), "corpus cached");
        Ok(corpus)
    }

    /// Number of cached datasets.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
