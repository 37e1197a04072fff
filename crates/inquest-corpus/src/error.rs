// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors raised while loading or searching a corpus.

use std::path::Path;

use inquest_core::InquestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("cannot read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record {position} has an empty paper_id")]
    EmptyPaperId { position: usize },

    #[error("duplicate paper_id `{0}`")]
    DuplicatePaper(String),

    /// The query contained no indexable terms.
    #[error("query has no searchable terms")]
    EmptyQuery,
}

impl CorpusError {
    /// Converts a load failure into the workspace error, tagged with the dataset path.
    pub fn into_dataset_error(self, path: &Path) -> InquestError {
        let path = path.display().to_string();
        match self {
            CorpusError::Io(source) => InquestError::Dataset {
                path,
                message: format!("cannot read dataset: {source}"),
                source: Some(Box::new(source)),
            },
            CorpusError::Parse(source) => InquestError::Dataset {
                path,
                message: format!("invalid dataset JSON: {source}"),
                source: Some(Box::new(source)),
            },
            other => InquestError::Dataset {
                path,
                message: other.to_string(),
                source: None,
            },
        }
    }
}
