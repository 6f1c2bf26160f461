//! Error types for the job role predictor.
//!
//! Startup failures ([`Error::MissingArtifact`], [`Error::CorruptArtifact`],
//! [`Error::Config`]) are fatal: nothing can be predicted without all three
//! artifacts. Everything else is scoped to a single submission and the user
//! may simply try again.

use std::path::PathBuf;

use thiserror::Error;

use crate::artifacts::ArtifactKind;
use crate::schema::Field;

/// Everything that can go wrong while loading artifacts or serving a prediction.
#[derive(Error, Debug)]
pub enum Error {
    // ── Fatal ────────────────────────────────────────────────────────
    /// An artifact file does not exist.
    #[error("{artifact} artifact not found at {}", path.display())]
    MissingArtifact { artifact: ArtifactKind, path: PathBuf },

    /// An artifact exists but could not be read or does not make sense.
    #[error("{artifact} artifact at {} is corrupt: {reason}", path.display())]
    CorruptArtifact {
        artifact: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    /// The configuration file is malformed.
    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    // ── Per submission ───────────────────────────────────────────────
    /// One of the three form fields was left empty.
    #[error("no {0} selected")]
    IncompleteSelection(Field),

    /// A constructed column name is not part of the feature schema.
    #[error("unknown category: column `{key}` is not in the feature schema")]
    UnknownCategory { key: String },

    /// The classifier or the label decoder rejected the input.
    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error should stop the application instead of resetting the form.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingArtifact { .. } | Error::CorruptArtifact { .. } | Error::Config { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
