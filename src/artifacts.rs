//! Loading and saving the three model artifacts.
//!
//! A model directory holds a classifier, the ordered feature columns it was
//! trained on and the label decoder that turns class indices back into role
//! names. All three are MessagePack files; all three must load for the
//! predictor to be usable.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use rmp_serde::{decode::from_read, encode::write_named};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{Error, Result};
use crate::predictor::{Classifier, JobRoleClassifier, LabelDecoder};
use crate::schema::{FeatureSchema, Vocabulary};

pub const CLASSIFIER_FILE: &str = "classifier.msgpack";
pub const COLUMNS_FILE: &str = "model_columns.msgpack";
pub const DECODER_FILE: &str = "label_encoder.msgpack";

/// Which of the three artifacts an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Columns,
    Decoder,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Classifier => write!(f, "classifier"),
            ArtifactKind::Columns => write!(f, "feature columns"),
            ArtifactKind::Decoder => write!(f, "label decoder"),
        }
    }
}

/// Where the artifacts live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub columns: PathBuf,
    pub decoder: PathBuf,
}

impl ArtifactPaths {
    /// The standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        ArtifactPaths {
            classifier: dir.join(CLASSIFIER_FILE),
            columns: dir.join(COLUMNS_FILE),
            decoder: dir.join(DECODER_FILE),
        }
    }

    pub fn get(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Classifier => &self.classifier,
            ArtifactKind::Columns => &self.columns,
            ArtifactKind::Decoder => &self.decoder,
        }
    }
}

/// Loaded, read-only model context shared by every submission.
pub struct Artifacts {
    classifier: JobRoleClassifier,
    schema: FeatureSchema,
    decoder: LabelDecoder,
    vocabulary: Vocabulary,
}

impl Artifacts {
    /// Assembles artifacts that are already in memory.
    pub fn new(
        classifier: JobRoleClassifier,
        columns: Vec<String>,
        decoder: LabelDecoder,
    ) -> Result<Self> {
        Self::assemble(classifier, columns, decoder).map_err(|(artifact, reason)| {
            Error::CorruptArtifact {
                artifact,
                path: PathBuf::from("<memory>"),
                reason,
            }
        })
    }

    /// Reads all three artifacts. Any failure is fatal for the caller.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        for kind in [
            ArtifactKind::Classifier,
            ArtifactKind::Columns,
            ArtifactKind::Decoder,
        ] {
            let path = paths.get(kind);
            if !path.is_file() {
                return Err(Error::MissingArtifact {
                    artifact: kind,
                    path: path.to_path_buf(),
                });
            }
        }

        let classifier: JobRoleClassifier = read(ArtifactKind::Classifier, &paths.classifier)?;
        let columns: Vec<String> = read(ArtifactKind::Columns, &paths.columns)?;
        let decoder: LabelDecoder = read(ArtifactKind::Decoder, &paths.decoder)?;

        let artifacts = Self::assemble(classifier, columns, decoder).map_err(
            |(artifact, reason)| Error::CorruptArtifact {
                artifact,
                path: paths.get(artifact).to_path_buf(),
                reason,
            },
        )?;

        info!(
            features = artifacts.schema.len(),
            classes = artifacts.decoder.len(),
            "📦 loaded model artifacts from {:?}",
            paths.classifier.parent().unwrap_or(Path::new("."))
        );
        Ok(artifacts)
    }

    /// Writes all three artifacts, creating parent directories as needed.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        write(&paths.classifier, &self.classifier)?;
        write(&paths.columns, self.schema.columns())?;
        write(&paths.decoder, &self.decoder)?;
        info!("💾 saved model artifacts to {:?}", paths.classifier.parent());
        Ok(())
    }

    fn assemble(
        classifier: JobRoleClassifier,
        columns: Vec<String>,
        decoder: LabelDecoder,
    ) -> std::result::Result<Self, (ArtifactKind, String)> {
        if columns.is_empty() {
            return Err((ArtifactKind::Columns, "no feature columns".into()));
        }
        let schema = FeatureSchema::new(columns)
            .map_err(|dup| (ArtifactKind::Columns, format!("duplicate column `{dup}`")))?;
        if classifier.n_features() != schema.len() {
            return Err((
                ArtifactKind::Classifier,
                format!(
                    "classifier expects {} features, schema has {}",
                    classifier.n_features(),
                    schema.len()
                ),
            ));
        }
        classifier
            .predict_class(&Array2::zeros((1, schema.len())))
            .map_err(|e| (ArtifactKind::Classifier, e.to_string()))?;
        if decoder.is_empty() {
            return Err((ArtifactKind::Decoder, "no class labels".into()));
        }
        if let Some(label) = decoder.duplicate() {
            return Err((ArtifactKind::Decoder, format!("duplicate label `{label}`")));
        }

        let vocabulary = Vocabulary::from_schema(&schema);
        Ok(Artifacts {
            classifier,
            schema,
            decoder,
            vocabulary,
        })
    }

    pub fn classifier(&self) -> &JobRoleClassifier {
        &self.classifier
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn decoder(&self) -> &LabelDecoder {
        &self.decoder
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }
}

fn read<T: DeserializeOwned>(artifact: ArtifactKind, path: &Path) -> Result<T> {
    let corrupt = |reason: String| Error::CorruptArtifact {
        artifact,
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| corrupt(e.to_string()))?;
    from_read(BufReader::new(file)).map_err(|e| corrupt(e.to_string()))
}

fn write<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_named(&mut writer, value).map_err(std::io::Error::other)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linfa::Dataset;
    use linfa::traits::Fit;
    use linfa_bayes::MultinomialNb;
    use ndarray::Array1;

    fn classifier(n_features: usize) -> JobRoleClassifier {
        let x = Array2::from_shape_fn((2, n_features), |(r, c)| if r == c { 1.0 } else { 0.0 });
        let y = Array1::from_vec(vec![0usize, 1]);
        let model = MultinomialNb::params().fit(&Dataset::new(x, y)).unwrap();
        JobRoleClassifier::new(model, n_features)
    }

    fn columns() -> Vec<String> {
        vec!["Skill_1_Python".into(), "Skill_2_SQL".into(), "Educational_Qualifications_MBA".into()]
    }

    #[test]
    fn width_mismatch_is_corrupt() {
        let err = Artifacts::new(classifier(2), columns(), LabelDecoder::new(["a", "b"]))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::CorruptArtifact {
                artifact: ArtifactKind::Classifier,
                ..
            }
        ));
    }

    #[test]
    fn classifier_fitted_on_other_width_is_corrupt() {
        let x = Array2::from_shape_fn((2, 5), |(r, c)| if r == c { 1.0 } else { 0.0 });
        let y = Array1::from_vec(vec![0usize, 1]);
        let model = MultinomialNb::params().fit(&Dataset::new(x, y)).unwrap();

        let err = Artifacts::new(
            JobRoleClassifier::new(model, 3),
            columns(),
            LabelDecoder::new(["a", "b"]),
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            Error::CorruptArtifact {
                artifact: ArtifactKind::Classifier,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_labels_in_decoder_file_are_corrupt() {
        #[derive(Serialize)]
        struct RawDecoder {
            classes: Vec<String>,
        }

        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        Artifacts::new(classifier(3), columns(), LabelDecoder::new(["a", "b"]))
            .unwrap()
            .save(&paths)
            .unwrap();
        let raw = RawDecoder {
            classes: vec!["b".into(), "a".into(), "b".into()],
        };
        write(&paths.decoder, &raw).unwrap();

        match Artifacts::load(&paths) {
            Err(Error::CorruptArtifact { artifact, reason, .. }) => {
                assert_eq!(artifact, ArtifactKind::Decoder);
                assert!(reason.contains("`b`"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("decoder with duplicate labels loaded"),
        }
    }

    #[test]
    fn duplicate_columns_are_corrupt() {
        let mut cols = columns();
        cols[2] = "Skill_1_Python".into();
        let err = Artifacts::new(classifier(3), cols, LabelDecoder::new(["a", "b"]))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::CorruptArtifact {
                artifact: ArtifactKind::Columns,
                ..
            }
        ));
    }

    #[test]
    fn empty_decoder_is_corrupt() {
        let empty: [&str; 0] = [];
        let err = Artifacts::new(classifier(3), columns(), LabelDecoder::new(empty))
            .err()
            .unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path().join("models"));
        Artifacts::new(classifier(3), columns(), LabelDecoder::new(["a", "b"]))
            .unwrap()
            .save(&paths)
            .unwrap();

        let loaded = Artifacts::load(&paths).unwrap();
        assert_eq!(loaded.schema().columns(), columns().as_slice());
        assert_eq!(loaded.decoder().classes(), ["a", "b"]);
        assert_eq!(loaded.classifier().n_features(), 3);
    }

    #[test]
    fn garbage_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        Artifacts::new(classifier(3), columns(), LabelDecoder::new(["a", "b"]))
            .unwrap()
            .save(&paths)
            .unwrap();
        fs::write(&paths.columns, b"not messagepack").unwrap();

        match Artifacts::load(&paths) {
            Err(Error::CorruptArtifact { artifact, path, .. }) => {
                assert_eq!(artifact, ArtifactKind::Columns);
                assert_eq!(path, paths.columns);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("garbage columns file loaded"),
        }
    }
}
