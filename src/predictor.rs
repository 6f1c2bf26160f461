//! Running the classifier and decoding its class index into a role name.

use std::panic::{AssertUnwindSafe, catch_unwind};

use linfa::traits::Predict;
use linfa_bayes::MultinomialNb;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::encoder::FeatureVector;
use crate::error::{Error, Result};

/// Anything that maps a single feature row to a class index.
pub trait Classifier {
    /// Width of the rows the classifier was fitted on.
    fn n_features(&self) -> usize;

    fn predict_class(&self, row: &Array2<f64>) -> Result<usize>;
}

/// Naive Bayes model together with the row width it expects.
#[derive(Serialize, Deserialize)]
pub struct JobRoleClassifier {
    model: MultinomialNb<f64, usize>,
    n_features: usize,
}

impl JobRoleClassifier {
    pub fn new(model: MultinomialNb<f64, usize>, n_features: usize) -> Self {
        JobRoleClassifier { model, n_features }
    }
}

impl Classifier for JobRoleClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_class(&self, row: &Array2<f64>) -> Result<usize> {
        if row.ncols() != self.n_features {
            return Err(Error::PredictionFailed(format!(
                "input has {} features, but the classifier expects {}",
                row.ncols(),
                self.n_features
            )));
        }
        if row.nrows() != 1 {
            return Err(Error::PredictionFailed(format!(
                "expected a single row, got {}",
                row.nrows()
            )));
        }
        // The stored width is self-reported; a model fitted on another width
        // panics inside the matrix product.
        let classes: Array1<usize> = catch_unwind(AssertUnwindSafe(|| self.model.predict(row)))
            .map_err(|_| {
                Error::PredictionFailed(format!(
                    "classifier rejected a row of {} features",
                    row.ncols()
                ))
            })?;
        classes
            .first()
            .copied()
            .ok_or_else(|| Error::PredictionFailed("classifier returned no class".into()))
    }
}

/// Class index to role name, in the order the labels were encoded at training time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl LabelDecoder {
    /// Sorts and deduplicates `labels`, so index `i` is the `i`-th distinct label.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        LabelDecoder { classes }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// First label that appears more than once. The file order is trusted as
    /// the training-time encoding, so it is never re-sorted on load.
    pub fn duplicate(&self) -> Option<&str> {
        self.classes
            .iter()
            .enumerate()
            .find(|(i, c)| self.classes[..*i].contains(*c))
            .map(|(_, c)| c.as_str())
    }

    pub fn decode(&self, index: usize) -> Result<&str> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                Error::PredictionFailed(format!(
                    "class index {index} is unknown to the label decoder ({} classes)",
                    self.classes.len()
                ))
            })
    }
}

/// Classifies `vector` and returns the decoded role name.
pub fn predict<C: Classifier + ?Sized>(
    vector: &FeatureVector,
    classifier: &C,
    decoder: &LabelDecoder,
) -> Result<String> {
    let result = classifier
        .predict_class(vector.as_array())
        .and_then(|class| decoder.decode(class).map(|label| (class, label.to_string())));

    match result {
        Ok((class, label)) => {
            debug!(class, %label, "prediction");
            Ok(label)
        }
        Err(e) => {
            warn!(error = %e, "prediction failed");
            Err(e)
        }
    }
}
