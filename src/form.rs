//! The three-field prediction form.
//!
//! A [`Form`] collects selections until it is submitted. Every submission
//! ends in an [`Outcome`] and leaves the form empty again, whatever happened.

use std::fmt;

use tracing::info;

use crate::artifacts::Artifacts;
use crate::encoder::{Selection, encode};
use crate::error::{Error, Result};
use crate::predictor::predict;
use crate::schema::Field;

/// Encodes `selection` and runs it through the loaded classifier and decoder.
pub fn predict_role(selection: &Selection, artifacts: &Artifacts) -> Result<String> {
    let vector = encode(selection, artifacts.schema())?;
    predict(&vector, artifacts.classifier(), artifacts.decoder())
}

/// What a submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    IncompleteSelection,
    UnknownCategory(String),
    PredictionFailed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            Outcome::Success(role) => format!("Your Predicted Job Role is: {role}"),
            Outcome::IncompleteSelection => {
                "Please fill in all three fields to make a prediction.".to_string()
            }
            Outcome::UnknownCategory(key) => {
                format!("The model does not know `{key}`. Please pick one of the listed options.")
            }
            Outcome::PredictionFailed(reason) => {
                format!("An error occurred during prediction: {reason}")
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<Result<String>> for Outcome {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(role) => Outcome::Success(role),
            Err(Error::IncompleteSelection(_)) => Outcome::IncompleteSelection,
            Err(Error::UnknownCategory { key }) => Outcome::UnknownCategory(key),
            Err(Error::PredictionFailed(reason)) => Outcome::PredictionFailed(reason),
            Err(other) => Outcome::PredictionFailed(other.to_string()),
        }
    }
}

/// Pending selections for one submission.
#[derive(Debug, Default)]
pub struct Form {
    primary: Option<String>,
    secondary: Option<String>,
    education: Option<String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form filled in one go, resolving each input like [`Form::select`].
    pub fn with_inputs(
        artifacts: &Artifacts,
        primary: &str,
        secondary: &str,
        education: &str,
    ) -> Self {
        let mut form = Form::new();
        for (field, input) in Field::ALL.into_iter().zip([primary, secondary, education]) {
            form.select(artifacts, field, input);
        }
        form
    }

    /// Records input for `field`.
    ///
    /// Known options are matched by name or 1-based number; anything else is
    /// kept as typed so the submission reports it. Blank input clears the field.
    pub fn select(&mut self, artifacts: &Artifacts, field: Field, input: &str) {
        let input = input.trim();
        let value = if input.is_empty() {
            None
        } else {
            let resolved = artifacts.vocabulary().resolve(field, input).unwrap_or(input);
            Some(resolved.to_string())
        };
        *self.slot(field) = value;
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Primary => self.primary.as_deref(),
            Field::Secondary => self.secondary.as_deref(),
            Field::Education => self.education.as_deref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_some())
    }

    /// Runs the prediction and resets the form.
    pub fn submit(&mut self, artifacts: &Artifacts) -> Outcome {
        let selection = Selection::new(
            self.primary.take().unwrap_or_default(),
            self.secondary.take().unwrap_or_default(),
            self.education.take().unwrap_or_default(),
        );
        let outcome = Outcome::from(predict_role(&selection, artifacts));
        info!(success = outcome.is_success(), "form submitted");
        outcome
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Primary => &mut self.primary,
            Field::Secondary => &mut self.secondary,
            Field::Education => &mut self.education,
        }
    }
}
