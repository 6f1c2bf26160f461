//! # job-role-predictor 🧭💼
//!
//! Predict a job role from a primary skill, a secondary skill and an
//! educational qualification.
//!
//! The three selections are one-hot encoded against the exact column layout
//! the model was trained on (`Skill_1_<primary>`, `Skill_2_<secondary>`,
//! `Educational_Qualifications_<education>`), classified with a
//! [`linfa-bayes`](https://crates.io/crates/linfa-bayes) Naive Bayes model and
//! decoded back to the role name used at training time.
//!
//! ## Features
//! - Model, column layout and label decoder persisted with `rmp-serde` (MessagePack)
//! - Form options derived from the column layout, so they cannot drift from the model
//! - Interactive form, one-shot and CSV batch prediction from the `job-role` binary
//!
//! ## Example
//! ```no_run
//! use job_role_predictor::{ArtifactPaths, Artifacts, Selection, predict_role};
//!
//! let artifacts = Artifacts::load(&ArtifactPaths::in_dir("models"))?;
//! let role = predict_role(
//!     &Selection::new("Python", "SQL", "Bachelor of Science"),
//!     &artifacts,
//! )?;
//! println!("Your Predicted Job Role is: {role}");
//! # Ok::<(), job_role_predictor::Error>(())
//! ```

pub mod artifacts;
pub mod batch;
pub mod config;
pub mod encoder;
pub mod error;
pub mod form;
pub mod predictor;
pub mod schema;

pub use artifacts::{ArtifactKind, ArtifactPaths, Artifacts};
pub use config::Config;
pub use encoder::{FeatureVector, Selection, encode};
pub use error::{Error, Result};
pub use form::{Form, Outcome, predict_role};
pub use predictor::{Classifier, JobRoleClassifier, LabelDecoder, predict};
pub use schema::{FeatureSchema, Field, Vocabulary};
