use job_role_predictor::{ArtifactPaths, Artifacts, JobRoleClassifier, LabelDecoder};
use linfa::Dataset;
use linfa::traits::Fit;
use linfa_bayes::MultinomialNb;
use ndarray::{Array1, Array2};
use tempfile::TempDir;

pub const COLUMNS: [&str; 8] = [
    "Skill_1_Python",
    "Skill_1_Java",
    "Skill_1_Nursing",
    "Skill_2_SQL",
    "Skill_2_Excel",
    "Skill_2_Patient Care",
    "Educational_Qualifications_Bachelor of Science",
    "Educational_Qualifications_Bachelor of Nursing",
];

pub const ROLES: [&str; 3] = ["Data Analyst", "Nurse", "Software Engineer"];

/// (primary, secondary, education, role index)
const TRAINING: [(usize, usize, usize, usize); 5] = [
    (0, 3, 6, 0),
    (0, 4, 6, 0),
    (2, 5, 7, 1),
    (2, 5, 7, 1),
    (1, 3, 6, 2),
];

pub fn artifacts() -> Artifacts {
    let mut x = Array2::<f64>::zeros((TRAINING.len(), COLUMNS.len()));
    let mut y = Vec::with_capacity(TRAINING.len());
    for (row, (p, s, e, role)) in TRAINING.iter().enumerate() {
        x[[row, *p]] = 1.0;
        x[[row, *s]] = 1.0;
        x[[row, *e]] = 1.0;
        y.push(*role);
    }
    let model = MultinomialNb::params()
        .fit(&Dataset::new(x, Array1::from_vec(y)))
        .expect("fit fixture model");

    Artifacts::new(
        JobRoleClassifier::new(model, COLUMNS.len()),
        COLUMNS.iter().map(|c| c.to_string()).collect(),
        LabelDecoder::new(ROLES),
    )
    .expect("fixture artifacts")
}

/// Saves the fixture into a fresh directory.
pub fn saved_artifacts() -> (TempDir, ArtifactPaths) {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = ArtifactPaths::in_dir(dir.path());
    artifacts().save(&paths).expect("save fixture");
    (dir, paths)
}
