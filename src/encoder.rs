//! One-hot encoding of a form submission into the classifier's input row.

use ndarray::Array2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::{FeatureSchema, Field};

/// The three values a user picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Selection {
    pub primary_skill: String,
    pub secondary_skill: String,
    pub education: String,
}

impl Selection {
    pub fn new(
        primary_skill: impl Into<String>,
        secondary_skill: impl Into<String>,
        education: impl Into<String>,
    ) -> Self {
        Selection {
            primary_skill: primary_skill.into(),
            secondary_skill: secondary_skill.into(),
            education: education.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Primary => &self.primary_skill,
            Field::Secondary => &self.secondary_skill,
            Field::Education => &self.education,
        }
    }
}

/// A single input row, laid out exactly like the schema it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    row: Array2<f64>,
}

impl FeatureVector {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.row.ncols()
    }

    /// The `1 x width` matrix handed to the classifier.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.row
    }

    /// Indices of the columns set to 1.
    pub fn hot_positions(&self) -> Vec<usize> {
        self.row
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Builds the one-hot row for `selection`.
///
/// Fails with [`Error::IncompleteSelection`] before touching the schema if
/// any field is blank, and with [`Error::UnknownCategory`] if a constructed
/// column name is not part of `schema`.
pub fn encode(selection: &Selection, schema: &FeatureSchema) -> Result<FeatureVector> {
    for field in Field::ALL {
        if selection.get(field).trim().is_empty() {
            return Err(Error::IncompleteSelection(field));
        }
    }

    let mut row = Array2::<f64>::zeros((1, schema.len()));
    for field in Field::ALL {
        let key = field.column(selection.get(field));
        let Some(i) = schema.position(&key) else {
            return Err(Error::UnknownCategory { key });
        };
        row[[0, i]] = 1.0;
    }

    debug!(width = schema.len(), ?selection, "encoded selection");
    Ok(FeatureVector { row })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            [
                "Skill_1_Java",
                "Skill_1_Python",
                "Skill_2_Python",
                "Skill_2_SQL",
                "Educational_Qualifications_MBA",
                "Educational_Qualifications_Bachelor of Science",
            ]
            .map(String::from)
            .to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn sets_exactly_three_columns() {
        let schema = schema();
        let v = encode(&Selection::new("Python", "SQL", "Bachelor of Science"), &schema).unwrap();
        assert_eq!(v.width(), 6);
        assert_eq!(v.hot_positions(), vec![1, 3, 5]);
        assert_eq!(v.as_array().sum(), 3.0);
    }

    #[test]
    fn same_skill_twice_hits_different_columns() {
        let v = encode(&Selection::new("Python", "Python", "MBA"), &schema()).unwrap();
        assert_eq!(v.hot_positions(), vec![1, 2, 4]);
    }

    #[test]
    fn encoding_is_pure() {
        let schema = schema();
        let s = Selection::new("Java", "SQL", "MBA");
        assert_eq!(encode(&s, &schema).unwrap(), encode(&s, &schema).unwrap());
    }

    #[test]
    fn blank_field_is_incomplete() {
        let err = encode(&Selection::new("Python", "", "Bachelor of Science"), &schema()).unwrap_err();
        assert!(matches!(err, Error::IncompleteSelection(Field::Secondary)));

        let err = encode(&Selection::new("  ", "SQL", "MBA"), &schema()).unwrap_err();
        assert!(matches!(err, Error::IncompleteSelection(Field::Primary)));
    }

    #[test]
    fn incomplete_wins_over_unknown() {
        let err = encode(&Selection::new("Blockchain", "SQL", ""), &schema()).unwrap_err();
        assert!(matches!(err, Error::IncompleteSelection(Field::Education)));
    }

    #[test]
    fn unknown_category_names_the_key() {
        let err = encode(&Selection::new("Blockchain", "SQL", "MBA"), &schema()).unwrap_err();
        match err {
            Error::UnknownCategory { key } => assert_eq!(key, "Skill_1_Blockchain"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
