//! Feature schema and the option vocabularies derived from it.

use std::collections::HashMap;
use std::fmt;

/// One of the three form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Primary,
    Secondary,
    Education,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Primary, Field::Secondary, Field::Education];

    /// Column-name prefix this field's one-hot columns share.
    pub fn prefix(self) -> &'static str {
        match self {
            Field::Primary => "Skill_1_",
            Field::Secondary => "Skill_2_",
            Field::Education => "Educational_Qualifications_",
        }
    }

    /// Column name for `value` under this field.
    pub fn column(self, value: &str) -> String {
        format!("{}{}", self.prefix(), value)
    }

    /// Prompt shown by the form.
    pub fn label(self) -> &'static str {
        match self {
            Field::Primary => "Primary Skill",
            Field::Secondary => "Secondary Skill",
            Field::Education => "Educational Qualification",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Primary => write!(f, "primary skill"),
            Field::Secondary => write!(f, "secondary skill"),
            Field::Education => write!(f, "educational qualification"),
        }
    }
}

/// Ordered column layout the classifier was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Builds a schema from column names, returning the first duplicate on failure.
    pub fn new(columns: Vec<String>) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(name.clone());
            }
        }
        Ok(FeatureSchema { columns, index })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of `column` in the schema.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Options offered for each field, read off the schema's column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    primary: Vec<String>,
    secondary: Vec<String>,
    education: Vec<String>,
}

impl Vocabulary {
    /// Collects every column carrying a field prefix, in schema order.
    pub fn from_schema(schema: &FeatureSchema) -> Self {
        let mut vocab = Vocabulary::default();
        for column in schema.columns() {
            for field in Field::ALL {
                if let Some(value) = column.strip_prefix(field.prefix()) {
                    vocab.options_mut(field).push(value.to_string());
                    break;
                }
            }
        }
        vocab
    }

    pub fn options(&self, field: Field) -> &[String] {
        match field {
            Field::Primary => &self.primary,
            Field::Secondary => &self.secondary,
            Field::Education => &self.education,
        }
    }

    fn options_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::Primary => &mut self.primary,
            Field::Secondary => &mut self.secondary,
            Field::Education => &mut self.education,
        }
    }

    /// Resolves user input to a known option: exact name, case-insensitive
    /// name, or 1-based option number.
    pub fn resolve(&self, field: Field, input: &str) -> Option<&str> {
        let options = self.options(field);
        let input = input.trim();
        if let Some(hit) = options.iter().find(|o| o.as_str() == input) {
            return Some(hit.as_str());
        }
        if let Some(hit) = options.iter().find(|o| o.eq_ignore_ascii_case(input)) {
            return Some(hit.as_str());
        }
        input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
            .map(String::as_str)
    }
}
